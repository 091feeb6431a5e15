//! Data structures and readers of DICOM file meta information tables.
//!
//! The file meta group is always encoded in Explicit VR Little Endian
//! and is bounded by the value of the _File Meta Information Group
//! Length_ (0002,0000) element, which must come first. Parsing pushes
//! that length as a limit on the source, so that the group is consumed
//! exactly.

use crate::mem::MetaElement;
use dcmflow_core::header::Header;
use dcmflow_core::{DataElement, Length, PrimitiveValue, Tag, VR};
use dcmflow_parser::stateful::decode::{self, FileHeaderDecoder, StatefulDecode};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::Read;

const DICM_MAGIC_CODE: [u8; 4] = [b'D', b'I', b'C', b'M'];

/// An error which may occur when parsing the file meta group.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not read the magic code
    #[snafu(display("Could not read the magic code"))]
    ReadMagicCode {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    /// The file does not carry the `DICM` magic code
    #[snafu(display("Expected the `DICM` magic code, got {:?}", got))]
    NotDicm { got: [u8; 4], backtrace: Backtrace },
    /// The group length element was missing or out of place
    #[snafu(display(
        "Expected File Meta Information Group Length (0002,0000), got {}",
        tag
    ))]
    MissingMetaGroupLength { tag: Tag, backtrace: Backtrace },
    /// The group length element is not an unsigned long of 4 bytes
    #[snafu(display("Unexpected group length declaration {} {}", vr, len))]
    UnexpectedGroupLengthFormat {
        vr: VR,
        len: Length,
        backtrace: Backtrace,
    },
    /// Failed to decode a meta group element
    #[snafu(display("Could not decode a meta group element"))]
    DecodeElement {
        #[snafu(backtrace)]
        source: decode::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// DICOM File Meta Information Table.
///
/// This data type contains the relevant parts of the file meta
/// information table, as specified in DICOM Part 10, together with the
/// full ordered list of elements found in the group.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaTable {
    /// File Meta Information Group Length, in bytes
    pub information_group_length: u32,
    /// File Meta Information Version
    pub information_version: Option<[u8; 2]>,
    /// Media Storage SOP Class UID
    pub media_storage_sop_class_uid: Option<String>,
    /// Media Storage SOP Instance UID
    pub media_storage_sop_instance_uid: Option<String>,
    /// Transfer Syntax UID
    pub transfer_syntax: Option<String>,
    /// Implementation Class UID
    pub implementation_class_uid: Option<String>,
    /// Implementation Version Name
    pub implementation_version_name: Option<String>,
    /// Source Application Entity Title
    pub source_application_entity_title: Option<String>,
    /// the full group content, in file order
    elements: Vec<MetaElement>,
}

impl FileMetaTable {
    /// Read the file meta table from a byte source.
    ///
    /// The source is expected to be positioned right at the magic code
    /// (the 128-byte preamble, if present, must have been consumed).
    pub fn from_reader<R: Read>(file: R) -> Result<Self> {
        FileMetaTable::read_from(file)
    }

    /// Retrieve the transfer syntax UID declared in the meta group,
    /// with trailing padding removed.
    pub fn transfer_syntax_uid(&self) -> Option<&str> {
        self.transfer_syntax
            .as_deref()
            .map(|uid| uid.trim_end_matches(|c| c == '\0' || c == ' '))
    }

    /// Retrieve the full list of elements in the meta group,
    /// group length included, in file order.
    pub fn elements(&self) -> &[MetaElement] {
        &self.elements
    }

    /// Take the full list of elements in the meta group.
    pub fn into_elements(self) -> Vec<MetaElement> {
        self.elements
    }

    fn read_from<S: Read>(mut file: S) -> Result<Self> {
        let mut buf: [u8; 4] = [0; 4];
        {
            // check magic code
            file.read_exact(&mut buf).context(ReadMagicCodeSnafu)?;
            ensure!(buf == DICM_MAGIC_CODE, NotDicmSnafu { got: buf });
        }

        let mut decoder = FileHeaderDecoder::file_header_decoder(file);

        // the group length must come first
        let header = decoder.decode_header().context(DecodeElementSnafu)?;
        ensure!(
            header.tag() == Tag(0x0002, 0x0000),
            MissingMetaGroupLengthSnafu { tag: header.tag() }
        );
        ensure!(
            header.vr() == VR::UL && header.len == Length(4),
            UnexpectedGroupLengthFormatSnafu {
                vr: header.vr(),
                len: header.len,
            }
        );
        let value = decoder.read_value(&header).context(DecodeElementSnafu)?;
        let group_length = value
            .uint32()
            .ok()
            .context(UnexpectedGroupLengthFormatSnafu {
                vr: header.vr(),
                len: header.len,
            })?;

        let mut elements = vec![DataElement::new_with_len(
            header.tag(),
            header.vr(),
            header.len,
            PrimitiveValue::from(group_length),
        )];

        let mut table = FileMetaTable {
            information_group_length: group_length,
            information_version: None,
            media_storage_sop_class_uid: None,
            media_storage_sop_instance_uid: None,
            transfer_syntax: None,
            implementation_class_uid: None,
            implementation_version_name: None,
            source_application_entity_title: None,
            elements: Vec::new(),
        };

        // the rest of the group is bounded by the group length
        decoder.push_limit(u64::from(group_length));
        while !decoder.is_limit_exhausted() {
            let header = decoder.decode_header().context(DecodeElementSnafu)?;
            let value = decoder.read_value(&header).context(DecodeElementSnafu)?;

            match header.tag() {
                Tag(0x0002, 0x0001) => {
                    if let Ok(b) = value.uint8_slice() {
                        if b.len() == 2 {
                            table.information_version = Some([b[0], b[1]]);
                        }
                    }
                }
                Tag(0x0002, 0x0002) => {
                    table.media_storage_sop_class_uid = value.string().ok().map(str::to_owned)
                }
                Tag(0x0002, 0x0003) => {
                    table.media_storage_sop_instance_uid = value.string().ok().map(str::to_owned)
                }
                Tag(0x0002, 0x0010) => {
                    table.transfer_syntax = value.string().ok().map(str::to_owned)
                }
                Tag(0x0002, 0x0012) => {
                    table.implementation_class_uid = value.string().ok().map(str::to_owned)
                }
                Tag(0x0002, 0x0013) => {
                    table.implementation_version_name = value.string().ok().map(str::to_owned)
                }
                Tag(0x0002, 0x0016) => {
                    table.source_application_entity_title =
                        value.string().ok().map(str::to_owned)
                }
                _ => {
                    // other tags are kept in the element list only
                }
            }

            elements.push(DataElement::new_with_len(
                header.tag(),
                header.vr(),
                header.len,
                value,
            ));
        }
        decoder.pop_limit();

        table.elements = elements;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::FileMetaTable;
    use dcmflow_core::header::Header;
    use dcmflow_core::Tag;

    const TEST_META_1: &[u8] = &[
        // magic code
        b'D', b'I', b'C', b'M',
        // File Meta Information Group Length: (0002,0000) ; UL ; 4 ; 156
        0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00, 0x9c, 0x00, 0x00, 0x00,
        // File Meta Information Version: (0002,0001) ; OB ; 2 ; [0x00, 0x01]
        0x02, 0x00, 0x01, 0x00, b'O', b'B', 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01,
        // Media Storage SOP Class UID (0002,0002) ; UI ; 26 ; "1.2.840.10008.5.1.4.1.1.1\0"
        0x02, 0x00, 0x02, 0x00, b'U', b'I', 0x1a, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x38, 0x34, 0x30,
        0x2e, 0x31, 0x30, 0x30, 0x30, 0x38, 0x2e, 0x35, 0x2e, 0x31, 0x2e, 0x34, 0x2e, 0x31, 0x2e,
        0x31, 0x2e, 0x31, 0x00,
        // Media Storage SOP Instance UID (0002,0003) ; UI ; 20 ; "1.2.3.4.5.12345.678\0"
        0x02, 0x00, 0x03, 0x00, b'U', b'I', 0x14, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x33, 0x2e, 0x34,
        0x2e, 0x35, 0x2e, 0x31, 0x32, 0x33, 0x34, 0x35, 0x2e, 0x36, 0x37, 0x38, 0x00,
        // Transfer Syntax UID (0002,0010) ; UI ; 20 ; "1.2.840.10008.1.2.1\0"
        0x02, 0x00, 0x10, 0x00, b'U', b'I', 0x14, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x38, 0x34, 0x30,
        0x2e, 0x31, 0x30, 0x30, 0x30, 0x38, 0x2e, 0x31, 0x2e, 0x32, 0x2e, 0x31, 0x00,
        // Implementation Class UID (0002,0012) ; UI ; 20 ; "1.2.345.6.7890.1.234"
        0x02, 0x00, 0x12, 0x00, b'U', b'I', 0x14, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x33, 0x34, 0x35,
        0x2e, 0x36, 0x2e, 0x37, 0x38, 0x39, 0x30, 0x2e, 0x31, 0x2e, 0x32, 0x33, 0x34,
        // Implementation Version Name (0002,0013) ; SH ; 16 ; "DCMFLOW_010     "
        0x02, 0x00, 0x13, 0x00, b'S', b'H', 0x10, 0x00, b'D', b'C', b'M', b'F', b'L', b'O', b'W',
        b'_', b'0', b'1', b'0', b' ', b' ', b' ', b' ', b' ',
    ];

    #[test]
    fn read_meta_table_from_reader() {
        let mut source = TEST_META_1;

        let table = FileMetaTable::from_reader(&mut source).unwrap();

        assert_eq!(table.information_group_length, 156);
        assert_eq!(table.information_version, Some([0u8, 1u8]));
        assert_eq!(
            table.media_storage_sop_class_uid.as_deref(),
            Some("1.2.840.10008.5.1.4.1.1.1\0")
        );
        assert_eq!(
            table.media_storage_sop_instance_uid.as_deref(),
            Some("1.2.3.4.5.12345.678\0")
        );
        assert_eq!(table.transfer_syntax.as_deref(), Some("1.2.840.10008.1.2.1\0"));
        assert_eq!(table.transfer_syntax_uid(), Some("1.2.840.10008.1.2.1"));
        assert_eq!(
            table.implementation_class_uid.as_deref(),
            Some("1.2.345.6.7890.1.234")
        );
        assert_eq!(
            table.implementation_version_name.as_deref(),
            Some("DCMFLOW_010     ")
        );
        assert_eq!(table.source_application_entity_title, None);

        // all elements are retained in file order, group length included
        assert_eq!(table.elements().len(), 7);
        assert_eq!(table.elements()[0].tag(), Tag(0x0002, 0x0000));
        assert_eq!(table.elements()[4].tag(), Tag(0x0002, 0x0010));

        // the entire source was consumed: 4 (magic) + 12 + 156
        assert_eq!(source.len(), 0);
    }

    #[test]
    fn bad_magic_code_is_rejected() {
        let mut source: &[u8] = &[b'D', b'I', b'C', b'X', 0x00, 0x00];
        let res = FileMetaTable::from_reader(&mut source);
        assert!(matches!(res, Err(super::Error::NotDicm { .. })));
    }

    #[test]
    fn missing_group_length_is_rejected() {
        // magic code followed by (0002,0010) instead of (0002,0000)
        let mut source: &[u8] = &[
            b'D', b'I', b'C', b'M', 0x02, 0x00, 0x10, 0x00, b'U', b'I', 0x02, 0x00, b'1', b'\0',
        ];
        let res = FileMetaTable::from_reader(&mut source);
        assert!(matches!(
            res,
            Err(super::Error::MissingMetaGroupLength { .. })
        ));
    }

    #[test]
    fn truncated_meta_group_is_rejected() {
        // group length declares more bytes than the source holds
        let mut source: &[u8] = &[
            b'D', b'I', b'C', b'M',
            // (0002,0000) UL 4 ; 64
            0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00, 0x40, 0x00, 0x00, 0x00,
            // (0002,0010) UI 4 ; "1.2\0" and nothing else
            0x02, 0x00, 0x10, 0x00, b'U', b'I', 0x04, 0x00, b'1', b'.', b'2', b'\0',
        ];
        let res = FileMetaTable::from_reader(&mut source);
        assert!(res.is_err());
    }
}
