//! File-level entry points for reading DICOM content.
//!
//! These functions assume the standard Part 10 encoding structure:
//! a 128-byte preamble, the `DICM` magic code, the file meta group, and
//! the data set proper. A concession is made for non-conformant files
//! seen in the wild through
//! [`ParseOptions::assume_no_header_and_offset`], which starts reading
//! data elements at byte 0 in Implicit VR Little Endian.

use crate::frame::FrameSink;
use crate::mem::{meta_to_mem, BuildContext, DataSet, MemElement};
use crate::meta::FileMetaTable;
use crate::{
    CreateParserSnafu, OpenFileSnafu, ParseMetaDataSetSnafu, ParseWarning, ReadPreambleSnafu,
    Result, UnsupportedTransferSyntaxSnafu,
};
use dcmflow_core::{Length, Tag};
use dcmflow_dictionary_std::StandardDataDictionary;
use dcmflow_encoding::text::SpecificCharacterSet;
use dcmflow_encoding::transfer_syntax::{registry, TransferSyntaxIndex, TransferSyntaxRegistry};
use dcmflow_parser::dataset::read::{DataSetReader, DataSetReaderOptions};
use dcmflow_parser::stream::LimitedSource;
use snafu::ResultExt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// The configuration of a file-level read.
#[derive(Debug, Default)]
pub struct ParseOptions {
    /// Assume that the input has no preamble, no magic code and no meta
    /// group, and start reading data elements at byte 0 in Implicit VR
    /// Little Endian.
    pub assume_no_header_and_offset: bool,
    /// Bound the whole read to this number of bytes,
    /// when the total size of the input is known.
    pub read_limit: Option<u64>,
    /// Deliver image frames through this sink while reading.
    /// The sink is closed when the read finishes, whether it succeeds
    /// or not.
    pub frame_sink: Option<FrameSink>,
}

/// A whole DICOM file in memory: the meta table (when the file carries
/// one), the data set, and the warnings gathered while reading.
///
/// The data set includes the elements of the file meta group as its
/// first block, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDataSet<D = StandardDataDictionary> {
    meta: Option<FileMetaTable>,
    dataset: DataSet<D>,
    warnings: Vec<ParseWarning>,
}

impl<D> FileDataSet<D> {
    /// Retrieve the file meta table,
    /// if the file carried a meta group.
    pub fn meta(&self) -> Option<&FileMetaTable> {
        self.meta.as_ref()
    }

    /// Retrieve the data set.
    pub fn dataset(&self) -> &DataSet<D> {
        &self.dataset
    }

    /// Take the data set, discarding the rest.
    pub fn into_dataset(self) -> DataSet<D> {
        self.dataset
    }

    /// Retrieve the warnings gathered while reading.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Retrieve the first data element with the given tag,
    /// if one exists.
    pub fn element(&self, tag: Tag) -> Option<&MemElement<D>> {
        self.dataset.element(tag)
    }
}

/// Read a DICOM file from the file system.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<FileDataSet> {
    open_file_with_options(path, ParseOptions::default())
}

/// Read a DICOM file from the file system with the given options.
pub fn open_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<FileDataSet> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|_| OpenFileSnafu {
        filename: path.to_path_buf(),
    })?;
    from_reader_with_options(BufReader::new(file), options)
}

/// Read a DICOM data set from an arbitrary byte source.
pub fn from_reader<R: Read>(src: R) -> Result<FileDataSet> {
    from_reader_with_options(src, ParseOptions::default())
}

/// Read a DICOM data set from an arbitrary byte source with the given
/// options.
pub fn from_reader_with_options<R: Read>(src: R, options: ParseOptions) -> Result<FileDataSet> {
    let ParseOptions {
        assume_no_header_and_offset,
        read_limit,
        frame_sink,
    } = options;

    // the context owns the frame sink: every return path out of this
    // function drops it, closing the channel exactly once
    let mut ctx = BuildContext {
        sink: frame_sink,
        warnings: Vec::new(),
    };

    let registry_index = TransferSyntaxRegistry;
    let mut source = match read_limit {
        Some(limit) => LimitedSource::with_limit(src, limit),
        None => LimitedSource::new(src),
    };

    let (meta, ts) = if assume_no_header_and_offset {
        (None, registry::default())
    } else {
        // skip the 128-byte preamble; its content is not interpreted
        source.skip(128).context(ReadPreambleSnafu)?;
        let meta = FileMetaTable::from_reader(&mut source).context(ParseMetaDataSetSnafu)?;

        let ts = match meta.transfer_syntax_uid() {
            Some(uid) => match registry_index.get(uid) {
                Some(ts) if ts.unsupported() => {
                    return UnsupportedTransferSyntaxSnafu { uid }.fail();
                }
                Some(ts) => ts,
                None => {
                    tracing::warn!(
                        "unknown transfer syntax `{}`, assuming Implicit VR Little Endian",
                        uid
                    );
                    ctx.warnings.push(ParseWarning::UnknownTransferSyntax {
                        uid: uid.to_string(),
                    });
                    registry::default()
                }
            },
            None => {
                tracing::warn!(
                    "missing transfer syntax UID in the meta group, \
                     assuming Implicit VR Little Endian"
                );
                ctx.warnings.push(ParseWarning::UnknownTransferSyntax {
                    uid: String::new(),
                });
                registry::default()
            }
        };
        (Some(meta), ts)
    };

    let mut dataset_reader = DataSetReader::from_source_with_options(
        source,
        ts,
        SpecificCharacterSet::default(),
        DataSetReaderOptions::default(),
    )
    .context(CreateParserSnafu)?;

    let body = DataSet::build_object(
        &mut dataset_reader,
        StandardDataDictionary,
        false,
        Length::UNDEFINED,
        &mut ctx,
    )?;

    // the meta group elements form the first block of the data set
    let mut elements: Vec<MemElement> = Vec::new();
    if let Some(meta) = &meta {
        elements.extend(meta.elements().iter().cloned().map(meta_to_mem));
    }
    elements.extend(body);
    let dataset = DataSet::from_parts(elements, StandardDataDictionary, Length::UNDEFINED);

    Ok(FileDataSet {
        meta,
        dataset,
        warnings: ctx.warnings,
    })
}
