//! Module holding a stateful DICOM data decoding abstraction,
//! which also supports text decoding.
//!
//! The decoder owns a [`LimitedSource`] wrapping the raw input, so that
//! byte positions and bounded scopes are accounted for in one place
//! while values are being read.

use crate::stream::LimitedSource;
use dcmflow_core::header::{DataElementHeader, HasLength, Length, SequenceItemHeader, Tag, VR};
use dcmflow_core::value::PrimitiveValue;
use dcmflow_encoding::decode::basic::{BasicDecoder, LittleEndianBasicDecoder};
use dcmflow_encoding::decode::explicit_le::ExplicitVRLittleEndianDecoder;
use dcmflow_encoding::decode::{BasicDecode, DecodeFrom};
use dcmflow_encoding::text::{DefaultCharacterSetCodec, SpecificCharacterSet, TextCodec};
use dcmflow_encoding::transfer_syntax::{DynDecoder, TransferSyntax};
use smallvec::smallvec;
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::Read;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Decoding in transfer syntax {} is unsupported", ts))]
    UnsupportedTransferSyntax {
        ts: &'static str,
        backtrace: Backtrace,
    },

    #[snafu(display("Attempted to read non-primitive value at position {}", position))]
    NonPrimitiveType { position: u64, backtrace: Backtrace },

    #[snafu(display(
        "Undefined value length of element tagged {} at position {}",
        tag,
        position
    ))]
    UndefinedValueLength {
        tag: Tag,
        position: u64,
        backtrace: Backtrace,
    },

    #[snafu(display(
        "Value length {} of element tagged {} at position {} is not a multiple of its element size",
        len,
        tag,
        position
    ))]
    InvalidValueLength {
        tag: Tag,
        len: u32,
        position: u64,
        backtrace: Backtrace,
    },

    #[snafu(display("Could not decode element header at position {}", position))]
    DecodeElementHeader {
        position: u64,
        #[snafu(backtrace)]
        source: dcmflow_encoding::decode::Error,
    },

    #[snafu(display("Could not decode item header at position {}", position))]
    DecodeItemHeader {
        position: u64,
        #[snafu(backtrace)]
        source: dcmflow_encoding::decode::Error,
    },

    #[snafu(display("Could not decode text at position {}", position))]
    DecodeText {
        position: u64,
        #[snafu(backtrace)]
        source: dcmflow_encoding::text::DecodeTextError,
    },

    #[snafu(display("Could not read value from source at position {}", position))]
    ReadValueData {
        position: u64,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Interface of a stateful decoder: it knows the position of the source,
/// decodes element and item headers according to the active transfer
/// syntax, reads primitive values according to their value
/// representation, and exposes the bounded-scope accounting of the
/// underlying source.
pub trait StatefulDecode {
    /// The type of the underlying byte source.
    type Reader: Read;

    /// Decode the next data element header from the source.
    /// At the end of this operation, the source will be pointing at the
    /// element's value data.
    fn decode_header(&mut self) -> Result<DataElementHeader>;

    /// Decode the next sequence item header from the source.
    fn decode_item_header(&mut self) -> Result<SequenceItemHeader>;

    /// Eagerly read the following data in the source as a primitive data
    /// value, in accordance with the element header's value
    /// representation. The value's original format is preserved:
    /// numbers and date-time instances in text form are kept as strings.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O problems, or if the header describes a
    /// sequence, in which case this method should not be used.
    fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue>;

    /// Eagerly read the following data in the source as a raw byte
    /// buffer, regardless of the value representation.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O problems, or if the header describes a
    /// sequence, in which case this method should not be used.
    fn read_value_bytes(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue>;

    /// Read the given number of bytes into a vector.
    fn read_to_vec(&mut self, length: u32, vec: &mut Vec<u8>) -> Result<()>;

    /// Read the given number of bytes as a sequence of unsigned 32-bit
    /// integers into a vector.
    fn read_u32_to_vec(&mut self, length: u32, vec: &mut Vec<u32>) -> Result<()>;

    /// Skip the given number of bytes,
    /// counting them as if they were read.
    fn skip_bytes(&mut self, length: u32) -> Result<()>;

    /// Retrieve the known position of the source.
    /// If the stateful decoder was constructed at the beginning of the
    /// source, this equals the number of bytes read so far.
    fn position(&self) -> u64;

    /// Declare that the next `n` bytes of the source constitute a
    /// bounded scope.
    fn push_limit(&mut self, n: u64);

    /// Leave the current bounded scope, returning the number of
    /// unconsumed bytes in it.
    fn pop_limit(&mut self) -> Option<u64>;

    /// Check whether the narrowest bounded scope has been fully
    /// consumed.
    fn is_limit_exhausted(&self) -> bool;

    /// Report the number of bytes left until the narrowest active
    /// limit, or `None` if no limit is active.
    fn bytes_left_until_limit(&self) -> Option<u64>;
}

/// Alias for a dynamically resolved DICOM stateful decoder. Although the
/// data source may be known at compile time, the required decoder may
/// vary according to the object's transfer syntax.
pub type DynStatefulDecoder<S> = StatefulDecoder<DynDecoder<LimitedSource<S>>, S>;

/// Type alias for the stateful decoder of a file's meta group,
/// which is always read in Explicit VR Little Endian
/// with the default character repertoire.
pub type FileHeaderDecoder<S> =
    StatefulDecoder<ExplicitVRLittleEndianDecoder, S, LittleEndianBasicDecoder>;

/// The initial capacity of the value reading buffer.
const PARSER_BUFFER_CAPACITY: usize = 2048;

/// A stateful abstraction for the full DICOM content reading process.
/// This type encapsulates the necessary codecs in order to be as
/// autonomous as possible in the DICOM content reading process.
///
/// `S` is the generic parameter type for the original source,
/// `D` is the element decoder for the active transfer syntax,
/// `BD` is the basic (endian-aware) decoder,
/// and `TC` is the active text codec.
#[derive(Debug)]
pub struct StatefulDecoder<D, S, BD = BasicDecoder, TC = SpecificCharacterSet> {
    from: LimitedSource<S>,
    decoder: D,
    basic: BD,
    text: TC,
    buffer: Vec<u8>,
}

impl<S> DynStatefulDecoder<S> {
    /// Create a new DICOM stateful decoder for the given transfer syntax
    /// and character set.
    pub fn new_with(from: S, ts: &TransferSyntax, charset: SpecificCharacterSet) -> Result<Self>
    where
        S: Read,
    {
        Self::from_source(LimitedSource::new(from), ts, charset)
    }

    /// Create a new DICOM stateful decoder for the given transfer
    /// syntax, reading from an already bounded source.
    pub fn from_source(
        from: LimitedSource<S>,
        ts: &TransferSyntax,
        charset: SpecificCharacterSet,
    ) -> Result<Self>
    where
        S: Read,
    {
        let basic = ts.basic_decoder();
        let decoder = ts
            .decoder_for()
            .context(UnsupportedTransferSyntaxSnafu { ts: ts.uid() })?;

        Ok(StatefulDecoder {
            from,
            decoder,
            basic,
            text: charset,
            buffer: Vec::with_capacity(PARSER_BUFFER_CAPACITY),
        })
    }

    /// Create a new DICOM stateful decoder for the given transfer
    /// syntax, with the default character set assumed until a
    /// _Specific Character Set_ attribute is found.
    pub fn new_with_ts(from: S, ts: &TransferSyntax) -> Result<Self>
    where
        S: Read,
    {
        Self::new_with(from, ts, SpecificCharacterSet::default())
    }
}

impl<S> FileHeaderDecoder<S>
where
    S: Read,
{
    /// Create a new DICOM stateful decoder for reading the file meta
    /// group, which is always in _Explicit VR Little Endian_.
    pub fn file_header_decoder(from: S) -> Self {
        StatefulDecoder::new(
            from,
            ExplicitVRLittleEndianDecoder::default(),
            LittleEndianBasicDecoder,
            SpecificCharacterSet::default(),
        )
    }
}

impl<D, S, BD, TC> StatefulDecoder<D, S, BD, TC>
where
    BD: BasicDecode,
    TC: TextCodec,
{
    /// Create a new DICOM stateful decoder from its parts.
    #[inline]
    pub fn new(from: S, decoder: D, basic: BD, text: TC) -> StatefulDecoder<D, S, BD, TC> {
        StatefulDecoder {
            from: LimitedSource::new(from),
            decoder,
            basic,
            text,
            buffer: Vec::with_capacity(PARSER_BUFFER_CAPACITY),
        }
    }

    /// Retrieve the underlying bounded source.
    pub fn source(&mut self) -> &mut LimitedSource<S> {
        &mut self.from
    }

    /// Recover the underlying source,
    /// discarding the decoding state.
    pub fn into_source(self) -> LimitedSource<S> {
        self.from
    }

    /// Retrieve the name of the active text codec.
    pub fn text_codec_name(&self) -> &'static str {
        self.text.name()
    }
}

impl<D, S, BD, TC> StatefulDecoder<D, S, BD, TC>
where
    D: DecodeFrom<LimitedSource<S>>,
    BD: BasicDecode,
    S: Read,
    TC: TextCodec,
{
    // ---------------- private methods ---------------------

    fn require_known_length(&self, header: &DataElementHeader) -> Result<usize> {
        header
            .length()
            .get()
            .map(|len| len as usize)
            .context(UndefinedValueLengthSnafu {
                position: self.from.position(),
                tag: header.tag,
            })
    }

    /// Check that a binary value length is a whole number of elements.
    fn require_element_multiple(&self, header: &DataElementHeader, size: usize) -> Result<usize> {
        let len = self.require_known_length(header)?;
        ensure!(
            len % size == 0,
            InvalidValueLengthSnafu {
                tag: header.tag,
                len: len as u32,
                position: self.from.position(),
            }
        );
        Ok(len / size)
    }

    fn read_value_tag(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let ntags = self.require_element_multiple(header, 4)?;

        let mut parts = smallvec![Tag(0, 0); ntags];
        for part in parts.iter_mut() {
            *part = self
                .basic
                .decode_tag(&mut self.from)
                .context(ReadValueDataSnafu {
                    position: self.from.position(),
                })?;
        }
        Ok(PrimitiveValue::Tags(parts))
    }

    fn read_value_ob(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // this function always expects a defined length value
        // (pixel sequence detection is done by the caller)
        let len = self.require_known_length(header)?;

        let mut buf = smallvec![0u8; len];
        self.from.read_exact(&mut buf).context(ReadValueDataSnafu {
            position: self.from.position(),
        })?;
        Ok(PrimitiveValue::U8(buf))
    }

    fn read_value_strs(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = self.require_known_length(header)?;
        // sequence of strings
        self.buffer.resize_with(len, Default::default);
        self.from
            .read_exact(&mut self.buffer)
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;

        // the declared character set only affects the value
        // representations which admit non-ASCII content
        let use_charset_declared = matches!(
            header.vr(),
            VR::LO | VR::PN | VR::SH | VR::UC
        );

        let parts: Result<_> = if use_charset_declared {
            self.buffer
                .split(|v| *v == b'\\')
                .map(|slice| {
                    self.text.decode(slice).context(DecodeTextSnafu {
                        position: self.from.position(),
                    })
                })
                .collect()
        } else {
            self.buffer
                .split(|v| *v == b'\\')
                .map(|slice| {
                    DefaultCharacterSetCodec
                        .decode(slice)
                        .context(DecodeTextSnafu {
                            position: self.from.position(),
                        })
                })
                .collect()
        };

        Ok(PrimitiveValue::Strs(parts?))
    }

    fn read_value_str(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = self.require_known_length(header)?;

        // a single string
        self.buffer.resize_with(len, Default::default);
        self.from
            .read_exact(&mut self.buffer)
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::Str(
            self.text
                .decode(&self.buffer[..])
                .context(DecodeTextSnafu {
                    position: self.from.position(),
                })?,
        ))
    }

    fn read_value_ur(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = self.require_known_length(header)?;

        // a single string in the default repertoire:
        // URIs are not affected by the declared character set
        self.buffer.resize_with(len, Default::default);
        self.from
            .read_exact(&mut self.buffer)
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::Str(
            DefaultCharacterSetCodec
                .decode(&self.buffer[..])
                .context(DecodeTextSnafu {
                    position: self.from.position(),
                })?,
        ))
    }

    fn read_value_ss(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 16-bit signed integers
        let n = self.require_element_multiple(header, 2)?;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_ss_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::I16(vec))
    }

    fn read_value_us(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 16-bit unsigned integers
        let n = self.require_element_multiple(header, 2)?;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_us_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::U16(vec))
    }

    fn read_value_ul(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 32-bit unsigned integers
        let n = self.require_element_multiple(header, 4)?;
        let mut vec = smallvec![0u32; n];
        self.basic
            .decode_ul_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::U32(vec))
    }

    fn read_value_uv(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 64-bit unsigned integers
        let n = self.require_element_multiple(header, 8)?;
        let mut vec = smallvec![0u64; n];
        self.basic
            .decode_uv_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::U64(vec))
    }

    fn read_value_sl(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 32-bit signed integers
        let n = self.require_element_multiple(header, 4)?;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_sl_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::I32(vec))
    }

    fn read_value_sv(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 64-bit signed integers
        let n = self.require_element_multiple(header, 8)?;
        let mut vec = smallvec![0; n];
        self.basic
            .decode_sv_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::I64(vec))
    }

    fn read_value_fl(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 32-bit floats
        let n = self.require_element_multiple(header, 4)?;
        let mut vec = smallvec![0.; n];
        self.basic
            .decode_fl_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::F32(vec))
    }

    fn read_value_od(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 64-bit floats
        let n = self.require_element_multiple(header, 8)?;
        let mut vec = smallvec![0.; n];
        self.basic
            .decode_fd_into(&mut self.from, &mut vec[..])
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })?;
        Ok(PrimitiveValue::F64(vec))
    }
}

impl<S, D, BD> StatefulDecoder<D, S, BD>
where
    D: DecodeFrom<LimitedSource<S>>,
    BD: BasicDecode,
    S: Read,
{
    fn set_character_set(&mut self, charset: SpecificCharacterSet) {
        self.text = charset;
    }

    /// Read a sequence of Code String values. Similar to
    /// `read_value_strs`, but also triggers a character set change when
    /// it finds the _Specific Character Set_ attribute.
    fn read_value_cs(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let out = self.read_value_strs(header)?;

        let parts = match &out {
            PrimitiveValue::Strs(parts) => parts,
            _ => unreachable!(),
        };

        // if it's a Specific Character Set, update the decoder
        // immediately so that subsequent text elements are decoded
        // with the new repertoire
        if header.tag == Tag(0x0008, 0x0005) {
            if let Some(charset) = parts.first().map(|x| x.as_ref()).and_then(|name| {
                SpecificCharacterSet::from_code(name).or_else(|| {
                    tracing::warn!("Unsupported character set `{}`, ignoring", name.trim_end());
                    None
                })
            }) {
                self.set_character_set(charset);
            }
        }

        Ok(out)
    }
}

impl<D> StatefulDecode for &'_ mut D
where
    D: StatefulDecode,
{
    type Reader = D::Reader;

    fn decode_header(&mut self) -> Result<DataElementHeader> {
        (**self).decode_header()
    }

    fn decode_item_header(&mut self) -> Result<SequenceItemHeader> {
        (**self).decode_item_header()
    }

    fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        (**self).read_value(header)
    }

    fn read_value_bytes(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        (**self).read_value_bytes(header)
    }

    fn read_to_vec(&mut self, length: u32, vec: &mut Vec<u8>) -> Result<()> {
        (**self).read_to_vec(length, vec)
    }

    fn read_u32_to_vec(&mut self, length: u32, vec: &mut Vec<u32>) -> Result<()> {
        (**self).read_u32_to_vec(length, vec)
    }

    fn skip_bytes(&mut self, length: u32) -> Result<()> {
        (**self).skip_bytes(length)
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn push_limit(&mut self, n: u64) {
        (**self).push_limit(n)
    }

    fn pop_limit(&mut self) -> Option<u64> {
        (**self).pop_limit()
    }

    fn is_limit_exhausted(&self) -> bool {
        (**self).is_limit_exhausted()
    }

    fn bytes_left_until_limit(&self) -> Option<u64> {
        (**self).bytes_left_until_limit()
    }
}

impl<D, S, BD> StatefulDecode for StatefulDecoder<D, S, BD>
where
    D: DecodeFrom<LimitedSource<S>>,
    BD: BasicDecode,
    S: Read,
{
    type Reader = S;

    fn decode_header(&mut self) -> Result<DataElementHeader> {
        let position = self.from.position();
        self.decoder
            .decode_header(&mut self.from)
            .context(DecodeElementHeaderSnafu { position })
            .map(|(header, _bytes_read)| header)
    }

    fn decode_item_header(&mut self) -> Result<SequenceItemHeader> {
        let position = self.from.position();
        self.decoder
            .decode_item_header(&mut self.from)
            .context(DecodeItemHeaderSnafu { position })
    }

    fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        if header.length() == Length(0) {
            return Ok(PrimitiveValue::Empty);
        }

        match header.vr() {
            VR::SQ => {
                // sequence objects should not head over here, they are
                // handled at a higher level
                NonPrimitiveTypeSnafu {
                    position: self.from.position(),
                }
                .fail()
            }
            VR::AT => self.read_value_tag(header),
            VR::AE
            | VR::AS
            | VR::PN
            | VR::SH
            | VR::LO
            | VR::UC
            | VR::UI
            | VR::IS
            | VR::DS
            | VR::DA
            | VR::TM
            | VR::DT => self.read_value_strs(header),
            VR::CS => self.read_value_cs(header),
            VR::UT | VR::ST | VR::LT => self.read_value_str(header),
            VR::UR => self.read_value_ur(header),
            VR::UN | VR::OB => self.read_value_ob(header),
            VR::US | VR::OW => self.read_value_us(header),
            VR::SS => self.read_value_ss(header),
            VR::FD | VR::OD => self.read_value_od(header),
            VR::FL | VR::OF => self.read_value_fl(header),
            VR::SL => self.read_value_sl(header),
            VR::OL | VR::UL => self.read_value_ul(header),
            VR::SV => self.read_value_sv(header),
            VR::OV | VR::UV => self.read_value_uv(header),
        }
    }

    fn read_value_bytes(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        if header.length() == Length(0) {
            return Ok(PrimitiveValue::Empty);
        }

        match header.vr() {
            VR::SQ => NonPrimitiveTypeSnafu {
                position: self.from.position(),
            }
            .fail(),
            _ => self.read_value_ob(header),
        }
    }

    fn read_to_vec(&mut self, length: u32, vec: &mut Vec<u8>) -> Result<()> {
        let length = u64::from(length);
        let position = self.from.position();
        let copied = std::io::copy(&mut (&mut self.from).take(length), vec)
            .context(ReadValueDataSnafu { position })?;
        if copied != length {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof))
                .context(ReadValueDataSnafu { position });
        }
        Ok(())
    }

    fn read_u32_to_vec(&mut self, length: u32, vec: &mut Vec<u32>) -> Result<()> {
        let base = vec.len();
        vec.resize(base + (length >> 2) as usize, 0);

        self.basic
            .decode_ul_into(&mut self.from, &mut vec[base..])
            .context(ReadValueDataSnafu {
                position: self.from.position(),
            })
    }

    fn skip_bytes(&mut self, length: u32) -> Result<()> {
        let position = self.from.position();
        self.from
            .skip(u64::from(length))
            .context(ReadValueDataSnafu { position })
    }

    fn position(&self) -> u64 {
        self.from.position()
    }

    fn push_limit(&mut self, n: u64) {
        self.from.push_limit(n)
    }

    fn pop_limit(&mut self) -> Option<u64> {
        self.from.pop_limit()
    }

    fn is_limit_exhausted(&self) -> bool {
        self.from.is_limit_exhausted()
    }

    fn bytes_left_until_limit(&self) -> Option<u64> {
        self.from.bytes_left_until_limit()
    }
}
