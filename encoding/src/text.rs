//! Support for decoding text in DICOM data structures, including
//! character repertoires.
//!
//! The character repertoires accepted by DICOM cover a wide range of
//! scripts. At the moment, this library supports the default repertoire
//! (ISO-IR 6, decoded as ISO 8859-1), ISO-IR 192 (Unicode in UTF-8),
//! and GB18030.

use encoding::all::{GB18030, ISO_8859_1, UTF_8};
use encoding::{DecoderTrap, Encoding, RawDecoder, StringWriter};
use snafu::{Backtrace, Snafu};

/// An error occurred during text decoding.
#[derive(Debug, Snafu)]
#[snafu(display("Failed to decode text: {}", message))]
pub struct DecodeTextError {
    message: std::borrow::Cow<'static, str>,
    backtrace: Backtrace,
}

type Result<T, E = DecodeTextError> = std::result::Result<T, E>;

/// A holder of a decoding mechanism for text in DICOM content,
/// which according to the standard, depends on the specific character
/// set.
pub trait TextCodec {
    /// Obtain a unique name of the text encoding,
    /// which may be used as the value of a
    /// Specific Character Set (0008,0005) element to refer to this codec.
    ///
    /// Should contain no leading or trailing spaces.
    /// This method may be useful for testing purposes, considering that
    /// `TextCodec` is often used as a trait object.
    fn name(&self) -> &'static str;

    /// Decode the given byte buffer as a single string. The resulting
    /// string _may_ contain backslash characters ('\') to delimit
    /// individual values, and should be split later on if required.
    fn decode(&self, text: &[u8]) -> Result<String>;
}

impl<T: ?Sized> TextCodec for Box<T>
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        self.as_ref().decode(text)
    }
}

impl<'a, T: ?Sized> TextCodec for &'a T
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        (**self).decode(text)
    }
}

/// Type alias for a type erased text codec.
///
/// It is important because stateful decoders may need to change the
/// expected text encoding format at run-time.
pub type DynamicTextCodec = Box<dyn TextCodec>;

/// An enum type for the supported character sets.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub enum SpecificCharacterSet {
    /// The default character set (ISO-IR 6).
    #[default]
    Default,
    /// The Unicode character set defined in ISO-IR 192,
    /// based on the UTF-8 encoding.
    IsoIr192,
    /// The Simplified Chinese character set defined in GB18030.
    Gb18030,
}

impl SpecificCharacterSet {
    /// Obtain the character set for one of the defined terms of the
    /// Specific Character Set (0008,0005) attribute.
    ///
    /// Trailing spaces in the term are discarded.
    pub fn from_code(code: &str) -> Option<Self> {
        use self::SpecificCharacterSet::*;
        match code.trim_end_matches(|c| c == ' ' || c == '\0') {
            "" | "ISO_IR 6" | "ISO 2022 IR 6" => Some(Default),
            "ISO_IR 192" => Some(IsoIr192),
            "GB18030" => Some(Gb18030),
            _ => None,
        }
    }
}

impl TextCodec for SpecificCharacterSet {
    fn name(&self) -> &'static str {
        match self {
            SpecificCharacterSet::Default => DefaultCharacterSetCodec.name(),
            SpecificCharacterSet::IsoIr192 => Utf8CharacterSetCodec.name(),
            SpecificCharacterSet::Gb18030 => Gb18030CharacterSetCodec.name(),
        }
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        match self {
            SpecificCharacterSet::Default => DefaultCharacterSetCodec.decode(text),
            SpecificCharacterSet::IsoIr192 => Utf8CharacterSetCodec.decode(text),
            SpecificCharacterSet::Gb18030 => Gb18030CharacterSetCodec.decode(text),
        }
    }
}

/// Decoder trap for malformed input:
/// unmappable bytes are rendered as `\ooo` octal escapes,
/// so that no input produces a hard decoding failure.
fn decode_text_trap(
    _decoder: &mut dyn RawDecoder,
    input: &[u8],
    output: &mut dyn StringWriter,
) -> bool {
    let c = input[0];
    let o0 = c & 7;
    let o1 = (c & 56) >> 3;
    let o2 = (c & 192) >> 6;
    output.write_char('\\');
    output.write_char((o2 + b'0') as char);
    output.write_char((o1 + b'0') as char);
    output.write_char((o0 + b'0') as char);
    true
}

/// Data type representing the default character set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Copy)]
pub struct DefaultCharacterSetCodec;

impl TextCodec for DefaultCharacterSetCodec {
    fn name(&self) -> &'static str {
        "ISO_IR 6"
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        ISO_8859_1
            .decode(text, DecoderTrap::Call(decode_text_trap))
            .map_err(|message| DecodeTextSnafu { message }.build())
    }
}

/// Data type representing the UTF-8 character set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Copy)]
pub struct Utf8CharacterSetCodec;

impl TextCodec for Utf8CharacterSetCodec {
    fn name(&self) -> &'static str {
        "ISO_IR 192"
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        UTF_8
            .decode(text, DecoderTrap::Call(decode_text_trap))
            .map_err(|message| DecodeTextSnafu { message }.build())
    }
}

/// Data type representing the GB18030 character set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Copy)]
pub struct Gb18030CharacterSetCodec;

impl TextCodec for Gb18030CharacterSetCodec {
    fn name(&self) -> &'static str {
        "GB18030"
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        GB18030
            .decode(text, DecoderTrap::Call(decode_text_trap))
            .map_err(|message| DecodeTextSnafu { message }.build())
    }
}
