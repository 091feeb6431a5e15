//! Interpretation of a DICOM data set as a stream of tokens.
//!
//! The rest of the crate is used to obtain DICOM element headers and
//! values. At this level, headers and values are treated as tokens which
//! can be used to form a syntax tree of a full data set.

use dcmflow_core::header::{DataElementHeader, Length};
use dcmflow_core::value::PrimitiveValue;
use dcmflow_core::Tag;
use std::fmt;

pub mod read;

pub use self::read::DataSetReader;

/// A token of a DICOM data set stream.
/// It may represent data headers or actual value data,
/// as well as the delimitation of sequences, items,
/// and encapsulated pixel data.
#[derive(Debug, Clone, PartialEq)]
pub enum DataToken {
    /// A data header of a primitive value.
    ElementHeader(DataElementHeader),
    /// The beginning of a sequence element.
    SequenceStart {
        /// the sequence tag
        tag: Tag,
        /// the declared length of the sequence value
        /// (can be undefined)
        len: Length,
    },
    /// The ending delimiter of a sequence.
    SequenceEnd,
    /// The beginning of a new item in the sequence.
    ItemStart {
        /// the declared length of the item (can be undefined)
        len: Length,
    },
    /// The ending delimiter of an item.
    ItemEnd,
    /// A primitive data element value.
    PrimitiveValue(PrimitiveValue),
    /// The beginning of an encapsulated pixel data element.
    PixelSequenceStart,
    /// The content of the basic offset table,
    /// the first item of an encapsulated pixel data element.
    OffsetTable(Vec<u32>),
    /// The byte content of a pixel data fragment item.
    ItemValue(Vec<u8>),
}

impl fmt::Display for DataToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataToken::PrimitiveValue(v) => write!(f, "PrimitiveValue({:?})", v.value_type()),
            DataToken::ItemValue(data) => write!(f, "ItemValue({} bytes)", data.len()),
            DataToken::OffsetTable(entries) => write!(f, "OffsetTable({} entries)", entries.len()),
            other => write!(f, "{:?}", other),
        }
    }
}

/// The type of delimiter of a bounded scope: sequence or item.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SeqTokenType {
    /// The scope of a sequence value.
    Sequence,
    /// The scope of an item within a sequence.
    Item,
}
