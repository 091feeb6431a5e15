#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! Core data structures for reading DICOM content.
//!
//! This crate hosts the basic building blocks of the data set model:
//! attribute tags, value representations, element headers, and the
//! in-memory value types produced by the decoding process. It carries no
//! I/O of its own; the wire-level decoding lives in `dcmflow-encoding`
//! and the stateful reading process in `dcmflow-parser`.

pub mod dictionary;
pub mod header;
pub mod value;

pub use crate::dictionary::DataDictionary;
pub use crate::header::{DataElement, DataElementHeader, HasLength, Header, Length, Tag, VR};
pub use crate::value::{PrimitiveValue, Value as DicomValue};
