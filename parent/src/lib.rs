//! This crate serves as a parent for the library crates of the dcmflow
//! project, re-exporting the pieces of the public API that most
//! consumers need.
//!
//! For reading DICOM files, start with [`object::open_file`] or
//! [`object::from_reader`]; to receive image frames while reading,
//! create a channel with [`object::FrameSink::channel`] and pass the
//! sink through [`object::ParseOptions`].

pub use dcmflow_core as core;
pub use dcmflow_dictionary_std as dictionary_std;
pub use dcmflow_encoding as encoding;
pub use dcmflow_object as object;
pub use dcmflow_parser as parser;

pub use dcmflow_core::{DataElement, Length, PrimitiveValue, Tag, VR};
pub use dcmflow_object::{
    from_reader, open_file, DataSet, FileDataSet, Frame, FrameSink, ParseOptions,
};
