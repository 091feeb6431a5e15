//! Stateful decoding of DICOM content from a byte source.

pub mod decode;
