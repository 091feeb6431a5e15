#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! DICOM decoding primitives.
//!
//! This crate provides interfaces and data structures for decoding data
//! in accordance to the DICOM standard: endian-aware primitive decoding,
//! data element header decoding per transfer syntax, character set
//! decoding, and the concept of a [transfer syntax specifier] resolved
//! from the built-in registry.
//!
//! All APIs are based on synchronous I/O.
//!
//! [transfer syntax specifier]: ./transfer_syntax/index.html

pub mod decode;
pub mod text;
pub mod transfer_syntax;

pub use decode::Decode;
pub use transfer_syntax::{Codec, TransferSyntax, TransferSyntaxIndex};
