#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! This crate works on top of the DICOM decoding primitives to provide
//! transfer syntax resolution and abstraction for parsing DICOM data
//! sets, which ultimately enables the user to perceive the DICOM content
//! as a sequence of tokens.
//!
//! The byte-level bookkeeping (consumed positions and the stack of
//! byte-length limits for bounded scopes) lives in
//! [`LimitedSource`](crate::stream::LimitedSource).
//!
//! All APIs are based on synchronous I/O.
//!
//! For a more intuitive, object-oriented API, please see the
//! `dcmflow-object` crate.

pub mod dataset;
pub mod stateful;
pub mod stream;

pub use dataset::read::DataSetReader;
pub use dataset::DataToken;
pub use stateful::decode::{DynStatefulDecoder, StatefulDecode, StatefulDecoder};
pub use stream::LimitedSource;
