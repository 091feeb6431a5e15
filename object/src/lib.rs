#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! This crate contains a high-level abstraction for reading DICOM
//! content as an in-memory data set.
//!
//! The structures provided here sit on top of the stateful parser:
//! [`FileDataSet`] represents a whole file (meta group included), and
//! [`DataSet`](crate::mem::DataSet) represents an ordered collection of
//! data elements, as found at the root of a file or nested in a
//! sequence item. Image frames are delivered through an optional
//! bounded channel while the data set is being read; see the
//! [`frame`] module.

pub mod file;
pub mod frame;
pub mod mem;
pub mod meta;

use dcmflow_core::Tag;
use snafu::{Backtrace, Snafu};
use std::fmt;
use std::io;

pub use crate::file::{
    from_reader, from_reader_with_options, open_file, open_file_with_options, FileDataSet,
    ParseOptions,
};
pub use crate::frame::{Frame, FrameData, FrameSink, ImageGeometry};
pub use crate::mem::DataSet;
pub use crate::meta::FileMetaTable;

/// An error which may occur when reading a DICOM data set.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ReadError {
    /// Could not read the file preamble
    #[snafu(display("Could not read the file preamble"))]
    ReadPreamble {
        source: io::Error,
        backtrace: Backtrace,
    },
    /// Could not open the file
    #[snafu(display("Could not open file {}", filename.display()))]
    OpenFile {
        filename: std::path::PathBuf,
        source: io::Error,
        backtrace: Backtrace,
    },
    /// Could not parse the file meta group
    #[snafu(display("Could not parse the file meta group"))]
    ParseMetaDataSet {
        #[snafu(backtrace)]
        source: crate::meta::Error,
    },
    /// The transfer syntax requires a data set codec
    /// which is not supported
    #[snafu(display("Unsupported transfer syntax {}", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
    /// Could not create the data set parser
    #[snafu(display("Could not create the data set parser"))]
    CreateParser {
        #[snafu(backtrace)]
        source: dcmflow_parser::dataset::read::Error,
    },
    /// Could not read a data set token
    #[snafu(display("Could not read a data set token"))]
    ReadToken {
        #[snafu(backtrace)]
        source: dcmflow_parser::dataset::read::Error,
    },
    /// An element header was not followed by a value token
    #[snafu(display("Missing data value after element header"))]
    MissingElementValue { backtrace: Backtrace },
    /// A token arrived at an unexpected place in the data set stream
    #[snafu(display("Unexpected token {} in data set", token))]
    UnexpectedToken { token: String, backtrace: Backtrace },
    /// The token stream ended before the data set was complete
    #[snafu(display("Premature data set end"))]
    PrematureEnd { backtrace: Backtrace },
    /// The frame receiver hung up while frames were still due,
    /// so the emit obligation cannot be met
    #[snafu(display(
        "The frame receiver was disconnected while frame {} was pending",
        index
    ))]
    SendFrame { index: u32, backtrace: Backtrace },
}

pub type Result<T, E = ReadError> = std::result::Result<T, E>;

/// A recoverable anomaly found while reading a data set.
///
/// Warnings are also reported through `tracing`, but they are
/// recorded as part of the parse outcome so that consumers can inspect
/// them without scraping logs.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ParseWarning {
    /// The transfer syntax UID in the meta group was not recognized;
    /// reading proceeded in Implicit VR Little Endian.
    UnknownTransferSyntax {
        /// the UID as found in the meta group
        uid: String,
    },
    /// The declared specific character set was not recognized;
    /// the previously active character set was kept.
    UnresolvedCharacterSet {
        /// the character set code as found in the data set
        code: String,
    },
    /// Pixel data was found, but the geometry attributes required for
    /// frame extraction were not present in the data set.
    MissingGeometry {
        /// the names of the missing attributes
        missing: Vec<&'static str>,
    },
    /// The native pixel data buffer does not divide evenly into the
    /// computed number of frames; the residue was not framed.
    PixelDataResidue {
        /// number of residual bytes
        bytes: u64,
    },
    /// A data element appeared more than once at the same level.
    DuplicateElement {
        /// the repeated tag
        tag: Tag,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseWarning::UnknownTransferSyntax { uid } => {
                write!(f, "unknown transfer syntax `{}`, assuming Implicit VR Little Endian", uid)
            }
            ParseWarning::UnresolvedCharacterSet { code } => {
                write!(f, "unsupported specific character set `{}`", code)
            }
            ParseWarning::MissingGeometry { missing } => {
                write!(f, "missing image geometry attributes: {}", missing.join(", "))
            }
            ParseWarning::PixelDataResidue { bytes } => {
                write!(f, "{} residual bytes of pixel data were not framed", bytes)
            }
            ParseWarning::DuplicateElement { tag } => {
                write!(f, "duplicate data element {}", tag)
            }
        }
    }
}
