//! Transfer syntax specifiers and the built-in registry.
//!
//! A [`TransferSyntax`] carries everything the reading process needs to
//! know about one transfer syntax: its UID, the byte order of the data,
//! whether value representations are explicit on the wire, and whether
//! the pixel data is expected in encapsulated (compressed) form.
//! The specifiers for the transfer syntaxes known to this library are
//! held in the [`registry`] module.

pub mod registry;

use crate::decode::basic::BasicDecoder;
use crate::decode::explicit_be::ExplicitVRBigEndianDecoder;
use crate::decode::explicit_le::ExplicitVRLittleEndianDecoder;
use crate::decode::implicit_le::ImplicitVRLittleEndianDecoder;
use crate::decode::DecodeFrom;
use std::io::Read;

pub use byteordered::Endianness;
pub use registry::TransferSyntaxRegistry;

/// A decoder with its type erased.
pub type DynDecoder<S> = Box<dyn DecodeFrom<S>>;

/// A DICOM transfer syntax specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSyntax {
    /// The unique identifier of the transfer syntax.
    uid: &'static str,
    /// The name of the transfer syntax.
    name: &'static str,
    /// The expected byte order of data.
    byte_order: Endianness,
    /// Whether the transfer syntax mandates an explicit value
    /// representation, or the VR is implicit.
    explicit_vr: bool,
    /// The transfer syntax' requirements regarding codecs.
    codec: Codec,
}

/// Description of the encoding and decoding requirements of a transfer
/// syntax, also used as a means to describe whether pixel data is
/// encapsulated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Codec {
    /// No codec is required; the data set and the pixel data are fully
    /// decodable.
    None,
    /// Custom decoding of the entire data set is required, but not
    /// supported. This is the case for
    /// _Deflated Explicit VR Little Endian_.
    Unsupported,
    /// The data set is decodable, but the pixel data is stored in
    /// encapsulated form, which this library surfaces without
    /// decompressing.
    EncapsulatedPixelData,
}

/// Trait for containers of transfer syntax specifiers.
///
/// Types implementing this trait are held responsible for resolving a
/// transfer syntax UID into a specifier. Usually, only one
/// implementation of this trait is used for the entire program,
/// the [`TransferSyntaxRegistry`].
pub trait TransferSyntaxIndex {
    /// Obtain a DICOM transfer syntax by its respective UID.
    ///
    /// Implementations of this method should be robust to the possible
    /// presence of trailing null characters (`\0`) in `uid`.
    fn get(&self, uid: &str) -> Option<&TransferSyntax>;
}

impl<T: ?Sized> TransferSyntaxIndex for &T
where
    T: TransferSyntaxIndex,
{
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        (**self).get(uid)
    }
}

impl TransferSyntax {
    /// Create a new transfer syntax specifier from its parts.
    pub const fn new(
        uid: &'static str,
        name: &'static str,
        byte_order: Endianness,
        explicit_vr: bool,
        codec: Codec,
    ) -> Self {
        TransferSyntax {
            uid,
            name,
            byte_order,
            explicit_vr,
            codec,
        }
    }

    /// Obtain this transfer syntax' unique identifier.
    pub const fn uid(&self) -> &'static str {
        self.uid
    }

    /// Obtain the name of this transfer syntax.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Obtain this transfer syntax' expected endianness.
    pub const fn endianness(&self) -> Endianness {
        self.byte_order
    }

    /// Check whether this transfer syntax mandates explicit value
    /// representations on the wire.
    pub const fn explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Obtain this transfer syntax' codec specification.
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Check whether this transfer syntax specifier provides a complete
    /// implementation, pixel data included.
    pub fn fully_supported(&self) -> bool {
        matches!(self.codec, Codec::None)
    }

    /// Check whether reading of data sets is unsupported.
    /// If this is `true`, decoding is not available.
    pub fn unsupported(&self) -> bool {
        matches!(self.codec, Codec::Unsupported)
    }

    /// Check whether the pixel data is only available in encapsulated
    /// form. If this is `true`, decoding of the data set will still
    /// be possible.
    pub fn encapsulated_pixeldata(&self) -> bool {
        matches!(self.codec, Codec::EncapsulatedPixelData)
    }

    /// Retrieve the appropriate data element decoder for this transfer
    /// syntax and given reader type.
    /// Can yield none if decoding is not supported.
    pub fn decoder_for<S>(&self) -> Option<DynDecoder<S>>
    where
        S: ?Sized + Read,
    {
        if self.unsupported() {
            return None;
        }
        match (self.byte_order, self.explicit_vr) {
            (Endianness::Little, false) => {
                Some(Box::new(ImplicitVRLittleEndianDecoder::default()))
            }
            (Endianness::Little, true) => {
                Some(Box::new(ExplicitVRLittleEndianDecoder::default()))
            }
            (Endianness::Big, true) => Some(Box::new(ExplicitVRBigEndianDecoder::default())),
            _ => None,
        }
    }

    /// Obtain a dynamic basic decoder, based on this transfer syntax'
    /// expected endianness.
    pub fn basic_decoder(&self) -> BasicDecoder {
        BasicDecoder::from(self.endianness())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_specifier_properties() {
        let ts = registry::IMPLICIT_VR_LITTLE_ENDIAN;
        assert_eq!(ts.uid(), "1.2.840.10008.1.2");
        assert_eq!(ts.endianness(), Endianness::Little);
        assert!(!ts.explicit_vr());
        assert!(ts.fully_supported());

        let ts = registry::EXPLICIT_VR_BIG_ENDIAN;
        assert_eq!(ts.endianness(), Endianness::Big);
        assert!(ts.explicit_vr());
    }

    #[test]
    fn decoders_are_available_for_base_syntaxes() {
        for ts in [
            &registry::IMPLICIT_VR_LITTLE_ENDIAN,
            &registry::EXPLICIT_VR_LITTLE_ENDIAN,
            &registry::EXPLICIT_VR_BIG_ENDIAN,
        ] {
            assert!(
                ts.decoder_for::<dyn Read>().is_some(),
                "missing decoder for {}",
                ts.name()
            );
        }
    }

    #[test]
    fn deflated_has_no_decoder() {
        let ts = registry::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN;
        assert!(ts.unsupported());
        assert!(ts.decoder_for::<dyn Read>().is_none());
    }
}
