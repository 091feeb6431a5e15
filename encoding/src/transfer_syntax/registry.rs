//! The built-in transfer syntax registry.
//!
//! The registry maps the UID of a transfer syntax into the respective
//! specifier. It is populated once, before first use, with the compiled
//! entries below. Higher level APIs should learn to negotiate and
//! resolve the expected transfer syntax automatically through
//! [`TransferSyntaxRegistry`].

use super::{Codec, Endianness, TransferSyntax, TransferSyntaxIndex};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

// -- the three base transfer syntaxes, fully supported --

/// **Fully implemented:** Implicit VR Little Endian:
/// Default Transfer Syntax for DICOM
pub const IMPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2",
    "Implicit VR Little Endian",
    Endianness::Little,
    false,
    Codec::None,
);

/// **Fully implemented:** Explicit VR Little Endian
pub const EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.1",
    "Explicit VR Little Endian",
    Endianness::Little,
    true,
    Codec::None,
);

/// **Fully implemented:** Explicit VR Big Endian
pub const EXPLICIT_VR_BIG_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.2",
    "Explicit VR Big Endian",
    Endianness::Big,
    true,
    Codec::None,
);

// --- stub transfer syntaxes, data set not decodable ---

/// **Stub descriptor:** Deflated Explicit VR Little Endian
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.1.99",
    "Deflated Explicit VR Little Endian",
    Endianness::Little,
    true,
    Codec::Unsupported,
);

// --- encapsulated pixel data transfer syntaxes:
//     the data set is decodable, frames stay compressed ---

/// create a TS with an unsupported pixel encapsulation
const fn create_ts_stub(uid: &'static str, name: &'static str) -> TransferSyntax {
    TransferSyntax::new(
        uid,
        name,
        Endianness::Little,
        true,
        Codec::EncapsulatedPixelData,
    )
}

/// **Encapsulated:** JPEG Baseline (Process 1):
/// Default Transfer Syntax for Lossy JPEG 8 Bit Image Compression
pub const JPEG_BASELINE: TransferSyntax =
    create_ts_stub("1.2.840.10008.1.2.4.50", "JPEG Baseline (Process 1)");
/// **Encapsulated:** JPEG Extended (Process 2 & 4):
/// Default Transfer Syntax for Lossy JPEG 12 Bit Image Compression
pub const JPEG_EXTENDED: TransferSyntax =
    create_ts_stub("1.2.840.10008.1.2.4.51", "JPEG Extended (Process 2 & 4)");
/// **Encapsulated:** JPEG Lossless, Non-Hierarchical (Process 14)
pub const JPEG_LOSSLESS_NON_HIERARCHICAL: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.57",
    "JPEG Lossless, Non-Hierarchical (Process 14)",
);
/// **Encapsulated:** JPEG Lossless, Non-Hierarchical, First-Order
/// Prediction (Process 14 [Selection Value 1]):
/// Default Transfer Syntax for Lossless JPEG Image Compression
pub const JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.70",
    "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
);
/// **Encapsulated:** JPEG-LS Lossless Image Compression
pub const JPEG_LS_LOSSLESS_IMAGE_COMPRESSION: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.80",
    "JPEG-LS Lossless Image Compression",
);
/// **Encapsulated:** JPEG-LS Lossy (Near-Lossless) Image Compression
pub const JPEG_LS_LOSSY_IMAGE_COMPRESSION: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.81",
    "JPEG-LS Lossy (Near-Lossless) Image Compression",
);
/// **Encapsulated:** JPEG 2000 Image Compression (Lossless Only)
pub const JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY: TransferSyntax = create_ts_stub(
    "1.2.840.10008.1.2.4.90",
    "JPEG 2000 Image Compression (Lossless Only)",
);
/// **Encapsulated:** JPEG 2000 Image Compression
pub const JPEG_2000_IMAGE_COMPRESSION: TransferSyntax =
    create_ts_stub("1.2.840.10008.1.2.4.91", "JPEG 2000 Image Compression");
/// **Encapsulated:** JPIP Referenced
pub const JPIP_REFERENCED: TransferSyntax =
    create_ts_stub("1.2.840.10008.1.2.4.94", "JPIP Referenced");
/// **Encapsulated:** RLE Lossless
pub const RLE_LOSSLESS: TransferSyntax =
    create_ts_stub("1.2.840.10008.1.2.5", "RLE Lossless");

/// The fixed set of transfer syntax specifiers known to this library.
static ENTRIES: &[TransferSyntax] = &[
    IMPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_BIG_ENDIAN,
    DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
    JPEG_BASELINE,
    JPEG_EXTENDED,
    JPEG_LOSSLESS_NON_HIERARCHICAL,
    JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION,
    JPEG_LS_LOSSLESS_IMAGE_COMPRESSION,
    JPEG_LS_LOSSY_IMAGE_COMPRESSION,
    JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY,
    JPEG_2000_IMAGE_COMPRESSION,
    JPIP_REFERENCED,
    RLE_LOSSLESS,
];

/// Data type for the registry of transfer syntaxes.
pub struct TransferSyntaxRegistryImpl {
    m: HashMap<&'static str, &'static TransferSyntax>,
}

impl fmt::Debug for TransferSyntaxRegistryImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries: HashMap<&str, &str> =
            self.m.iter().map(|(uid, ts)| (*uid, ts.name())).collect();
        f.debug_struct("TransferSyntaxRegistryImpl")
            .field("m", &entries)
            .finish()
    }
}

impl TransferSyntaxRegistryImpl {
    /// Obtain a transfer syntax specifier by UID.
    fn get<U: AsRef<str>>(&self, uid: U) -> Option<&'static TransferSyntax> {
        let ts_uid = uid
            .as_ref()
            .trim_end_matches(|c: char| c == '\0' || c == ' ');
        self.m.get(ts_uid).copied()
    }
}

impl TransferSyntaxIndex for TransferSyntaxRegistryImpl {
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        Self::get(self, uid).map(|ts| ts as &TransferSyntax)
    }
}

/// Zero-sized representative of the main transfer syntax registry.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TransferSyntaxRegistry;

impl TransferSyntaxIndex for TransferSyntaxRegistry {
    fn get(&self, uid: &str) -> Option<&TransferSyntax> {
        get_registry().get(uid).map(|ts| ts as &TransferSyntax)
    }
}

static REGISTRY: Lazy<TransferSyntaxRegistryImpl> = Lazy::new(|| {
    let mut m = HashMap::with_capacity(ENTRIES.len());
    for ts in ENTRIES {
        m.insert(ts.uid(), ts);
    }
    TransferSyntaxRegistryImpl { m }
});

/// Retrieve a reference to the global transfer syntax registry.
pub(crate) fn get_registry() -> &'static TransferSyntaxRegistryImpl {
    &REGISTRY
}

/// Retrieve the default transfer syntax.
pub fn default() -> &'static TransferSyntax {
    &IMPLICIT_VR_LITTLE_ENDIAN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_base_uids() {
        let index = TransferSyntaxRegistry;

        let ts = index
            .get("1.2.840.10008.1.2")
            .expect("implicit VR LE should be registered");
        assert_eq!(ts.name(), "Implicit VR Little Endian");

        let ts = index
            .get("1.2.840.10008.1.2.1")
            .expect("explicit VR LE should be registered");
        assert!(ts.explicit_vr());

        let ts = index
            .get("1.2.840.10008.1.2.2")
            .expect("explicit VR BE should be registered");
        assert_eq!(ts.endianness(), Endianness::Big);
    }

    #[test]
    fn resolve_uid_with_trailing_nul() {
        let index = TransferSyntaxRegistry;
        let ts = index
            .get("1.2.840.10008.1.2.1\0")
            .expect("trailing padding should be tolerated");
        assert_eq!(ts.uid(), "1.2.840.10008.1.2.1");
    }

    #[test]
    fn encapsulated_family_is_registered() {
        let index = TransferSyntaxRegistry;
        for uid in [
            "1.2.840.10008.1.2.4.50",
            "1.2.840.10008.1.2.4.70",
            "1.2.840.10008.1.2.4.90",
            "1.2.840.10008.1.2.5",
        ] {
            let ts = index.get(uid).expect("should resolve");
            assert!(ts.encapsulated_pixeldata(), "{} should be encapsulated", uid);
        }
    }

    #[test]
    fn unknown_uid_is_not_resolved() {
        let index = TransferSyntaxRegistry;
        assert!(index.get("1.2.840.999.9.9").is_none());
    }
}
