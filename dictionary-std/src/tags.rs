//! Constants for attribute tags commonly referred to by name.
//!
//! The set is restricted to the tags that the reading process itself
//! needs to recognize, plus a few frequently requested attributes.
//! For everything else, consult the dictionary.

use dcmflow_core::header::Tag;

/// File Meta Information Group Length (0002,0000)
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// File Meta Information Version (0002,0001)
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
/// Media Storage SOP Class UID (0002,0002)
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// Media Storage SOP Instance UID (0002,0003)
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// Transfer Syntax UID (0002,0010)
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// Implementation Class UID (0002,0012)
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
/// Implementation Version Name (0002,0013)
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);
/// Source Application Entity Title (0002,0016)
pub const SOURCE_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0016);
/// Sending Application Entity Title (0002,0017)
pub const SENDING_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0017);
/// Receiving Application Entity Title (0002,0018)
pub const RECEIVING_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0018);
/// Private Information Creator UID (0002,0100)
pub const PRIVATE_INFORMATION_CREATOR_UID: Tag = Tag(0x0002, 0x0100);
/// Private Information (0002,0102)
pub const PRIVATE_INFORMATION: Tag = Tag(0x0002, 0x0102);

/// Specific Character Set (0008,0005)
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
/// SOP Class UID (0008,0016)
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/// SOP Instance UID (0008,0018)
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/// Patient's Name (0010,0010)
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
/// Patient ID (0010,0020)
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
/// Study Instance UID (0020,000D)
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
/// Series Instance UID (0020,000E)
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);

/// Samples per Pixel (0028,0002)
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
/// Photometric Interpretation (0028,0004)
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
/// Number of Frames (0028,0008)
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
/// Rows (0028,0010)
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// Columns (0028,0011)
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// Bits Allocated (0028,0100)
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// High Bit (0028,0102)
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
/// Pixel Representation (0028,0103)
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);

/// Pixel Data (7FE0,0010)
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Item (FFFE,E000)
pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
/// Item Delimitation Item (FFFE,E00D)
pub const ITEM_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE00D);
/// Sequence Delimitation Item (FFFE,E0DD)
pub const SEQUENCE_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE0DD);
