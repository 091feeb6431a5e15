//! Standard dictionary entry table.
//!
//! This table was assembled from the data element registry of
//! DICOM PS3.6. It is not the complete registry; it covers the file meta
//! group and the attributes most commonly found in composite image
//! objects. Where the standard admits more than one value representation
//! (e.g. "OB or OW"), the wider representation is recorded and the
//! alternative is kept as a comment.

use dcmflow_core::dictionary::{DictionaryEntryRef, TagRange::*};
use dcmflow_core::header::Tag;
use dcmflow_core::header::VR::*;

type E = DictionaryEntryRef<'static>;

#[rustfmt::skip]
pub const ENTRIES: &[E] = &[
    // group 0002: file meta information
    E { tag: Single(Tag(0x0002, 0x0000)), alias: "FileMetaInformationGroupLength", vr: UL },
    E { tag: Single(Tag(0x0002, 0x0001)), alias: "FileMetaInformationVersion", vr: OB },
    E { tag: Single(Tag(0x0002, 0x0002)), alias: "MediaStorageSOPClassUID", vr: UI },
    E { tag: Single(Tag(0x0002, 0x0003)), alias: "MediaStorageSOPInstanceUID", vr: UI },
    E { tag: Single(Tag(0x0002, 0x0010)), alias: "TransferSyntaxUID", vr: UI },
    E { tag: Single(Tag(0x0002, 0x0012)), alias: "ImplementationClassUID", vr: UI },
    E { tag: Single(Tag(0x0002, 0x0013)), alias: "ImplementationVersionName", vr: SH },
    E { tag: Single(Tag(0x0002, 0x0016)), alias: "SourceApplicationEntityTitle", vr: AE },
    E { tag: Single(Tag(0x0002, 0x0017)), alias: "SendingApplicationEntityTitle", vr: AE },
    E { tag: Single(Tag(0x0002, 0x0018)), alias: "ReceivingApplicationEntityTitle", vr: AE },
    E { tag: Single(Tag(0x0002, 0x0100)), alias: "PrivateInformationCreatorUID", vr: UI },
    E { tag: Single(Tag(0x0002, 0x0102)), alias: "PrivateInformation", vr: OB },
    // group 0008
    E { tag: Single(Tag(0x0008, 0x0005)), alias: "SpecificCharacterSet", vr: CS },
    E { tag: Single(Tag(0x0008, 0x0008)), alias: "ImageType", vr: CS },
    E { tag: Single(Tag(0x0008, 0x0016)), alias: "SOPClassUID", vr: UI },
    E { tag: Single(Tag(0x0008, 0x0018)), alias: "SOPInstanceUID", vr: UI },
    E { tag: Single(Tag(0x0008, 0x0020)), alias: "StudyDate", vr: DA },
    E { tag: Single(Tag(0x0008, 0x0021)), alias: "SeriesDate", vr: DA },
    E { tag: Single(Tag(0x0008, 0x0022)), alias: "AcquisitionDate", vr: DA },
    E { tag: Single(Tag(0x0008, 0x0023)), alias: "ContentDate", vr: DA },
    E { tag: Single(Tag(0x0008, 0x002A)), alias: "AcquisitionDateTime", vr: DT },
    E { tag: Single(Tag(0x0008, 0x0030)), alias: "StudyTime", vr: TM },
    E { tag: Single(Tag(0x0008, 0x0031)), alias: "SeriesTime", vr: TM },
    E { tag: Single(Tag(0x0008, 0x0032)), alias: "AcquisitionTime", vr: TM },
    E { tag: Single(Tag(0x0008, 0x0033)), alias: "ContentTime", vr: TM },
    E { tag: Single(Tag(0x0008, 0x0050)), alias: "AccessionNumber", vr: SH },
    E { tag: Single(Tag(0x0008, 0x0060)), alias: "Modality", vr: CS },
    E { tag: Single(Tag(0x0008, 0x0064)), alias: "ConversionType", vr: CS },
    E { tag: Single(Tag(0x0008, 0x0070)), alias: "Manufacturer", vr: LO },
    E { tag: Single(Tag(0x0008, 0x0080)), alias: "InstitutionName", vr: LO },
    E { tag: Single(Tag(0x0008, 0x0090)), alias: "ReferringPhysicianName", vr: PN },
    E { tag: Single(Tag(0x0008, 0x0100)), alias: "CodeValue", vr: SH },
    E { tag: Single(Tag(0x0008, 0x0102)), alias: "CodingSchemeDesignator", vr: SH },
    E { tag: Single(Tag(0x0008, 0x0104)), alias: "CodeMeaning", vr: LO },
    E { tag: Single(Tag(0x0008, 0x1030)), alias: "StudyDescription", vr: LO },
    E { tag: Single(Tag(0x0008, 0x1032)), alias: "ProcedureCodeSequence", vr: SQ },
    E { tag: Single(Tag(0x0008, 0x103E)), alias: "SeriesDescription", vr: LO },
    E { tag: Single(Tag(0x0008, 0x1090)), alias: "ManufacturerModelName", vr: LO },
    E { tag: Single(Tag(0x0008, 0x1111)), alias: "ReferencedPerformedProcedureStepSequence", vr: SQ },
    E { tag: Single(Tag(0x0008, 0x1115)), alias: "ReferencedSeriesSequence", vr: SQ },
    E { tag: Single(Tag(0x0008, 0x1140)), alias: "ReferencedImageSequence", vr: SQ },
    E { tag: Single(Tag(0x0008, 0x1150)), alias: "ReferencedSOPClassUID", vr: UI },
    E { tag: Single(Tag(0x0008, 0x1155)), alias: "ReferencedSOPInstanceUID", vr: UI },
    E { tag: Single(Tag(0x0008, 0x2218)), alias: "AnatomicRegionSequence", vr: SQ },
    // group 0010
    E { tag: Single(Tag(0x0010, 0x0010)), alias: "PatientName", vr: PN },
    E { tag: Single(Tag(0x0010, 0x0020)), alias: "PatientID", vr: LO },
    E { tag: Single(Tag(0x0010, 0x0030)), alias: "PatientBirthDate", vr: DA },
    E { tag: Single(Tag(0x0010, 0x0040)), alias: "PatientSex", vr: CS },
    E { tag: Single(Tag(0x0010, 0x1010)), alias: "PatientAge", vr: AS },
    E { tag: Single(Tag(0x0010, 0x1020)), alias: "PatientSize", vr: DS },
    E { tag: Single(Tag(0x0010, 0x1030)), alias: "PatientWeight", vr: DS },
    E { tag: Single(Tag(0x0010, 0x4000)), alias: "PatientComments", vr: LT },
    // group 0018
    E { tag: Single(Tag(0x0018, 0x0015)), alias: "BodyPartExamined", vr: CS },
    E { tag: Single(Tag(0x0018, 0x0050)), alias: "SliceThickness", vr: DS },
    E { tag: Single(Tag(0x0018, 0x0060)), alias: "KVP", vr: DS },
    E { tag: Single(Tag(0x0018, 0x1000)), alias: "DeviceSerialNumber", vr: LO },
    E { tag: Single(Tag(0x0018, 0x1020)), alias: "SoftwareVersions", vr: LO },
    E { tag: Single(Tag(0x0018, 0x1030)), alias: "ProtocolName", vr: LO },
    E { tag: Single(Tag(0x0018, 0x1151)), alias: "XRayTubeCurrent", vr: IS },
    E { tag: Single(Tag(0x0018, 0x5100)), alias: "PatientPosition", vr: CS },
    E { tag: Single(Tag(0x0018, 0x6011)), alias: "SequenceOfUltrasoundRegions", vr: SQ },
    E { tag: Single(Tag(0x0018, 0x6012)), alias: "RegionSpatialFormat", vr: US },
    E { tag: Single(Tag(0x0018, 0x6014)), alias: "RegionDataType", vr: US },
    // group 0020
    E { tag: Single(Tag(0x0020, 0x000D)), alias: "StudyInstanceUID", vr: UI },
    E { tag: Single(Tag(0x0020, 0x000E)), alias: "SeriesInstanceUID", vr: UI },
    E { tag: Single(Tag(0x0020, 0x0010)), alias: "StudyID", vr: SH },
    E { tag: Single(Tag(0x0020, 0x0011)), alias: "SeriesNumber", vr: IS },
    E { tag: Single(Tag(0x0020, 0x0013)), alias: "InstanceNumber", vr: IS },
    E { tag: Single(Tag(0x0020, 0x0032)), alias: "ImagePositionPatient", vr: DS },
    E { tag: Single(Tag(0x0020, 0x0037)), alias: "ImageOrientationPatient", vr: DS },
    E { tag: Single(Tag(0x0020, 0x0052)), alias: "FrameOfReferenceUID", vr: UI },
    E { tag: Single(Tag(0x0020, 0x1041)), alias: "SliceLocation", vr: DS },
    E { tag: Single(Tag(0x0020, 0x4000)), alias: "ImageComments", vr: LT },
    // group 0028
    E { tag: Single(Tag(0x0028, 0x0002)), alias: "SamplesPerPixel", vr: US },
    E { tag: Single(Tag(0x0028, 0x0004)), alias: "PhotometricInterpretation", vr: CS },
    E { tag: Single(Tag(0x0028, 0x0006)), alias: "PlanarConfiguration", vr: US },
    E { tag: Single(Tag(0x0028, 0x0008)), alias: "NumberOfFrames", vr: IS },
    E { tag: Single(Tag(0x0028, 0x0010)), alias: "Rows", vr: US },
    E { tag: Single(Tag(0x0028, 0x0011)), alias: "Columns", vr: US },
    E { tag: Single(Tag(0x0028, 0x0030)), alias: "PixelSpacing", vr: DS },
    E { tag: Single(Tag(0x0028, 0x0100)), alias: "BitsAllocated", vr: US },
    E { tag: Single(Tag(0x0028, 0x0101)), alias: "BitsStored", vr: US },
    E { tag: Single(Tag(0x0028, 0x0102)), alias: "HighBit", vr: US },
    E { tag: Single(Tag(0x0028, 0x0103)), alias: "PixelRepresentation", vr: US },
    E { tag: Single(Tag(0x0028, 0x1050)), alias: "WindowCenter", vr: DS },
    E { tag: Single(Tag(0x0028, 0x1051)), alias: "WindowWidth", vr: DS },
    E { tag: Single(Tag(0x0028, 0x1052)), alias: "RescaleIntercept", vr: DS },
    E { tag: Single(Tag(0x0028, 0x1053)), alias: "RescaleSlope", vr: DS },
    E { tag: Single(Tag(0x0028, 0x2110)), alias: "LossyImageCompression", vr: CS },
    // group 0032
    E { tag: Single(Tag(0x0032, 0x1060)), alias: "RequestedProcedureDescription", vr: LO },
    // group 0040
    E { tag: Single(Tag(0x0040, 0x0007)), alias: "ScheduledProcedureStepDescription", vr: LO },
    E { tag: Single(Tag(0x0040, 0x0009)), alias: "ScheduledProcedureStepID", vr: SH },
    E { tag: Single(Tag(0x0040, 0x0254)), alias: "PerformedProcedureStepDescription", vr: LO },
    E { tag: Single(Tag(0x0040, 0x0260)), alias: "PerformedProtocolCodeSequence", vr: SQ },
    E { tag: Single(Tag(0x0040, 0x0275)), alias: "RequestAttributesSequence", vr: SQ },
    E { tag: Single(Tag(0x0040, 0x0555)), alias: "AcquisitionContextSequence", vr: SQ },
    E { tag: Single(Tag(0x0040, 0x1001)), alias: "RequestedProcedureID", vr: SH },
    E { tag: Single(Tag(0x0040, 0xA730)), alias: "ContentSequence", vr: SQ },
    // group 2050
    E { tag: Single(Tag(0x2050, 0x0020)), alias: "PresentationLUTShape", vr: CS },
    // group 5200
    E { tag: Single(Tag(0x5200, 0x9229)), alias: "SharedFunctionalGroupsSequence", vr: SQ },
    E { tag: Single(Tag(0x5200, 0x9230)), alias: "PerFrameFunctionalGroupsSequence", vr: SQ },
    // group 60xx: repeating overlay group
    E { tag: Group100(Tag(0x6000, 0x0010)), alias: "OverlayRows", vr: US },
    E { tag: Group100(Tag(0x6000, 0x0011)), alias: "OverlayColumns", vr: US },
    E { tag: Group100(Tag(0x6000, 0x0040)), alias: "OverlayType", vr: CS },
    E { tag: Group100(Tag(0x6000, 0x0050)), alias: "OverlayOrigin", vr: SS },
    E { tag: Group100(Tag(0x6000, 0x0100)), alias: "OverlayBitsAllocated", vr: US },
    E { tag: Group100(Tag(0x6000, 0x0102)), alias: "OverlayBitPosition", vr: US },
    E { tag: Group100(Tag(0x6000, 0x3000)), alias: "OverlayData", vr: OW /* or OB */ },
    // group 7FE0
    E { tag: Single(Tag(0x7FE0, 0x0008)), alias: "FloatPixelData", vr: OF },
    E { tag: Single(Tag(0x7FE0, 0x0009)), alias: "DoubleFloatPixelData", vr: OD },
    E { tag: Single(Tag(0x7FE0, 0x0010)), alias: "PixelData", vr: OW /* or OB */ },
    // miscellaneous
    E { tag: Single(Tag(0xFFFA, 0xFFFA)), alias: "DigitalSignaturesSequence", vr: SQ },
    E { tag: Single(Tag(0xFFFC, 0xFFFC)), alias: "DataSetTrailingPadding", vr: OB },
];
