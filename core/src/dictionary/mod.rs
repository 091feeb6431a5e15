//! Core attribute dictionary types.
//!
//! A data dictionary maps attribute tags to their canonical value
//! representation and keyword. The standard dictionary implementation
//! lives in the `dcmflow-dictionary-std` crate; this module only hosts
//! the traits and entry types which dictionaries are made of.

use crate::header::{Tag, VR};

pub mod stub;

/// Specification of a range of tags pertaining to an attribute.
/// Very often, the dictionary of attributes indicates a unique
/// `(group, element)` pair, but occasionally an attribute may cover
/// a range of groups or elements instead.
/// For example, _Overlay Data_ (60xx,3000) is part of a repeating group.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TagRange {
    /// Only a specific tag
    Single(Tag),
    /// The two rightmost digits of the _group_ portion are open:
    /// `(GGxx,EEEE)`
    Group100(Tag),
    /// The two rightmost digits of the _element_ portion are open:
    /// `(GGGG,EExx)`
    Element100(Tag),
}

impl TagRange {
    /// Retrieve the inner tag representation of this range,
    /// with open components zeroed out.
    pub fn inner(self) -> Tag {
        match self {
            TagRange::Single(tag) => tag,
            TagRange::Group100(tag) => tag,
            TagRange::Element100(tag) => tag,
        }
    }
}

/// The dictionary entry data type,
/// representing a DICOM attribute.
pub trait DictionaryEntry {
    /// The full possible tag range of the attribute.
    fn tag_range(&self) -> TagRange;

    /// The attribute single tag,
    /// or the inner tag of a repeating range.
    fn tag(&self) -> Tag {
        self.tag_range().inner()
    }

    /// The alias of the attribute, with no spaces, usually in UpperCamelCase.
    fn alias(&self) -> &str;

    /// The canonical value representation of the attribute.
    fn vr(&self) -> VR;
}

/// A data type for a dictionary entry with full ownership.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DictionaryEntryBuf {
    /// The attribute tag range
    pub tag: TagRange,
    /// The alias of the attribute, with no spaces, usually InCapitalizedCamelCase
    pub alias: String,
    /// The canonical value representation
    pub vr: VR,
}

impl DictionaryEntry for DictionaryEntryBuf {
    fn tag_range(&self) -> TagRange {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias.as_str()
    }
    fn vr(&self) -> VR {
        self.vr
    }
}

/// A data type for a dictionary entry with a string slice for its alias.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DictionaryEntryRef<'a> {
    /// The attribute tag range
    pub tag: TagRange,
    /// The alias of the attribute, with no spaces, usually InCapitalizedCamelCase
    pub alias: &'a str,
    /// The canonical value representation
    pub vr: VR,
}

impl<'a> DictionaryEntry for DictionaryEntryRef<'a> {
    fn tag_range(&self) -> TagRange {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias
    }
    fn vr(&self) -> VR {
        self.vr
    }
}

/// Type trait for a dictionary of DICOM attributes.
///
/// The main purpose of an attribute dictionary is to resolve the value
/// representation of an attribute during the decoding of data sets in
/// implicit VR, and to map between attribute keywords and tags.
pub trait DataDictionary {
    /// The type of the dictionary entry.
    type Entry: DictionaryEntry;

    /// Fetch an entry by its usual alias
    /// (e.g. "PatientName" or "SOPInstanceUID").
    /// Aliases (or keywords) are usually in UpperCamelCase,
    /// not separated by spaces, and are case sensitive.
    fn by_name(&self, name: &str) -> Option<&Self::Entry>;

    /// Fetch an entry by its tag.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;
}

impl<T> DataDictionary for Box<T>
where
    T: DataDictionary + ?Sized,
{
    type Entry = T::Entry;
    fn by_name(&self, name: &str) -> Option<&T::Entry> {
        (**self).by_name(name)
    }

    fn by_tag(&self, tag: Tag) -> Option<&T::Entry> {
        (**self).by_tag(tag)
    }
}

impl<'a, T> DataDictionary for &'a T
where
    T: DataDictionary,
{
    type Entry = T::Entry;
    fn by_name(&self, name: &str) -> Option<&T::Entry> {
        (**self).by_name(name)
    }

    fn by_tag(&self, tag: Tag) -> Option<&T::Entry> {
        (**self).by_tag(tag)
    }
}
