//! An in-memory DICOM data set, built from the data set token stream.

use crate::frame::{self, FrameAssembler, FrameSink, ImageGeometry};
use crate::{
    MissingElementValueSnafu, ParseWarning, PrematureEndSnafu, ReadTokenSnafu, Result,
    UnexpectedTokenSnafu,
};
use dcmflow_core::dictionary::{DataDictionary, DictionaryEntry};
use dcmflow_core::header::{HasLength, Header};
use dcmflow_core::value::{Value, C};
use dcmflow_core::{DataElement, Length, PrimitiveValue, Tag, VR};
use dcmflow_dictionary_std::{tags, StandardDataDictionary};
use dcmflow_encoding::text::SpecificCharacterSet;
use dcmflow_parser::dataset::{DataSetReader, DataToken};
use dcmflow_parser::StatefulDecode;
use smallvec::SmallVec;
use snafu::{OptionExt, ResultExt};
use std::borrow::Cow;

/// A data element of the file meta group,
/// which can only hold a primitive value.
pub type MetaElement = DataElement;

/// A fully in-memory data element,
/// where sequence items are nested data sets
/// and pixel data fragments are byte vectors.
pub type MemElement<D = StandardDataDictionary> = DataElement<DataSet<D>, Vec<u8>>;

/// An ordered collection of DICOM data elements,
/// as found at the root of a file or nested in a sequence item.
///
/// Insertion order (that is, file order) is preserved, and elements with
/// repeated tags are kept; lookups return the first match.
#[derive(Debug, Clone)]
pub struct DataSet<D = StandardDataDictionary> {
    /// the element sequence, in file order
    elements: Vec<MemElement<D>>,
    /// the attribute dictionary used for name lookups
    dict: D,
    /// The length of the data set in bytes.
    /// It is usually undefined, unless it is part of an item
    /// in a sequence with a specified length in its item header.
    len: Length,
}

impl<D> PartialEq for DataSet<D> {
    // this implementation ignores the data dictionary
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<D> HasLength for DataSet<D> {
    fn length(&self) -> Length {
        self.len
    }
}

impl DataSet<StandardDataDictionary> {
    /// Create a new empty data set.
    pub fn new() -> Self {
        DataSet::new_with_dict(StandardDataDictionary)
    }
}

impl Default for DataSet<StandardDataDictionary> {
    fn default() -> Self {
        DataSet::new()
    }
}

impl<D> DataSet<D> {
    /// Create a new empty data set,
    /// using the given dictionary for name lookups.
    pub fn new_with_dict(dict: D) -> Self {
        DataSet {
            elements: Vec::new(),
            dict,
            len: Length::UNDEFINED,
        }
    }

    /// Construct a data set from its parts.
    pub(crate) fn from_parts(elements: Vec<MemElement<D>>, dict: D, len: Length) -> Self {
        DataSet {
            elements,
            dict,
            len,
        }
    }

    /// Retrieve the first data element with the given tag,
    /// if one exists.
    pub fn element(&self, tag: Tag) -> Option<&MemElement<D>> {
        self.elements.iter().find(|e| e.tag() == tag)
    }

    /// The number of top-level elements in the data set.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a data element to the data set.
    pub fn put(&mut self, elem: MemElement<D>) {
        self.elements.push(elem);
    }

    /// Iterate over the data elements in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, MemElement<D>> {
        self.elements.iter()
    }
}

impl<D> DataSet<D>
where
    D: DataDictionary,
{
    /// Retrieve the first data element with the given keyword
    /// (e.g. `"PatientName"`), if one exists.
    pub fn element_by_name(&self, name: &str) -> Option<&MemElement<D>> {
        let tag = self.dict.by_name(name)?.tag();
        self.element(tag)
    }
}

impl<'a, D> IntoIterator for &'a DataSet<D> {
    type Item = &'a MemElement<D>;
    type IntoIter = std::slice::Iter<'a, MemElement<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<D> IntoIterator for DataSet<D> {
    type Item = MemElement<D>;
    type IntoIter = std::vec::IntoIter<MemElement<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// Convert an element of the file meta group into a full in-memory
/// element, so that the meta group can form the first block of the
/// data set.
pub(crate) fn meta_to_mem<D>(elem: MetaElement) -> MemElement<D> {
    let header = *elem.header();
    let value = match elem.into_value() {
        Value::Primitive(v) => Value::Primitive(v),
        Value::Sequence { items, size } => Value::Sequence {
            items: items.into_iter().map(|e| match e {}).collect(),
            size,
        },
        Value::PixelSequence {
            offset_table,
            fragments,
        } => Value::PixelSequence {
            offset_table,
            fragments: fragments.into_iter().map(|f| f.to_vec()).collect(),
        },
    };
    DataElement::new_with_len(header.tag, header.vr, header.len, value)
}

/// State carried through the construction of a data set:
/// the optional frame sink and the warnings gathered along the way.
#[derive(Debug, Default)]
pub(crate) struct BuildContext {
    pub sink: Option<FrameSink>,
    pub warnings: Vec<ParseWarning>,
}

impl<D> DataSet<D>
where
    D: DataDictionary + Clone,
{
    /// Build a data set by consuming a data set token reader.
    ///
    /// `in_item` signals that the data set is the content of a sequence
    /// item, which ends on the matching item end token. Frame
    /// extraction and warnings are driven through `ctx` and only apply
    /// to the top level.
    pub(crate) fn build_object<P>(
        dataset: &mut DataSetReader<P>,
        dict: D,
        in_item: bool,
        len: Length,
        ctx: &mut BuildContext,
    ) -> Result<Self>
    where
        P: StatefulDecode,
    {
        let mut entries: Vec<MemElement<D>> = Vec::new();
        // perform a structured parsing of the incoming tokens
        while let Some(token) = dataset.next() {
            let elem = match token.context(ReadTokenSnafu)? {
                DataToken::ElementHeader(header) => {
                    // fetch the respective value
                    let next_token = dataset.next().context(MissingElementValueSnafu)?;
                    let value = match next_token.context(ReadTokenSnafu)? {
                        DataToken::PrimitiveValue(v) => v,
                        token => {
                            return UnexpectedTokenSnafu {
                                token: token.to_string(),
                            }
                            .fail();
                        }
                    };
                    let elem = DataElement::new_with_len(
                        header.tag,
                        header.vr,
                        header.len,
                        Value::Primitive(value),
                    );
                    if !in_item {
                        Self::inspect_element(&elem, &entries, ctx)?;
                    }
                    elem
                }
                DataToken::SequenceStart { tag, len } => {
                    // delegate sequence building to another function
                    let items = Self::build_sequence(dataset, &dict, ctx)?;
                    DataElement::new_with_len(tag, VR::SQ, len, Value::Sequence { items, size: len })
                }
                DataToken::PixelSequenceStart => {
                    Self::build_encapsulated_pixeldata(dataset, &entries, ctx)?
                }
                DataToken::ItemEnd if in_item => {
                    // end of item, leave now
                    return Ok(DataSet::from_parts(entries, dict, len));
                }
                token => {
                    return UnexpectedTokenSnafu {
                        token: token.to_string(),
                    }
                    .fail();
                }
            };
            if !in_item && entries.iter().any(|e| e.tag() == elem.tag()) {
                tracing::warn!("duplicate data element {}", elem.tag());
                ctx.warnings
                    .push(ParseWarning::DuplicateElement { tag: elem.tag() });
            }
            entries.push(elem);
        }

        if in_item {
            // the token stream ended before the item was closed
            return PrematureEndSnafu.fail();
        }
        Ok(DataSet::from_parts(entries, dict, len))
    }

    /// Build a DICOM sequence by consuming a data set token reader.
    fn build_sequence<P>(
        dataset: &mut DataSetReader<P>,
        dict: &D,
        ctx: &mut BuildContext,
    ) -> Result<C<DataSet<D>>>
    where
        P: StatefulDecode,
    {
        let mut items: C<_> = SmallVec::new();
        while let Some(token) = dataset.next() {
            match token.context(ReadTokenSnafu)? {
                DataToken::ItemStart { len } => {
                    items.push(Self::build_object(
                        &mut *dataset,
                        dict.clone(),
                        true,
                        len,
                        ctx,
                    )?);
                }
                DataToken::SequenceEnd => {
                    return Ok(items);
                }
                token => {
                    return UnexpectedTokenSnafu {
                        token: token.to_string(),
                    }
                    .fail();
                }
            };
        }

        // the token stream was fully consumed without a sequence end
        PrematureEndSnafu.fail()
    }

    /// Consume the tokens of an encapsulated pixel data element,
    /// assembling frames along the way.
    fn build_encapsulated_pixeldata<P>(
        dataset: &mut DataSetReader<P>,
        entries: &[MemElement<D>],
        ctx: &mut BuildContext,
    ) -> Result<MemElement<D>>
    where
        P: StatefulDecode,
    {
        let geometry = match Self::geometry_from(entries) {
            Ok(geometry) => Some(geometry),
            Err(missing) => {
                tracing::warn!(
                    "cannot extract frames, missing image geometry attributes: {}",
                    missing.join(", ")
                );
                ctx.warnings.push(ParseWarning::MissingGeometry { missing });
                None
            }
        };
        let mut assembler = FrameAssembler::new(geometry);
        let mut offset_table: C<u32> = SmallVec::new();
        let mut fragments: C<Vec<u8>> = SmallVec::new();

        loop {
            let token = match dataset.next() {
                Some(token) => token.context(ReadTokenSnafu)?,
                None => return PrematureEndSnafu.fail(),
            };
            match token {
                DataToken::ItemStart { .. } | DataToken::ItemEnd => { /* framing only */ }
                DataToken::OffsetTable(offsets) => {
                    assembler.set_offset_table(offsets.clone());
                    offset_table = offsets.into();
                }
                DataToken::ItemValue(data) => {
                    assembler.push_fragment(&data, ctx.sink.as_ref())?;
                    fragments.push(data);
                }
                DataToken::SequenceEnd => break,
                token => {
                    return UnexpectedTokenSnafu {
                        token: token.to_string(),
                    }
                    .fail();
                }
            }
        }
        assembler.finish(ctx.sink.as_ref())?;

        Ok(DataElement::new_with_len(
            tags::PIXEL_DATA,
            VR::OB,
            Length::UNDEFINED,
            Value::PixelSequence {
                offset_table,
                fragments,
            },
        ))
    }

    /// Top-level bookkeeping for a freshly read element:
    /// character set diagnostics and native pixel data frames.
    fn inspect_element(
        elem: &MemElement<D>,
        entries: &[MemElement<D>],
        ctx: &mut BuildContext,
    ) -> Result<()> {
        if elem.tag() == tags::SPECIFIC_CHARACTER_SET {
            // the decoder has already switched (or kept) the character
            // set; record unresolvable codes as part of the outcome
            if let Ok(code) = elem.string() {
                if SpecificCharacterSet::from_code(code).is_none() {
                    ctx.warnings.push(ParseWarning::UnresolvedCharacterSet {
                        code: code.trim_end().to_string(),
                    });
                }
            }
        } else if elem.tag() == tags::PIXEL_DATA {
            Self::extract_native_frames(elem, entries, ctx)?;
        }
        Ok(())
    }

    /// Slice a native (defined-length) pixel data value into frames and
    /// deliver them on the sink, when one is installed.
    fn extract_native_frames(
        elem: &MemElement<D>,
        entries: &[MemElement<D>],
        ctx: &mut BuildContext,
    ) -> Result<()> {
        let geometry = match Self::geometry_from(entries) {
            Ok(geometry) => geometry,
            Err(missing) => {
                tracing::warn!(
                    "cannot extract frames, missing image geometry attributes: {}",
                    missing.join(", ")
                );
                ctx.warnings.push(ParseWarning::MissingGeometry { missing });
                return Ok(());
            }
        };

        let number_of_frames = entries
            .iter()
            .find(|e| e.tag() == tags::NUMBER_OF_FRAMES)
            .and_then(|e| e.to_int::<u32>().ok())
            .unwrap_or(1);

        // frames are sliced over the value's raw byte form;
        // words are laid out in little endian
        let data: Cow<[u8]> = match elem.value().primitive() {
            Some(PrimitiveValue::U8(bytes)) => Cow::Borrowed(&bytes[..]),
            Some(PrimitiveValue::U16(words)) => {
                Cow::Owned(words.iter().flat_map(|w| w.to_le_bytes()).collect())
            }
            _ => return Ok(()),
        };

        if let Some(sink) = &ctx.sink {
            if let Some(warning) =
                frame::emit_native_frames(&geometry, &data, number_of_frames, sink)?
            {
                ctx.warnings.push(warning);
            }
        }
        Ok(())
    }

    /// Capture the image geometry from the data set under construction.
    /// A missing mandatory attribute fails with the list of missing
    /// attribute names.
    fn geometry_from(entries: &[MemElement<D>]) -> Result<ImageGeometry, Vec<&'static str>> {
        let find_u16 = |tag: Tag| {
            entries
                .iter()
                .find(|e| e.tag() == tag)
                .and_then(|e| e.uint16().ok())
        };

        let rows = find_u16(tags::ROWS);
        let columns = find_u16(tags::COLUMNS);
        let samples_per_pixel = find_u16(tags::SAMPLES_PER_PIXEL);
        let bits_allocated = find_u16(tags::BITS_ALLOCATED);

        match (rows, columns, samples_per_pixel, bits_allocated) {
            (Some(rows), Some(columns), Some(samples_per_pixel), Some(bits_allocated)) => {
                Ok(ImageGeometry {
                    rows,
                    columns,
                    samples_per_pixel,
                    bits_allocated,
                    high_bit: find_u16(tags::HIGH_BIT),
                    photometric_interpretation: entries
                        .iter()
                        .find(|e| e.tag() == tags::PHOTOMETRIC_INTERPRETATION)
                        .and_then(|e| e.to_str().ok())
                        .map(|s| s.into_owned()),
                })
            }
            _ => {
                let mut missing = Vec::new();
                if rows.is_none() {
                    missing.push("Rows");
                }
                if columns.is_none() {
                    missing.push("Columns");
                }
                if samples_per_pixel.is_none() {
                    missing.push("SamplesPerPixel");
                }
                if bits_allocated.is_none() {
                    missing.push("BitsAllocated");
                }
                Err(missing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn data_set_preserves_order_and_duplicates() {
        let mut ds = DataSet::new();
        ds.put(DataElement::new_with_len(
            Tag(0x0010, 0x0010),
            VR::PN,
            Length(4),
            Value::Primitive(PrimitiveValue::Strs(smallvec!["DOE^".to_string()])),
        ));
        ds.put(DataElement::new_with_len(
            Tag(0x0008, 0x0060),
            VR::CS,
            Length(2),
            Value::Primitive(PrimitiveValue::Strs(smallvec!["CT".to_string()])),
        ));
        ds.put(DataElement::new_with_len(
            Tag(0x0010, 0x0010),
            VR::PN,
            Length(6),
            Value::Primitive(PrimitiveValue::Strs(smallvec!["ROE^".to_string()])),
        ));

        assert_eq!(ds.len(), 3);
        // first match wins
        let elem = ds.element(Tag(0x0010, 0x0010)).unwrap();
        assert_eq!(elem.length(), Length(4));
        // order is preserved
        let tags_in_order: Vec<Tag> = ds.iter().map(|e| e.tag()).collect();
        assert_eq!(
            tags_in_order,
            vec![
                Tag(0x0010, 0x0010),
                Tag(0x0008, 0x0060),
                Tag(0x0010, 0x0010)
            ]
        );
    }

    #[test]
    fn element_lookup_by_name() {
        let mut ds = DataSet::new();
        ds.put(DataElement::new_with_len(
            Tag(0x0010, 0x0010),
            VR::PN,
            Length(8),
            Value::Primitive(PrimitiveValue::Strs(smallvec!["DOE^JOHN".to_string()])),
        ));

        let elem = ds.element_by_name("PatientName").unwrap();
        assert_eq!(elem.to_str().unwrap(), "DOE^JOHN");
        assert!(ds.element_by_name("PatientWeight").is_none());
    }
}
