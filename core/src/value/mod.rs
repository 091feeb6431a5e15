//! High level abstraction over a DICOM data element's value.

use crate::header::{EmptyObject, HasLength, Length};
use num_traits::NumCast;
use std::borrow::Cow;
use std::str::FromStr;

mod primitive;

pub use self::primitive::{
    CastValueError, ConvertValueError, PrimitiveValue, ValueType, C,
};

/// A trait for a value that maps to a DICOM element data value.
pub trait DicomValueType: HasLength {
    /// Retrieve the specific type of this value.
    fn value_type(&self) -> ValueType;

    /// Retrieve the number of elements contained in the DICOM value.
    ///
    /// In a sequence value, this is the number of items in the sequence.
    /// In an encapsulated pixel data sequence, the output is always 1.
    /// Otherwise, the output is the number of elements effectively
    /// encoded in the value.
    fn cardinality(&self) -> usize;
}

/// Representation of a full DICOM value, which may be either primitive or
/// another DICOM object.
///
/// `I` is the complex type for nested data set items, which should
/// usually implement [`HasLength`].
/// `P` is the encapsulated pixel data fragment type, which should
/// usually implement `AsRef<[u8]>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<I = EmptyObject, P = [u8; 0]> {
    /// Primitive value.
    Primitive(PrimitiveValue),
    /// A complex sequence of items.
    Sequence {
        /// Item collection.
        items: C<I>,
        /// The size in bytes (can be undefined).
        size: Length,
    },
    /// An encapsulated pixel data sequence.
    PixelSequence {
        /// The value contents of the basic offset table.
        offset_table: C<u32>,
        /// The sequence of compressed fragments.
        fragments: C<P>,
    },
}

impl<P> Value<EmptyObject, P> {
    /// Construct a DICOM pixel sequence value
    /// from an offset table and a list of fragments.
    ///
    /// This function does not validate the offset table
    /// against the fragments.
    pub fn new_pixel_sequence<T>(offset_table: C<u32>, fragments: T) -> Self
    where
        T: Into<C<P>>,
    {
        Value::PixelSequence {
            offset_table,
            fragments: fragments.into(),
        }
    }
}

impl<I> Value<I, [u8; 0]> {
    /// Construct a full DICOM data set sequence value
    /// from a list of items and a length.
    #[inline]
    pub fn new_sequence<T>(items: T, length: Length) -> Self
    where
        T: Into<C<I>>,
    {
        Value::Sequence {
            items: items.into(),
            size: length,
        }
    }
}

impl Value<EmptyObject, [u8; 0]> {
    /// Construct a DICOM value from a primitive value.
    #[inline]
    pub fn new(value: PrimitiveValue) -> Self {
        Self::from(value)
    }
}

impl<I, P> Value<I, P> {
    /// Obtain the number of individual values.
    /// In a primitive, this is the number of individual elements in the
    /// value. In a sequence item, this is the number of items.
    /// In a pixel sequence, this is currently set to 1
    /// regardless of the number of compressed fragments or frames.
    pub fn multiplicity(&self) -> u32 {
        match self {
            Value::Primitive(v) => v.multiplicity(),
            Value::Sequence { items, .. } => items.len() as u32,
            Value::PixelSequence { .. } => 1,
        }
    }

    /// Gets a reference to the primitive value.
    pub fn primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            Value::Primitive(v) => Some(v),
            _ => None,
        }
    }

    /// Gets a reference to the items of a sequence.
    pub fn items(&self) -> Option<&[I]> {
        match self {
            Value::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Retrieves the primitive value.
    pub fn into_primitive(self) -> Option<PrimitiveValue> {
        match self {
            Value::Primitive(v) => Some(v),
            _ => None,
        }
    }

    /// Retrieves the items of a sequence.
    pub fn into_items(self) -> Option<C<I>> {
        match self {
            Value::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Gets a reference to the encapsulated pixel data's offset table.
    pub fn offset_table(&self) -> Option<&[u32]> {
        match self {
            Value::PixelSequence { offset_table, .. } => Some(offset_table),
            _ => None,
        }
    }

    /// Gets a reference to the encapsulated pixel data's fragments.
    pub fn fragments(&self) -> Option<&[P]> {
        match self {
            Value::PixelSequence { fragments, .. } => Some(fragments),
            _ => None,
        }
    }
}

impl<I, P> HasLength for Value<I, P> {
    fn length(&self) -> Length {
        match self {
            Value::Primitive(v) => v.length(),
            Value::Sequence { size, .. } => *size,
            Value::PixelSequence { .. } => Length::UNDEFINED,
        }
    }
}

impl<I, P> DicomValueType for Value<I, P> {
    fn value_type(&self) -> ValueType {
        match self {
            Value::Primitive(v) => v.value_type(),
            Value::Sequence { .. } => ValueType::Item,
            Value::PixelSequence { .. } => ValueType::PixelSequence,
        }
    }

    fn cardinality(&self) -> usize {
        match self {
            Value::Primitive(v) => v.multiplicity() as usize,
            Value::Sequence { items, .. } => items.len(),
            Value::PixelSequence { .. } => 1,
        }
    }
}

impl<I, P> Value<I, P> {
    /// Convert the full primitive value into a clean string,
    /// with trailing padding removed.
    ///
    /// Returns an error if the value is not primitive.
    pub fn to_str(&self) -> Result<Cow<'_, str>, CastValueError> {
        match self {
            Value::Primitive(prim) => Ok(prim.to_str()),
            _ => Err(CastValueError {
                requested: "string",
                got: self.variant_type(),
            }),
        }
    }

    /// Convert the full primitive value into a single raw string,
    /// with trailing padding kept.
    ///
    /// Returns an error if the value is not primitive.
    pub fn to_raw_str(&self) -> Result<Cow<'_, str>, CastValueError> {
        match self {
            Value::Primitive(prim) => Ok(prim.to_raw_str()),
            _ => Err(CastValueError {
                requested: "string",
                got: self.variant_type(),
            }),
        }
    }

    /// Convert the full primitive value into a sequence of strings.
    ///
    /// Returns an error if the value is not primitive.
    pub fn to_multi_str(&self) -> Result<Cow<'_, [String]>, CastValueError> {
        match self {
            Value::Primitive(prim) => Ok(prim.to_multi_str()),
            _ => Err(CastValueError {
                requested: "strings",
                got: self.variant_type(),
            }),
        }
    }

    /// Retrieve and convert the primitive value into an integer.
    ///
    /// Returns an error if the value is not primitive
    /// or cannot be converted.
    pub fn to_int<T>(&self) -> Result<T, ConvertValueError>
    where
        T: Clone,
        T: NumCast,
        T: FromStr<Err = std::num::ParseIntError>,
    {
        match self {
            Value::Primitive(prim) => prim.to_int(),
            _ => Err(ConvertValueError {
                requested: "integer",
                original: self.variant_type(),
                cause: None,
            }),
        }
    }

    fn variant_type(&self) -> ValueType {
        match self {
            Value::Primitive(v) => v.value_type(),
            Value::Sequence { .. } => ValueType::Item,
            Value::PixelSequence { .. } => ValueType::PixelSequence,
        }
    }
}

/// Macro for delegating a getter to the primitive value within.
macro_rules! impl_value_getters {
    ($name_single: ident, $name_multi: ident, $ret: ty) => {
        /// Get a single value of the requested type,
        /// delegating to the primitive value within.
        ///
        /// An error is returned if the value is not primitive or the
        /// variant is not compatible.
        pub fn $name_single(&self) -> Result<$ret, CastValueError> {
            match self {
                Value::Primitive(v) => v.$name_single(),
                value => Err(CastValueError {
                    requested: stringify!($name_single),
                    got: value.variant_type(),
                }),
            }
        }

        /// Get a sequence of values of the requested type,
        /// delegating to the primitive value within.
        ///
        /// An error is returned if the value is not primitive or the
        /// variant is not compatible.
        pub fn $name_multi(&self) -> Result<&[$ret], CastValueError> {
            match self {
                Value::Primitive(v) => v.$name_multi(),
                value => Err(CastValueError {
                    requested: stringify!($name_multi),
                    got: value.variant_type(),
                }),
            }
        }
    };
}

impl<I, P> Value<I, P> {
    /// Get a single string value,
    /// delegating to the primitive value within.
    ///
    /// An error is returned if the value is not primitive or the variant
    /// is not compatible.
    pub fn string(&self) -> Result<&str, CastValueError> {
        match self {
            Value::Primitive(v) => v.string(),
            value => Err(CastValueError {
                requested: "string",
                got: value.variant_type(),
            }),
        }
    }

    /// Get the inner sequence of string values,
    /// delegating to the primitive value within.
    ///
    /// An error is returned if the value is not primitive or the variant
    /// is not compatible.
    pub fn strings(&self) -> Result<&[String], CastValueError> {
        match self {
            Value::Primitive(v) => v.strings(),
            value => Err(CastValueError {
                requested: "strings",
                got: value.variant_type(),
            }),
        }
    }

    impl_value_getters!(tag, tags, crate::header::Tag);
    impl_value_getters!(uint8, uint8_slice, u8);
    impl_value_getters!(uint16, uint16_slice, u16);
    impl_value_getters!(int16, int16_slice, i16);
    impl_value_getters!(uint32, uint32_slice, u32);
    impl_value_getters!(int32, int32_slice, i32);
    impl_value_getters!(int64, int64_slice, i64);
    impl_value_getters!(uint64, uint64_slice, u64);
    impl_value_getters!(float32, float32_slice, f32);
    impl_value_getters!(float64, float64_slice, f64);
}

impl<I, P> From<PrimitiveValue> for Value<I, P> {
    fn from(v: PrimitiveValue) -> Self {
        Value::Primitive(v)
    }
}

impl<I, P> From<&str> for Value<I, P> {
    fn from(v: &str) -> Self {
        Value::Primitive(PrimitiveValue::from(v))
    }
}

impl<I, P> From<String> for Value<I, P> {
    fn from(v: String) -> Self {
        Value::Primitive(PrimitiveValue::from(v))
    }
}
