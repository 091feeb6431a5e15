//! Declaration and implementation of a DICOM primitive value.
//!
//! See [`PrimitiveValue`](./enum.PrimitiveValue.html).

use crate::header::{HasLength, Length, Tag};
use itertools::Itertools;
use num_traits::NumCast;
use smallvec::SmallVec;
use snafu::Snafu;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// An aggregation of one or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// The enumeration of the kinds of values that a primitive value can
/// assume, disregarding the actual data. Mainly used in error reporting.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    /// No value.
    Empty,
    /// A sequence of strings.
    Strs,
    /// A single string.
    Str,
    /// A sequence of attribute tags.
    Tags,
    /// A sequence of unsigned 8-bit integers or raw bytes.
    U8,
    /// A sequence of signed 16-bit integers.
    I16,
    /// A sequence of unsigned 16-bit integers.
    U16,
    /// A sequence of signed 32-bit integers.
    I32,
    /// A sequence of unsigned 32-bit integers.
    U32,
    /// A sequence of signed 64-bit integers.
    I64,
    /// A sequence of unsigned 64-bit integers.
    U64,
    /// A sequence of 32-bit floating point numbers.
    F32,
    /// A sequence of 64-bit floating point numbers.
    F64,
    /// A nested data set sequence.
    Item,
    /// An encapsulated pixel data sequence.
    PixelSequence,
}

/// An error raised when retrieving a value of one type
/// from a value holding another type.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(display("bad value cast: requested {} but value is {:?}", requested, got))]
pub struct CastValueError {
    /// The value format requested by the caller.
    pub requested: &'static str,
    /// The actual type of the value.
    pub got: ValueType,
}

/// An error raised when converting a value
/// into another representation.
#[derive(Debug, Snafu)]
#[snafu(display(
    "could not convert {:?} value to {}{}",
    original,
    requested,
    cause.as_deref().map(|c| format!(": {}", c)).unwrap_or_default()
))]
pub struct ConvertValueError {
    /// The value format requested by the caller.
    pub requested: &'static str,
    /// The actual type of the value.
    pub original: ValueType,
    /// A message describing the underlying failure, if any.
    pub cause: Option<String>,
}

/// An enum representing a primitive value from a DICOM element.
/// The result of decoding an element's data value
/// may be one of the enumerated types
/// depending on its content and value representation.
///
/// Multi-valued elements are contained in a [`smallvec`] vector,
/// conveniently aliased to the type [`C`].
///
/// Date and time representations (DA, DT, TM) are kept in their textual
/// form; their interpretation is deferred to a dedicated date-time
/// module outside of this crate.
#[derive(Debug, PartialEq, Clone)]
pub enum PrimitiveValue {
    /// No data. Usually employed for zero-lengthed values.
    Empty,

    /// A sequence of strings.
    /// Used for AE, AS, CS, PN, SH, LO, UI and UC,
    /// as well as for the textual representations of
    /// IS, DS, DA, DT and TM.
    Strs(C<String>),

    /// A single string.
    /// Used for ST, LT, UT and UR, which are never multi-valued.
    Str(String),

    /// A sequence of attribute tags.
    /// Used specifically for AT.
    Tags(C<Tag>),

    /// A sequence of unsigned 8-bit integers,
    /// or an arbitrary sequence of bytes.
    /// Used for OB and UN.
    U8(C<u8>),

    /// A sequence of signed 16-bit integers.
    /// Used for SS.
    I16(C<i16>),

    /// A sequence of unsigned 16-bit integers.
    /// Used for US and OW.
    U16(C<u16>),

    /// A sequence of signed 32-bit integers.
    /// Used for SL.
    I32(C<i32>),

    /// A sequence of unsigned 32-bit integers.
    /// Used for UL and OL.
    U32(C<u32>),

    /// A sequence of signed 64-bit integers.
    /// Used for SV.
    I64(C<i64>),

    /// A sequence of unsigned 64-bit integers.
    /// Used for UV and OV.
    U64(C<u64>),

    /// A sequence of 32-bit floating point numbers.
    /// Used for OF and FL.
    F32(C<f32>),

    /// A sequence of 64-bit floating point numbers.
    /// Used for OD and FD.
    F64(C<f64>),
}

/// A utility macro for implementing the conversion from a core type into
/// a DICOM primitive value with a single element.
macro_rules! impl_from_for_primitive {
    ($typ: ty, $variant: ident) => {
        impl From<$typ> for PrimitiveValue {
            fn from(value: $typ) -> Self {
                PrimitiveValue::$variant(C::from_elem(value, 1))
            }
        }
    };
}

impl_from_for_primitive!(u8, U8);
impl_from_for_primitive!(u16, U16);
impl_from_for_primitive!(i16, I16);
impl_from_for_primitive!(u32, U32);
impl_from_for_primitive!(i32, I32);
impl_from_for_primitive!(u64, U64);
impl_from_for_primitive!(i64, I64);
impl_from_for_primitive!(f32, F32);
impl_from_for_primitive!(f64, F64);
impl_from_for_primitive!(Tag, Tags);

impl From<String> for PrimitiveValue {
    fn from(value: String) -> Self {
        PrimitiveValue::Str(value)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(value: &str) -> Self {
        PrimitiveValue::Str(value.to_owned())
    }
}

impl From<Vec<u8>> for PrimitiveValue {
    fn from(value: Vec<u8>) -> Self {
        PrimitiveValue::U8(C::from_vec(value))
    }
}

impl From<&[u8]> for PrimitiveValue {
    fn from(value: &[u8]) -> Self {
        PrimitiveValue::U8(SmallVec::from_slice(value))
    }
}

/// Remove trailing spaces and null characters.
fn trim_trail_empty(x: &str) -> &str {
    x.trim_end_matches(|c| c == ' ' || c == '\0')
}

impl PrimitiveValue {
    /// Obtain the number of individual elements. This number may not
    /// match the DICOM value multiplicity in some value representations.
    pub fn multiplicity(&self) -> u32 {
        use self::PrimitiveValue::*;
        match self {
            Empty => 0,
            Str(_) => 1,
            Strs(c) => c.len() as u32,
            Tags(c) => c.len() as u32,
            U8(c) => c.len() as u32,
            I16(c) => c.len() as u32,
            U16(c) => c.len() as u32,
            I32(c) => c.len() as u32,
            U32(c) => c.len() as u32,
            I64(c) => c.len() as u32,
            U64(c) => c.len() as u32,
            F32(c) => c.len() as u32,
            F64(c) => c.len() as u32,
        }
    }

    /// Retrieve the specific type of this value.
    pub fn value_type(&self) -> ValueType {
        use self::PrimitiveValue::*;
        match self {
            Empty => ValueType::Empty,
            Str(_) => ValueType::Str,
            Strs(_) => ValueType::Strs,
            Tags(_) => ValueType::Tags,
            U8(_) => ValueType::U8,
            I16(_) => ValueType::I16,
            U16(_) => ValueType::U16,
            I32(_) => ValueType::I32,
            U32(_) => ValueType::U32,
            I64(_) => ValueType::I64,
            U64(_) => ValueType::U64,
            F32(_) => ValueType::F32,
            F64(_) => ValueType::F64,
        }
    }

    /// Convert the primitive value into a clean string representation,
    /// removing trailing padding characters (space and NUL).
    ///
    /// Multiple values are joined together with a backslash (`'\\'`).
    pub fn to_str(&self) -> Cow<'_, str> {
        match self {
            PrimitiveValue::Empty => Cow::from(""),
            PrimitiveValue::Str(value) => Cow::from(trim_trail_empty(value)),
            PrimitiveValue::Strs(values) => {
                if values.len() == 1 {
                    Cow::from(trim_trail_empty(&values[0]))
                } else {
                    Cow::from(values.iter().map(|s| trim_trail_empty(s)).join("\\"))
                }
            }
            prim => Cow::from(prim.to_string()),
        }
    }

    /// Convert the primitive value into a raw string representation,
    /// with trailing padding kept.
    ///
    /// Multiple values are joined together with a backslash (`'\\'`).
    pub fn to_raw_str(&self) -> Cow<'_, str> {
        match self {
            PrimitiveValue::Empty => Cow::from(""),
            PrimitiveValue::Str(value) => Cow::from(value.as_str()),
            PrimitiveValue::Strs(values) => {
                if values.len() == 1 {
                    Cow::from(&values[0])
                } else {
                    Cow::from(values.iter().join("\\"))
                }
            }
            prim => Cow::from(prim.to_string()),
        }
    }

    /// Convert the primitive value into a sequence of clean strings.
    ///
    /// Numeric values are converted to their textual decimal form.
    pub fn to_multi_str(&self) -> Cow<'_, [String]> {
        /// Auxiliary function for turning a sequence of values
        /// into a sequence of strings.
        fn seq_to_str<T: fmt::Display>(iter: impl IntoIterator<Item = T>) -> Vec<String> {
            iter.into_iter().map(|x| x.to_string()).collect()
        }

        match self {
            PrimitiveValue::Empty => Cow::from(&[][..]),
            PrimitiveValue::Str(value) => Cow::Owned(vec![trim_trail_empty(value).to_string()]),
            PrimitiveValue::Strs(values) => Cow::Owned(
                values
                    .iter()
                    .map(|s| trim_trail_empty(s).to_string())
                    .collect(),
            ),
            PrimitiveValue::Tags(values) => Cow::Owned(seq_to_str(values)),
            PrimitiveValue::U8(values) => Cow::Owned(seq_to_str(values)),
            PrimitiveValue::I16(values) => Cow::Owned(seq_to_str(values)),
            PrimitiveValue::U16(values) => Cow::Owned(seq_to_str(values)),
            PrimitiveValue::I32(values) => Cow::Owned(seq_to_str(values)),
            PrimitiveValue::U32(values) => Cow::Owned(seq_to_str(values)),
            PrimitiveValue::I64(values) => Cow::Owned(seq_to_str(values)),
            PrimitiveValue::U64(values) => Cow::Owned(seq_to_str(values)),
            PrimitiveValue::F32(values) => Cow::Owned(seq_to_str(values)),
            PrimitiveValue::F64(values) => Cow::Owned(seq_to_str(values)),
        }
    }

    /// Retrieve and convert the primitive value into an integer.
    ///
    /// If the value is a numeric sequence, the first number is converted
    /// through a numeric cast. If the value is a string or a sequence of
    /// strings, the first string is trimmed and parsed,
    /// potentially failing if it does not represent a valid integer.
    pub fn to_int<T>(&self) -> Result<T, ConvertValueError>
    where
        T: Clone,
        T: NumCast,
        T: FromStr<Err = std::num::ParseIntError>,
    {
        macro_rules! cast_first {
            ($c: expr) => {
                $c.first()
                    .copied()
                    .and_then(NumCast::from)
                    .ok_or_else(|| ConvertValueError {
                        requested: "integer",
                        original: self.value_type(),
                        cause: None,
                    })
            };
        }

        match self {
            PrimitiveValue::Str(s) => {
                trim_trail_empty(s)
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConvertValueError {
                        requested: "integer",
                        original: self.value_type(),
                        cause: Some(e.to_string()),
                    })
            }
            PrimitiveValue::Strs(s) if !s.is_empty() => trim_trail_empty(&s[0])
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConvertValueError {
                    requested: "integer",
                    original: self.value_type(),
                    cause: Some(e.to_string()),
                }),
            PrimitiveValue::U8(c) => cast_first!(c),
            PrimitiveValue::I16(c) => cast_first!(c),
            PrimitiveValue::U16(c) => cast_first!(c),
            PrimitiveValue::I32(c) => cast_first!(c),
            PrimitiveValue::U32(c) => cast_first!(c),
            PrimitiveValue::I64(c) => cast_first!(c),
            PrimitiveValue::U64(c) => cast_first!(c),
            _ => Err(ConvertValueError {
                requested: "integer",
                original: self.value_type(),
                cause: None,
            }),
        }
    }

    /// Retrieve and convert the primitive value
    /// into a double-precision floating point number.
    pub fn to_float64(&self) -> Result<f64, ConvertValueError> {
        macro_rules! cast_first {
            ($c: expr) => {
                $c.first()
                    .copied()
                    .and_then(NumCast::from)
                    .ok_or_else(|| ConvertValueError {
                        requested: "float64",
                        original: self.value_type(),
                        cause: None,
                    })
            };
        }

        match self {
            PrimitiveValue::Str(s) => {
                trim_trail_empty(s)
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseFloatError| ConvertValueError {
                        requested: "float64",
                        original: self.value_type(),
                        cause: Some(e.to_string()),
                    })
            }
            PrimitiveValue::Strs(s) if !s.is_empty() => trim_trail_empty(&s[0])
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| ConvertValueError {
                    requested: "float64",
                    original: self.value_type(),
                    cause: Some(e.to_string()),
                }),
            PrimitiveValue::U8(c) => cast_first!(c),
            PrimitiveValue::I16(c) => cast_first!(c),
            PrimitiveValue::U16(c) => cast_first!(c),
            PrimitiveValue::I32(c) => cast_first!(c),
            PrimitiveValue::U32(c) => cast_first!(c),
            PrimitiveValue::I64(c) => cast_first!(c),
            PrimitiveValue::U64(c) => cast_first!(c),
            PrimitiveValue::F32(c) => cast_first!(c),
            PrimitiveValue::F64(c) => cast_first!(c),
            _ => Err(ConvertValueError {
                requested: "float64",
                original: self.value_type(),
                cause: None,
            }),
        }
    }
}

/// Macro for implementing getters to single and multi-values.
macro_rules! impl_primitive_getters {
    ($name_single: ident, $name_multi: ident, $variant: ident, $ret: ty) => {
        /// Get a single value of the requested type.
        ///
        /// If it contains multiple values,
        /// only the first one is returned.
        /// An error is returned if the variant is not compatible.
        pub fn $name_single(&self) -> Result<$ret, CastValueError> {
            match self {
                PrimitiveValue::$variant(c) if !c.is_empty() => Ok(c[0]),
                value => Err(CastValueError {
                    requested: stringify!($name_single),
                    got: value.value_type(),
                }),
            }
        }

        /// Get a sequence of values of the requested type without
        /// copying. An error is returned if the variant is not
        /// compatible.
        pub fn $name_multi(&self) -> Result<&[$ret], CastValueError> {
            match self {
                PrimitiveValue::$variant(c) => Ok(&c[..]),
                value => Err(CastValueError {
                    requested: stringify!($name_multi),
                    got: value.value_type(),
                }),
            }
        }
    };
}

impl PrimitiveValue {
    /// Get a single string value.
    ///
    /// If the value contains multiple strings, only the first one is
    /// returned. An error is returned if the variant is not compatible.
    pub fn string(&self) -> Result<&str, CastValueError> {
        match self {
            PrimitiveValue::Str(s) => Ok(s),
            PrimitiveValue::Strs(c) if !c.is_empty() => Ok(&c[0]),
            value => Err(CastValueError {
                requested: "string",
                got: value.value_type(),
            }),
        }
    }

    /// Get the inner sequence of string values
    /// if the variant is either `Str` or `Strs`.
    ///
    /// An error is returned if the variant is not compatible.
    pub fn strings(&self) -> Result<&[String], CastValueError> {
        match self {
            PrimitiveValue::Strs(c) => Ok(&c[..]),
            PrimitiveValue::Str(s) => Ok(std::slice::from_ref(s)),
            value => Err(CastValueError {
                requested: "strings",
                got: value.value_type(),
            }),
        }
    }

    impl_primitive_getters!(tag, tags, Tags, Tag);
    impl_primitive_getters!(uint8, uint8_slice, U8, u8);
    impl_primitive_getters!(uint16, uint16_slice, U16, u16);
    impl_primitive_getters!(int16, int16_slice, I16, i16);
    impl_primitive_getters!(uint32, uint32_slice, U32, u32);
    impl_primitive_getters!(int32, int32_slice, I32, i32);
    impl_primitive_getters!(int64, int64_slice, I64, i64);
    impl_primitive_getters!(uint64, uint64_slice, U64, u64);
    impl_primitive_getters!(float32, float32_slice, F32, f32);
    impl_primitive_getters!(float64, float64_slice, F64, f64);
}

impl HasLength for PrimitiveValue {
    /// The byte length of the value as encoded,
    /// disregarding padding to an even number of bytes.
    fn length(&self) -> Length {
        use self::PrimitiveValue::*;
        let len = match self {
            Empty => 0,
            Str(s) => s.len(),
            Strs(c) => c.iter().map(|s| s.len()).sum::<usize>() + c.len().saturating_sub(1),
            Tags(c) => c.len() * 4,
            U8(c) => c.len(),
            I16(c) => c.len() * 2,
            U16(c) => c.len() * 2,
            I32(c) => c.len() * 4,
            U32(c) => c.len() * 4,
            I64(c) => c.len() * 8,
            U64(c) => c.len() * 8,
            F32(c) => c.len() * 4,
            F64(c) => c.len() * 8,
        };
        Length(len as u32)
    }
}

impl fmt::Display for PrimitiveValue {
    /// The output of a primitive value is a backslash-delimited sequence
    /// of its individual values, with numbers in plain decimal form.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        /// Auxiliary function for formatting a sequence of values.
        fn seq_fmt<T: fmt::Display>(
            f: &mut fmt::Formatter,
            iter: impl IntoIterator<Item = T>,
        ) -> fmt::Result {
            f.write_str(&iter.into_iter().map(|x| x.to_string()).join("\\"))
        }

        use self::PrimitiveValue::*;
        match self {
            Empty => Ok(()),
            Str(s) => f.write_str(s),
            Strs(c) => seq_fmt(f, c.iter()),
            Tags(c) => seq_fmt(f, c.iter()),
            U8(c) => seq_fmt(f, c.iter()),
            I16(c) => seq_fmt(f, c.iter()),
            U16(c) => seq_fmt(f, c.iter()),
            I32(c) => seq_fmt(f, c.iter()),
            U32(c) => seq_fmt(f, c.iter()),
            I64(c) => seq_fmt(f, c.iter()),
            U64(c) => seq_fmt(f, c.iter()),
            F32(c) => seq_fmt(f, c.iter()),
            F64(c) => seq_fmt(f, c.iter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn multiplicity() {
        assert_eq!(PrimitiveValue::Empty.multiplicity(), 0);
        assert_eq!(PrimitiveValue::from("DOE^JOHN").multiplicity(), 1);
        assert_eq!(
            PrimitiveValue::Strs(smallvec!["DERIVED".into(), "PRIMARY".into()]).multiplicity(),
            2
        );
        assert_eq!(PrimitiveValue::U16(smallvec![1, 2, 3]).multiplicity(), 3);
    }

    #[test]
    fn to_str_trims_padding() {
        assert_eq!(PrimitiveValue::from("1.2.840.10008.1.2\0").to_str(), "1.2.840.10008.1.2");
        assert_eq!(PrimitiveValue::from("CT ").to_str(), "CT");
        assert_eq!(
            PrimitiveValue::from("1.2.840.10008.1.2\0").to_raw_str(),
            "1.2.840.10008.1.2\0"
        );
    }

    #[test]
    fn to_str_joins_multiple_values() {
        let v = PrimitiveValue::Strs(smallvec![
            "DERIVED".to_string(),
            "PRIMARY".to_string(),
            "WHOLE BODY".to_string(),
        ]);
        assert_eq!(v.to_str(), "DERIVED\\PRIMARY\\WHOLE BODY");

        let v = PrimitiveValue::U16(smallvec![256, 0, 16]);
        assert_eq!(v.to_str(), "256\\0\\16");
    }

    #[test]
    fn to_int_from_text_and_binary() {
        let v = PrimitiveValue::Strs(smallvec!["2 ".to_string()]);
        assert_eq!(v.to_int::<u32>().unwrap(), 2);

        let v = PrimitiveValue::U16(smallvec![512]);
        assert_eq!(v.to_int::<i32>().unwrap(), 512);

        let v = PrimitiveValue::from("abc");
        assert!(v.to_int::<i32>().is_err());
    }

    #[test]
    fn primitive_getters() {
        let v = PrimitiveValue::U16(smallvec![1, 2]);
        assert_eq!(v.uint16().unwrap(), 1);
        assert_eq!(v.uint16_slice().unwrap(), &[1, 2]);
        assert!(v.float32().is_err());

        let v = PrimitiveValue::Tags(smallvec![Tag(0x0010, 0x0010)]);
        assert_eq!(v.tag().unwrap(), Tag(0x0010, 0x0010));
    }

    #[test]
    fn value_byte_length() {
        assert_eq!(PrimitiveValue::Empty.length(), Length(0));
        assert_eq!(PrimitiveValue::from("AB").length(), Length(2));
        assert_eq!(PrimitiveValue::U16(smallvec![1, 2, 3]).length(), Length(6));
        assert_eq!(PrimitiveValue::F64(smallvec![1.0]).length(), Length(8));
    }
}
