//! Typed scalar values and the generic read surface over column storage.

use strata_common::{Result, error::Error};
use strata_format::Kind;

use crate::data_node::DataNode;

/// A borrowed scalar value of one of the supported kinds.
///
/// Variable-length values borrow from the storage they were read from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Int128(i128),
    String(&'a str),
    Binary(&'a [u8]),
    Timestamp(i64),
}

impl<'a> Value<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Boolean,
            Value::Int8(_) => Kind::Int8,
            Value::Int16(_) => Kind::Int16,
            Value::Int32(_) => Kind::Int32,
            Value::Int64(_) => Kind::Int64,
            Value::Float32(_) => Kind::Float32,
            Value::Float64(_) => Kind::Float64,
            Value::Int128(_) => Kind::Int128,
            Value::String(_) => Kind::String,
            Value::Binary(_) => Kind::Binary,
            Value::Timestamp(_) => Kind::Timestamp,
        }
    }

    /// Converts the value into the requested scalar type.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch error if the value is of a different kind.
    pub fn get<T: Scalar<'a>>(self) -> Result<T> {
        let kind = self.kind();
        T::from_value(self).ok_or_else(|| Error::type_mismatch(T::KIND.name(), kind.name()))
    }

    pub fn to_owned_value(&self) -> OwnedValue {
        match *self {
            Value::Bool(v) => OwnedValue::Bool(v),
            Value::Int8(v) => OwnedValue::Int8(v),
            Value::Int16(v) => OwnedValue::Int16(v),
            Value::Int32(v) => OwnedValue::Int32(v),
            Value::Int64(v) => OwnedValue::Int64(v),
            Value::Float32(v) => OwnedValue::Float32(v),
            Value::Float64(v) => OwnedValue::Float64(v),
            Value::Int128(v) => OwnedValue::Int128(v),
            Value::String(v) => OwnedValue::String(v.to_string()),
            Value::Binary(v) => OwnedValue::Binary(v.to_vec()),
            Value::Timestamp(v) => OwnedValue::Timestamp(v),
        }
    }
}

/// An owned scalar value, used where values outlive the storage they came from
/// (e.g. dimension value tables).
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedValue {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Int128(i128),
    String(String),
    Binary(Vec<u8>),
    Timestamp(i64),
}

impl OwnedValue {
    pub fn as_value(&self) -> Value<'_> {
        match self {
            OwnedValue::Bool(v) => Value::Bool(*v),
            OwnedValue::Int8(v) => Value::Int8(*v),
            OwnedValue::Int16(v) => Value::Int16(*v),
            OwnedValue::Int32(v) => Value::Int32(*v),
            OwnedValue::Int64(v) => Value::Int64(*v),
            OwnedValue::Float32(v) => Value::Float32(*v),
            OwnedValue::Float64(v) => Value::Float64(*v),
            OwnedValue::Int128(v) => Value::Int128(*v),
            OwnedValue::String(v) => Value::String(v),
            OwnedValue::Binary(v) => Value::Binary(v),
            OwnedValue::Timestamp(v) => Value::Timestamp(*v),
        }
    }

    pub fn kind(&self) -> Kind {
        self.as_value().kind()
    }
}

impl From<&str> for OwnedValue {
    fn from(value: &str) -> Self {
        OwnedValue::String(value.to_string())
    }
}

impl From<String> for OwnedValue {
    fn from(value: String) -> Self {
        OwnedValue::String(value)
    }
}

/// A Rust type that a scalar column can be read as.
///
/// This is the single generic read operation behind every typed accessor:
/// `bool`, the signed integers up to `i128`, `f32`, `f64`, `&str` and `&[u8]`.
pub trait Scalar<'a>: Sized {
    /// The kind this type is stored as.
    const KIND: Kind;

    /// Returns `true` if a column of `kind` can be read as this type.
    fn accepts(kind: Kind) -> bool {
        kind == Self::KIND
    }

    /// Extracts the typed value, or `None` if `value` is of another kind.
    fn from_value(value: Value<'a>) -> Option<Self>;

    /// Reads the value at `index` of a node whose kind is accepted by this type.
    /// The caller has already checked the index and the kind.
    fn read_at(node: &'a DataNode, index: usize) -> Result<Self>;
}

#[cold]
fn truncated(node: &DataNode, index: usize) -> Error {
    Error::invalid_format(format!("{} values at index {index}", node.kind()))
}

macro_rules! impl_fixed_scalar {
    ($ty:ty, $variant:ident) => {
        impl<'a> Scalar<'a> for $ty {
            const KIND: Kind = Kind::$variant;

            fn from_value(value: Value<'a>) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }

            #[inline]
            fn read_at(node: &'a DataNode, index: usize) -> Result<Self> {
                node.values()
                    .get::<$ty>(index)
                    .ok_or_else(|| truncated(node, index))
            }
        }
    };
}

impl_fixed_scalar!(i8, Int8);
impl_fixed_scalar!(i16, Int16);
impl_fixed_scalar!(i32, Int32);
impl_fixed_scalar!(f32, Float32);
impl_fixed_scalar!(f64, Float64);
impl_fixed_scalar!(i128, Int128);

impl<'a> Scalar<'a> for i64 {
    const KIND: Kind = Kind::Int64;

    // Timestamps are stored as 64-bit integers.
    fn accepts(kind: Kind) -> bool {
        matches!(kind, Kind::Int64 | Kind::Timestamp)
    }

    fn from_value(value: Value<'a>) -> Option<Self> {
        match value {
            Value::Int64(v) | Value::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    fn read_at(node: &'a DataNode, index: usize) -> Result<Self> {
        node.values()
            .get::<i64>(index)
            .ok_or_else(|| truncated(node, index))
    }
}

impl<'a> Scalar<'a> for bool {
    const KIND: Kind = Kind::Boolean;

    fn from_value(value: Value<'a>) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    fn read_at(node: &'a DataNode, index: usize) -> Result<Self> {
        node.values()
            .get::<u8>(index)
            .map(|b| b != 0)
            .ok_or_else(|| truncated(node, index))
    }
}

impl<'a> Scalar<'a> for &'a [u8] {
    const KIND: Kind = Kind::Binary;

    fn from_value(value: Value<'a>) -> Option<Self> {
        match value {
            Value::Binary(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    fn read_at(node: &'a DataNode, index: usize) -> Result<Self> {
        node.bytes_at(index)
    }
}

impl<'a> Scalar<'a> for &'a str {
    const KIND: Kind = Kind::String;

    fn from_value(value: Value<'a>) -> Option<Self> {
        match value {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    fn read_at(node: &'a DataNode, index: usize) -> Result<Self> {
        Ok(std::str::from_utf8(node.bytes_at(index)?)?)
    }
}
