//! Closed sum type for decoded and to-be-encoded column values.

use std::{
    net::{Ipv4Addr, Ipv6Addr},
    sync::Arc,
};

use arrow_buffer::i256;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::{
    coerce::FromValue,
    decimal::Decimal,
    error::{CodecError, ValueTypeError},
    schema::IntervalUnit,
    wide::U256,
};

/// A count of interval units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub unit: IntervalUnit,
    pub count: u64,
}

/// One column value.
///
/// The decoder produces exactly one variant per wire kind; the encoder accepts
/// any variant the coercion layer can convert to the target kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL, also the void value of `Nothing`.
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    I256(i256),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    String(Arc<str>),
    /// Raw bytes; `FixedString` decodes to this, padding included.
    Bytes(Arc<[u8]>),
    Date(NaiveDate),
    DateTime(DateTime<Tz>),
    /// Calendar date-time without zone, interpreted in the column's zone.
    LocalDateTime(NaiveDateTime),
    Uuid(Uuid),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    /// Raw ordinal; names are resolved through the column's enum table.
    Enum8(i8),
    Enum16(i16),
    Interval(Interval),
    Array(Vec<Value>),
    Tuple(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        Self::Bytes(Arc::from(b.as_ref()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts through the coercion rules, e.g. `value.get::<i64>()`.
    pub fn get<T: FromValue>(&self) -> Result<T, CodecError> {
        T::from_value(self)
    }

    pub fn try_bool(&self) -> Result<Option<bool>, ValueTypeError> {
        match self {
            Value::Bool(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Bool")),
        }
    }

    pub fn try_i32(&self) -> Result<Option<i32>, ValueTypeError> {
        match self {
            Value::I32(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("I32")),
        }
    }

    pub fn try_i64(&self) -> Result<Option<i64>, ValueTypeError> {
        match self {
            Value::I64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("I64")),
        }
    }

    pub fn try_u64(&self) -> Result<Option<u64>, ValueTypeError> {
        match self {
            Value::U64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("U64")),
        }
    }

    pub fn try_f64(&self) -> Result<Option<f64>, ValueTypeError> {
        match self {
            Value::F64(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("F64")),
        }
    }

    pub fn try_decimal(&self) -> Result<Option<Decimal>, ValueTypeError> {
        match self {
            Value::Decimal(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Decimal")),
        }
    }

    pub fn try_str(&self) -> Result<Option<&str>, ValueTypeError> {
        match self {
            Value::String(v) => Ok(Some(v.as_ref())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("String")),
        }
    }

    pub fn try_bytes(&self) -> Result<Option<&[u8]>, ValueTypeError> {
        match self {
            Value::Bytes(v) => Ok(Some(v.as_ref())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Bytes")),
        }
    }

    pub fn try_date(&self) -> Result<Option<NaiveDate>, ValueTypeError> {
        match self {
            Value::Date(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Date")),
        }
    }

    pub fn try_datetime(&self) -> Result<Option<DateTime<Tz>>, ValueTypeError> {
        match self {
            Value::DateTime(v) => Ok(Some(*v)),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("DateTime")),
        }
    }

    pub fn try_array(&self) -> Result<Option<&[Value]>, ValueTypeError> {
        match self {
            Value::Array(v) => Ok(Some(v.as_slice())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Array")),
        }
    }

    pub fn try_tuple(&self) -> Result<Option<&[Value]>, ValueTypeError> {
        match self {
            Value::Tuple(v) => Ok(Some(v.as_slice())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Tuple")),
        }
    }

    pub fn try_map(&self) -> Result<Option<&[(Value, Value)]>, ValueTypeError> {
        match self {
            Value::Map(v) => Ok(Some(v.as_slice())),
            Value::Null => Ok(None),
            _ => Err(self.type_mismatch("Map")),
        }
    }

    pub fn type_mismatch(&self, expected: impl Into<String>) -> ValueTypeError {
        ValueTypeError::new(expected, self.variant_name())
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::I8(_) => "I8",
            Value::I16(_) => "I16",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::I128(_) => "I128",
            Value::I256(_) => "I256",
            Value::U8(_) => "U8",
            Value::U16(_) => "U16",
            Value::U32(_) => "U32",
            Value::U64(_) => "U64",
            Value::U128(_) => "U128",
            Value::U256(_) => "U256",
            Value::F32(_) => "F32",
            Value::F64(_) => "F64",
            Value::Decimal(_) => "Decimal",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Date(_) => "Date",
            Value::DateTime(_) => "DateTime",
            Value::LocalDateTime(_) => "LocalDateTime",
            Value::Uuid(_) => "Uuid",
            Value::Ipv4(_) => "Ipv4",
            Value::Ipv6(_) => "Ipv6",
            Value::Enum8(_) => "Enum8",
            Value::Enum16(_) => "Enum16",
            Value::Interval(_) => "Interval",
            Value::Array(_) => "Array",
            Value::Tuple(_) => "Tuple",
            Value::Map(_) => "Map",
        }
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    i256 => I256,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    U256 => U256,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    NaiveDate => Date,
    DateTime<Tz> => DateTime,
    NaiveDateTime => LocalDateTime,
    Uuid => Uuid,
    Ipv4Addr => Ipv4,
    Ipv6Addr => Ipv6,
    Interval => Interval,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(Arc::from(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}
