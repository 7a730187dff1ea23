//! Conversion between loosely typed input values and the exact representation
//! each wire kind needs.
//!
//! Integer narrowing always goes through a sign/magnitude pair and is checked
//! against the target range, so an out-of-range value becomes
//! [`CodecError::Overflow`] instead of wrapping.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    sync::Arc,
};

use arrow_buffer::i256;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::{
    decimal::Decimal,
    error::CodecError,
    schema::{DataType, TypeDescriptor},
    time,
    value::{Interval, Value},
    wide::{ParseWideIntError, U256, i256_from_sign_magnitude, i256_to_sign_magnitude},
};

/// Coercion rules plus the settings they depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coercion {
    /// Zone applied to datetime columns declared without one.
    pub default_time_zone: Tz,
    /// Reject enum ordinals missing from the column's enum table.
    pub strict_enums: bool,
}

impl Default for Coercion {
    fn default() -> Self {
        Self {
            default_time_zone: Tz::UTC,
            strict_enums: true,
        }
    }
}

impl Coercion {
    pub fn new(default_time_zone: Tz) -> Self {
        Self {
            default_time_zone,
            ..Self::default()
        }
    }

    pub fn time_zone(&self, declared: Option<Tz>) -> Tz {
        declared.unwrap_or(self.default_time_zone)
    }

    /// Converts `value` into the native representation of `target`.
    ///
    /// `Null` passes through unchanged; how it is written is decided by the
    /// encoder from the descriptor's nullability.
    pub fn coerce(&self, value: &Value, target: &TypeDescriptor) -> Result<Value, CodecError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.coerce_to(value, &target.data_type)
    }

    /// Same as [`Coercion::coerce`], against a bare kind.
    pub fn coerce_to(&self, value: &Value, target: &DataType) -> Result<Value, CodecError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match target {
            DataType::Nothing => Err(CodecError::invalid("Nothing", "only NULL is allowed")),
            DataType::Bool => self.to_bool(value).map(Value::Bool),
            DataType::I8 => narrow(value, target).map(Value::I8),
            DataType::I16 => narrow(value, target).map(Value::I16),
            DataType::I32 => narrow(value, target).map(Value::I32),
            DataType::I64 => narrow(value, target).map(Value::I64),
            DataType::I128 => narrow(value, target).map(Value::I128),
            DataType::I256 => integer_of(value, target)?.to_i256(target).map(Value::I256),
            DataType::U8 => narrow(value, target).map(Value::U8),
            DataType::U16 => narrow(value, target).map(Value::U16),
            DataType::U32 => narrow(value, target).map(Value::U32),
            DataType::U64 => narrow(value, target).map(Value::U64),
            DataType::U128 => narrow(value, target).map(Value::U128),
            DataType::U256 => integer_of(value, target)?.to_u256(target).map(Value::U256),
            DataType::F32 | DataType::BFloat16 => to_f32(value, target).map(Value::F32),
            DataType::F64 => to_f64(value, target).map(Value::F64),
            DataType::Decimal { precision, scale } => {
                let decimal = to_decimal(value, target)?.rescale(*scale)?;
                if !decimal.fits_precision(*precision) {
                    return Err(CodecError::overflow(decimal, target_name(target)));
                }
                Ok(Value::Decimal(decimal))
            }
            DataType::String => match value {
                Value::String(s) => Ok(Value::String(Arc::clone(s))),
                Value::Bytes(b) => std::str::from_utf8(b)
                    .map(Value::string)
                    .map_err(|e| CodecError::invalid("String", e.to_string())),
                _ => Err(unsupported(value, target)),
            },
            DataType::FixedString(n) => {
                let bytes: &[u8] = match value {
                    Value::String(s) => s.as_bytes(),
                    Value::Bytes(b) => &b[..],
                    _ => return Err(unsupported(value, target)),
                };
                if bytes.len() > *n {
                    return Err(CodecError::invalid(
                        target_name(target),
                        format!("{} bytes exceed fixed length {n}", bytes.len()),
                    ));
                }
                let mut padded = bytes.to_vec();
                padded.resize(*n, 0);
                Ok(Value::Bytes(Arc::from(padded)))
            }
            DataType::Date => {
                let date = self.to_date(value, target)?;
                if !(0..=u16::MAX as i64).contains(&time::epoch_days(date)) {
                    return Err(CodecError::overflow(date, "Date"));
                }
                Ok(Value::Date(date))
            }
            DataType::Date32 => {
                let date = self.to_date(value, target)?;
                if i32::try_from(time::epoch_days(date)).is_err() {
                    return Err(CodecError::overflow(date, "Date32"));
                }
                Ok(Value::Date(date))
            }
            DataType::DateTime(tz) => {
                let dt = self.to_datetime(value, target, self.time_zone(*tz))?;
                if !(0..=u32::MAX as i64).contains(&dt.timestamp()) {
                    return Err(CodecError::overflow(dt, target_name(target)));
                }
                Ok(Value::DateTime(dt))
            }
            DataType::DateTime64 { scale, time_zone } => {
                let dt = self.to_datetime(value, target, self.time_zone(*time_zone))?;
                if time::datetime64_ticks(&dt, *scale).is_none() {
                    return Err(CodecError::overflow(dt, target_name(target)));
                }
                Ok(Value::DateTime(dt))
            }
            DataType::Uuid => to_uuid(value, target).map(Value::Uuid),
            DataType::Ipv4 => to_ipv4(value, target).map(Value::Ipv4),
            DataType::Ipv6 => to_ipv6(value, target).map(Value::Ipv6),
            DataType::Enum8(table) | DataType::Enum16(table) => {
                let ordinal: i16 = match value {
                    Value::String(name) => table.value_of(name).ok_or_else(|| {
                        CodecError::invalid(target_name(target), format!("unknown name '{name}'"))
                    })?,
                    _ => narrow(value, target)?,
                };
                if self.strict_enums && !table.contains_value(ordinal) {
                    return Err(CodecError::invalid(
                        target_name(target),
                        format!("ordinal {ordinal} has no name"),
                    ));
                }
                match target {
                    DataType::Enum8(_) => i8::try_from(ordinal)
                        .map(Value::Enum8)
                        .map_err(|_| CodecError::overflow(ordinal, "Enum8")),
                    _ => Ok(Value::Enum16(ordinal)),
                }
            }
            DataType::Interval(unit) => match value {
                Value::Interval(i) if i.unit == *unit => Ok(Value::Interval(*i)),
                Value::Interval(_) => Err(unsupported(value, target)),
                _ => Ok(Value::Interval(Interval {
                    unit: *unit,
                    count: narrow(value, target)?,
                })),
            },
            DataType::Point
            | DataType::Ring
            | DataType::LineString
            | DataType::Polygon
            | DataType::MultiLineString
            | DataType::MultiPolygon => match target.geometry_layout() {
                Some(layout) => self.coerce(value, &layout),
                None => Err(unsupported(value, target)),
            },
            DataType::Array(element) => match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| self.coerce(item, element))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                _ => Err(unsupported(value, target)),
            },
            DataType::Tuple { elements, .. } => {
                let items = match value {
                    Value::Tuple(items) | Value::Array(items) => items,
                    _ => return Err(unsupported(value, target)),
                };
                if items.len() != elements.len() {
                    return Err(CodecError::invalid(
                        target_name(target),
                        format!("expected {} elements, got {}", elements.len(), items.len()),
                    ));
                }
                items
                    .iter()
                    .zip(elements)
                    .map(|(item, ty)| self.coerce(item, ty))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Tuple)
            }
            DataType::Map { key, value: val } => match value {
                Value::Map(entries) => entries
                    .iter()
                    .map(|(k, v)| Ok((self.coerce(k, key)?, self.coerce(v, val)?)))
                    .collect::<Result<Vec<_>, CodecError>>()
                    .map(Value::Map),
                _ => Err(unsupported(value, target)),
            },
            DataType::Variant(alternatives) => {
                match self.variant_index(alternatives, value) {
                    Some(i) => self.coerce(value, &alternatives[i]),
                    None => Err(unsupported(value, target)),
                }
            }
            DataType::Dynamic { .. } => Ok(value.clone()),
            DataType::SimpleAggregateFunction { argument, .. } => self.coerce(value, argument),
            DataType::AggregateFunction {
                function,
                arguments,
            } if function == "groupBitmap" && arguments.len() == 1 => match value {
                Value::Bytes(b) => Ok(Value::Bytes(Arc::clone(b))),
                Value::Array(items) => items
                    .iter()
                    .map(|item| self.coerce(item, &arguments[0]))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                _ => Err(unsupported(value, target)),
            },
            DataType::AggregateFunction { function, .. } => Err(CodecError::UnsupportedType(
                format!("AggregateFunction({function})"),
            )),
        }
    }

    fn to_bool(&self, value: &Value) -> Result<bool, CodecError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.trim() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(CodecError::invalid("Bool", format!("'{other}'"))),
            },
            _ => match narrow::<u8>(value, &DataType::Bool) {
                Ok(0) => Ok(false),
                Ok(1) => Ok(true),
                Ok(other) => Err(CodecError::overflow(other, "Bool")),
                Err(e) => Err(e),
            },
        }
    }

    fn to_date(&self, value: &Value, target: &DataType) -> Result<NaiveDate, CodecError> {
        match value {
            Value::Date(d) => Ok(*d),
            Value::DateTime(dt) => Ok(dt.date_naive()),
            Value::LocalDateTime(n) => Ok(n.date()),
            Value::String(s) => time::parse_date(s),
            _ => {
                let days: i64 = narrow(value, target)?;
                time::date_from_epoch_days(days)
                    .ok_or_else(|| CodecError::overflow(days, target_name(target)))
            }
        }
    }

    fn to_datetime(
        &self,
        value: &Value,
        target: &DataType,
        tz: Tz,
    ) -> Result<DateTime<Tz>, CodecError> {
        match value {
            Value::DateTime(dt) => Ok(dt.with_timezone(&tz)),
            Value::LocalDateTime(n) => time::localize(n, tz),
            Value::Date(d) => match d.and_hms_opt(0, 0, 0) {
                Some(n) => time::localize(&n, tz),
                None => Err(CodecError::invalid(target_name(target), d.to_string())),
            },
            Value::String(s) => time::parse_datetime(s, tz),
            _ => {
                let seconds: i64 = narrow(value, target)?;
                tz.timestamp_opt(seconds, 0)
                    .single()
                    .ok_or_else(|| CodecError::overflow(seconds, target_name(target)))
            }
        }
    }
}

impl Coercion {
    /// Index of the `Variant` alternative that `value` should be written as.
    ///
    /// An alternative whose native representation matches `value` exactly wins;
    /// otherwise the first alternative, in canonical order, that accepts the
    /// value through coercion.
    pub fn variant_index(&self, alternatives: &[TypeDescriptor], value: &Value) -> Option<usize> {
        if value.is_null() {
            return None;
        }
        alternatives
            .iter()
            .position(|alt| matches_natively(alt, value))
            .or_else(|| {
                alternatives
                    .iter()
                    .position(|alt| self.coerce(value, alt).is_ok())
            })
    }
}

impl TypeDescriptor {
    /// Which alternative of a `Variant` descriptor `value` belongs to.
    /// Always `None` for other kinds and for `Null`.
    pub fn variant_index_of(&self, value: &Value) -> Option<usize> {
        match &self.data_type {
            DataType::Variant(alternatives) => {
                Coercion::default().variant_index(alternatives, value)
            }
            _ => None,
        }
    }
}

/// True when `value` is exactly what decoding `ty` would produce.
pub fn matches_natively(ty: &TypeDescriptor, value: &Value) -> bool {
    use DataType as T;
    use Value as V;

    match (&ty.data_type, value) {
        (T::Nothing | T::Dynamic { .. }, V::Null) => true,
        (_, V::Null) => ty.nullable,
        (T::Bool, V::Bool(_))
        | (T::I8, V::I8(_))
        | (T::I16, V::I16(_))
        | (T::I32, V::I32(_))
        | (T::I64, V::I64(_))
        | (T::I128, V::I128(_))
        | (T::I256, V::I256(_))
        | (T::U8, V::U8(_))
        | (T::U16, V::U16(_))
        | (T::U32, V::U32(_))
        | (T::U64, V::U64(_))
        | (T::U128, V::U128(_))
        | (T::U256, V::U256(_))
        | (T::F32 | T::BFloat16, V::F32(_))
        | (T::F64, V::F64(_))
        | (T::String, V::String(_))
        | (T::Date | T::Date32, V::Date(_))
        | (T::DateTime(_) | T::DateTime64 { .. }, V::DateTime(_))
        | (T::Uuid, V::Uuid(_))
        | (T::Ipv4, V::Ipv4(_))
        | (T::Ipv6, V::Ipv6(_))
        | (T::Enum8(_), V::Enum8(_))
        | (T::Enum16(_), V::Enum16(_))
        | (T::Dynamic { .. }, _) => true,
        (T::Decimal { scale, .. }, V::Decimal(d)) => d.scale() == *scale,
        (T::FixedString(n), V::Bytes(b)) => b.len() == *n,
        (T::Interval(unit), V::Interval(i)) => i.unit == *unit,
        (T::Array(element), V::Array(items)) => {
            items.iter().all(|item| matches_natively(element, item))
        }
        (T::Tuple { elements, .. }, V::Tuple(items)) => {
            elements.len() == items.len()
                && elements
                    .iter()
                    .zip(items)
                    .all(|(ty, item)| matches_natively(ty, item))
        }
        (T::Map { key, value: val }, V::Map(entries)) => entries
            .iter()
            .all(|(k, v)| matches_natively(key, k) && matches_natively(val, v)),
        (T::Variant(alternatives), v) => alternatives.iter().any(|alt| matches_natively(alt, v)),
        (T::SimpleAggregateFunction { argument, .. }, v) => matches_natively(argument, v),
        (dt, v) => dt
            .geometry_layout()
            .is_some_and(|layout| matches_natively(&layout, v)),
    }
}

fn target_name(target: &DataType) -> String {
    TypeDescriptor::new(target.clone()).to_string()
}

fn unsupported(value: &Value, target: &DataType) -> CodecError {
    CodecError::UnsupportedConversion {
        from: value.variant_name(),
        to: target_name(target),
    }
}

// ── integers ──────────────────────────────────────────────────────────────────

/// Any integer as sign and magnitude, wide enough for every source and target.
#[derive(Debug, Clone, Copy)]
struct IntValue {
    negative: bool,
    magnitude: U256,
}

impl IntValue {
    fn signed(v: i128) -> Self {
        Self {
            negative: v < 0,
            magnitude: U256::from_u128(v.unsigned_abs()),
        }
    }

    fn unsigned(v: u128) -> Self {
        Self {
            negative: false,
            magnitude: U256::from_u128(v),
        }
    }

    fn to_i128(self) -> Option<i128> {
        let m = self.magnitude.to_u128()?;
        if self.negative {
            0i128.checked_sub_unsigned(m)
        } else {
            i128::try_from(m).ok()
        }
    }

    fn to_u128(self) -> Option<u128> {
        if self.negative && !self.magnitude.is_zero() {
            return None;
        }
        self.magnitude.to_u128()
    }

    fn to_i256(self, target: &DataType) -> Result<i256, CodecError> {
        i256_from_sign_magnitude(self.negative, self.magnitude)
            .ok_or_else(|| CodecError::overflow(self, target_name(target)))
    }

    fn to_u256(self, target: &DataType) -> Result<U256, CodecError> {
        if self.negative && !self.magnitude.is_zero() {
            return Err(CodecError::overflow(self, target_name(target)));
        }
        Ok(self.magnitude)
    }

    fn to_f64(self) -> f64 {
        let m = self.magnitude.to_f64();
        if self.negative { -m } else { m }
    }
}

impl fmt::Display for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative && !self.magnitude.is_zero() {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

/// Narrows any integer-like source to `T`, reporting out-of-range as overflow.
fn narrow<T>(value: &Value, target: &DataType) -> Result<T, CodecError>
where
    T: TryFrom<i128> + TryFrom<u128>,
{
    let int = integer_of(value, target)?;
    let narrowed = if int.negative {
        int.to_i128().and_then(|v| T::try_from(v).ok())
    } else {
        int.to_u128().and_then(|v| T::try_from(v).ok())
    };
    narrowed.ok_or_else(|| CodecError::overflow(int, target_name(target)))
}

fn integer_of(value: &Value, target: &DataType) -> Result<IntValue, CodecError> {
    Ok(match value {
        Value::Bool(b) => IntValue::unsigned(*b as u128),
        Value::I8(v) => IntValue::signed(*v as i128),
        Value::I16(v) => IntValue::signed(*v as i128),
        Value::I32(v) => IntValue::signed(*v as i128),
        Value::I64(v) => IntValue::signed(*v as i128),
        Value::I128(v) => IntValue::signed(*v),
        Value::I256(v) => {
            let (negative, magnitude) = i256_to_sign_magnitude(*v);
            IntValue {
                negative,
                magnitude,
            }
        }
        Value::U8(v) => IntValue::unsigned(*v as u128),
        Value::U16(v) => IntValue::unsigned(*v as u128),
        Value::U32(v) => IntValue::unsigned(*v as u128),
        Value::U64(v) => IntValue::unsigned(*v as u128),
        Value::U128(v) => IntValue::unsigned(*v),
        Value::U256(v) => IntValue {
            negative: false,
            magnitude: *v,
        },
        Value::Enum8(v) => IntValue::signed(*v as i128),
        Value::Enum16(v) => IntValue::signed(*v as i128),
        Value::Interval(i) => IntValue::unsigned(i.count as u128),
        Value::F32(v) => float_to_int(*v as f64, target)?,
        Value::F64(v) => float_to_int(*v, target)?,
        Value::Decimal(d) => {
            if !d.is_integer() {
                return Err(CodecError::overflow(d, target_name(target)));
            }
            let (negative, magnitude) = i256_to_sign_magnitude(d.trunc());
            IntValue {
                negative,
                magnitude,
            }
        }
        Value::String(s) => parse_int(s, target)?,
        _ => return Err(unsupported(value, target)),
    })
}

fn float_to_int(v: f64, target: &DataType) -> Result<IntValue, CodecError> {
    if !v.is_finite() || v.trunc() != v {
        return Err(CodecError::overflow(v, target_name(target)));
    }
    let magnitude = format!("{:.0}", v.abs())
        .parse::<U256>()
        .map_err(|_| CodecError::overflow(v, target_name(target)))?;
    Ok(IntValue {
        negative: v < 0.0,
        magnitude,
    })
}

fn parse_int(s: &str, target: &DataType) -> Result<IntValue, CodecError> {
    let text = s.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    match digits.parse::<U256>() {
        Ok(magnitude) => Ok(IntValue {
            negative,
            magnitude,
        }),
        Err(ParseWideIntError::OutOfRange) => Err(CodecError::overflow(text, target_name(target))),
        Err(e) => Err(CodecError::parse(s, target_name(target), e)),
    }
}

// ── floats and decimals ───────────────────────────────────────────────────────

fn to_f64(value: &Value, target: &DataType) -> Result<f64, CodecError> {
    match value {
        Value::F32(v) => Ok(*v as f64),
        Value::F64(v) => Ok(*v),
        Value::Decimal(d) => Ok(d.to_f64()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| CodecError::parse(s, target_name(target), e)),
        _ => Ok(integer_of(value, target)?.to_f64()),
    }
}

fn to_f32(value: &Value, target: &DataType) -> Result<f32, CodecError> {
    if let Value::F32(v) = value {
        return Ok(*v);
    }
    let wide = to_f64(value, target)?;
    let narrow = wide as f32;
    if wide.is_finite() && narrow.is_infinite() {
        return Err(CodecError::overflow(wide, target_name(target)));
    }
    Ok(narrow)
}

fn to_decimal(value: &Value, target: &DataType) -> Result<Decimal, CodecError> {
    match value {
        Value::Decimal(d) => Ok(*d),
        Value::F32(v) if v.is_finite() => format!("{v}").parse(),
        Value::F32(v) => Err(CodecError::invalid(target_name(target), v.to_string())),
        Value::F64(v) => Decimal::from_f64(*v),
        Value::String(s) => s.parse(),
        _ => Ok(Decimal::new(integer_of(value, target)?.to_i256(target)?, 0)),
    }
}

// ── identifiers and addresses ─────────────────────────────────────────────────

fn to_uuid(value: &Value, target: &DataType) -> Result<Uuid, CodecError> {
    match value {
        Value::Uuid(u) => Ok(*u),
        Value::String(s) => Uuid::parse_str(s.trim()).map_err(|e| CodecError::parse(s, "UUID", e)),
        Value::U128(v) => Ok(Uuid::from_u128(*v)),
        Value::Bytes(b) => Uuid::from_slice(b).map_err(|e| CodecError::invalid("UUID", e.to_string())),
        _ => Err(unsupported(value, target)),
    }
}

fn to_ipv4(value: &Value, target: &DataType) -> Result<Ipv4Addr, CodecError> {
    match value {
        Value::Ipv4(ip) => Ok(*ip),
        Value::Ipv6(ip) => ip
            .to_ipv4_mapped()
            .ok_or_else(|| CodecError::invalid("IPv4", format!("{ip} is not IPv4-mapped"))),
        Value::String(s) => s
            .trim()
            .parse::<Ipv4Addr>()
            .map_err(|e| CodecError::parse(s, "IPv4", e)),
        Value::U32(v) => Ok(Ipv4Addr::from(*v)),
        _ => Err(unsupported(value, target)),
    }
}

fn to_ipv6(value: &Value, target: &DataType) -> Result<Ipv6Addr, CodecError> {
    match value {
        Value::Ipv6(ip) => Ok(*ip),
        Value::Ipv4(ip) => Ok(ip.to_ipv6_mapped()),
        Value::String(s) => match s.trim().parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => Ok(ip),
            Ok(IpAddr::V4(ip)) => Ok(ip.to_ipv6_mapped()),
            Err(e) => Err(CodecError::parse(s, "IPv6", e)),
        },
        Value::Bytes(b) => <[u8; 16]>::try_from(&b[..])
            .map(Ipv6Addr::from)
            .map_err(|_| CodecError::invalid("IPv6", format!("{} bytes, expected 16", b.len()))),
        _ => Err(unsupported(value, target)),
    }
}

// ── typed extraction ──────────────────────────────────────────────────────────

/// Typed view of a decoded [`Value`], following the same rules as encoding.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, CodecError>;
}

fn non_null(value: &Value, target: &str) -> Result<(), CodecError> {
    if value.is_null() {
        return Err(CodecError::invalid(target, "unexpected NULL"));
    }
    Ok(())
}

macro_rules! impl_from_value_int {
    ($($t:ty => $dt:ident),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_value(value: &Value) -> Result<Self, CodecError> {
                    non_null(value, stringify!($dt))?;
                    narrow(value, &DataType::$dt)
                }
            }
        )*
    };
}

impl_from_value_int!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
);

impl FromValue for i256 {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "Int256")?;
        integer_of(value, &DataType::I256)?.to_i256(&DataType::I256)
    }
}

impl FromValue for U256 {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "UInt256")?;
        integer_of(value, &DataType::U256)?.to_u256(&DataType::U256)
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "Float32")?;
        to_f32(value, &DataType::F32)
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "Float64")?;
        to_f64(value, &DataType::F64)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "Bool")?;
        Coercion::default().to_bool(value)
    }
}

impl FromValue for Decimal {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "Decimal")?;
        to_decimal(
            value,
            &DataType::Decimal {
                precision: crate::decimal::MAX_DECIMAL_PRECISION,
                scale: 0,
            },
        )
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "String")?;
        match value {
            Value::String(s) => Ok(s.to_string()),
            Value::Bytes(b) => String::from_utf8(b.to_vec())
                .map_err(|e| CodecError::invalid("String", e.to_string())),
            _ => Err(unsupported(value, &DataType::String)),
        }
    }
}

impl FromValue for Arc<[u8]> {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "FixedString")?;
        match value {
            Value::Bytes(b) => Ok(Arc::clone(b)),
            Value::String(s) => Ok(Arc::from(s.as_bytes())),
            _ => Err(unsupported(value, &DataType::String)),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "Date32")?;
        Coercion::default().to_date(value, &DataType::Date32)
    }
}

impl FromValue for DateTime<Tz> {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "DateTime64")?;
        match value {
            Value::DateTime(dt) => Ok(*dt),
            _ => {
                let target = DataType::DateTime64 {
                    scale: 9,
                    time_zone: None,
                };
                Coercion::default().to_datetime(value, &target, Tz::UTC)
            }
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        DateTime::<Tz>::from_value(value).map(|dt| dt.with_timezone(&Utc))
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::LocalDateTime(n) => Ok(*n),
            _ => DateTime::<Tz>::from_value(value).map(|dt| dt.naive_local()),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "UUID")?;
        to_uuid(value, &DataType::Uuid)
    }
}

impl FromValue for Ipv4Addr {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "IPv4")?;
        to_ipv4(value, &DataType::Ipv4)
    }
}

impl FromValue for Ipv6Addr {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        non_null(value, "IPv6")?;
        to_ipv6(value, &DataType::Ipv6)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Null => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            _ => Err(unsupported(value, &DataType::Array(Box::new(DataType::Nothing.into())))),
        }
    }
}
