//! RowBinary value decoding.

use std::{
    net::{Ipv4Addr, Ipv6Addr},
    sync::Arc,
};

use bytes::Buf;
use chrono::TimeZone;
use rowbinary_core::{
    CodecError, DataType, Decimal, DecimalWidth, EnumTable, Interval, TypeDescriptor, Tz, U256,
    Value, i256, time,
};
use tracing::trace;
use uuid::Uuid;

use crate::{
    options::CodecOptions,
    type_tag::read_type_tag,
    varint::{read_exact, read_len},
};

/// Discriminator marking a NULL `Variant` value.
pub const VARIANT_NULL_DISCRIMINATOR: u8 = 0xFF;

/// Nesting limit for one value, counting every composite level and every
/// `Dynamic` type tag read along the way.
pub const MAX_VALUE_DEPTH: usize = 128;

/// Largest count accepted for an array or map whose elements take no bytes.
pub const MAX_ZERO_WIDTH_ITEMS: usize = 1 << 20;

/// Reads one value of a given [`TypeDescriptor`] from a byte cursor.
///
/// The cursor is advanced past exactly the bytes of the value. On error the
/// cursor position is unspecified; callers must not resume on the same buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueDecoder {
    options: CodecOptions,
}

impl ValueDecoder {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn decode<B: Buf>(&self, buf: &mut B, ty: &TypeDescriptor) -> Result<Value, CodecError> {
        self.decode_at(buf, ty, 0)
    }

    fn decode_at<B: Buf>(
        &self,
        buf: &mut B,
        ty: &TypeDescriptor,
        depth: usize,
    ) -> Result<Value, CodecError> {
        if depth > MAX_VALUE_DEPTH {
            return Err(CodecError::invalid(
                ty.data_type.kind_name(),
                format!("value nested deeper than {MAX_VALUE_DEPTH} levels"),
            ));
        }
        if ty.nullable {
            match buf.try_get_u8()? {
                0 => {}
                1 => return Ok(Value::Null),
                flag => {
                    return Err(CodecError::invalid(
                        "Nullable",
                        format!("null flag 0x{flag:02x}"),
                    ));
                }
            }
        }
        self.decode_kind(buf, &ty.data_type, depth)
    }

    fn decode_kind<B: Buf>(
        &self,
        buf: &mut B,
        data_type: &DataType,
        depth: usize,
    ) -> Result<Value, CodecError> {
        let depth = depth + 1;
        Ok(match data_type {
            DataType::Nothing => Value::Null,
            DataType::Bool => Value::Bool(buf.try_get_u8()? != 0),
            DataType::I8 => Value::I8(buf.try_get_i8()?),
            DataType::I16 => Value::I16(buf.try_get_i16_le()?),
            DataType::I32 => Value::I32(buf.try_get_i32_le()?),
            DataType::I64 => Value::I64(buf.try_get_i64_le()?),
            DataType::I128 => Value::I128(buf.try_get_i128_le()?),
            DataType::I256 => Value::I256(read_i256(buf)?),
            DataType::U8 => Value::U8(buf.try_get_u8()?),
            DataType::U16 => Value::U16(buf.try_get_u16_le()?),
            DataType::U32 => Value::U32(buf.try_get_u32_le()?),
            DataType::U64 => Value::U64(buf.try_get_u64_le()?),
            DataType::U128 => Value::U128(buf.try_get_u128_le()?),
            DataType::U256 => {
                let mut raw = [0u8; 32];
                buf.try_copy_to_slice(&mut raw)?;
                Value::U256(U256::from_le_bytes(raw))
            }
            DataType::F32 => Value::F32(buf.try_get_f32_le()?),
            DataType::F64 => Value::F64(buf.try_get_f64_le()?),
            DataType::BFloat16 => Value::F32(f32::from_bits((buf.try_get_u16_le()? as u32) << 16)),
            DataType::Decimal { precision, scale } => {
                let unscaled = match DecimalWidth::for_precision(*precision) {
                    DecimalWidth::W32 => i256::from_i128(buf.try_get_i32_le()? as i128),
                    DecimalWidth::W64 => i256::from_i128(buf.try_get_i64_le()? as i128),
                    DecimalWidth::W128 => i256::from_i128(buf.try_get_i128_le()?),
                    DecimalWidth::W256 => read_i256(buf)?,
                };
                Value::Decimal(Decimal::new(unscaled, *scale))
            }
            DataType::String => {
                let len = read_len(buf)?;
                let bytes = read_exact(buf, len)?;
                let text = String::from_utf8(bytes)
                    .map_err(|e| CodecError::invalid("String", e.to_string()))?;
                Value::String(Arc::from(text))
            }
            DataType::FixedString(n) => Value::Bytes(Arc::from(read_exact(buf, *n)?)),
            DataType::Date => {
                let days = buf.try_get_u16_le()? as i64;
                Value::Date(date_from_days(days, "Date")?)
            }
            DataType::Date32 => {
                let days = buf.try_get_i32_le()? as i64;
                Value::Date(date_from_days(days, "Date32")?)
            }
            DataType::DateTime(tz) => {
                let seconds = buf.try_get_u32_le()? as i64;
                let tz = self.time_zone(*tz);
                Value::DateTime(tz.timestamp_opt(seconds, 0).single().ok_or_else(|| {
                    CodecError::invalid("DateTime", format!("{seconds} seconds out of range"))
                })?)
            }
            DataType::DateTime64 { scale, time_zone } => {
                let ticks = buf.try_get_i64_le()?;
                let tz = self.time_zone(*time_zone);
                Value::DateTime(time::datetime64_from_ticks(ticks, *scale, tz).ok_or_else(
                    || CodecError::invalid("DateTime64", format!("{ticks} ticks out of range")),
                )?)
            }
            DataType::Uuid => {
                let high = buf.try_get_u64_le()?;
                let low = buf.try_get_u64_le()?;
                Value::Uuid(Uuid::from_u64_pair(high, low))
            }
            DataType::Ipv4 => Value::Ipv4(Ipv4Addr::from(buf.try_get_u32_le()?)),
            DataType::Ipv6 => {
                let mut raw = [0u8; 16];
                buf.try_copy_to_slice(&mut raw)?;
                Value::Ipv6(Ipv6Addr::from(raw))
            }
            DataType::Enum8(table) => {
                let ordinal = buf.try_get_i8()?;
                self.check_enum(table, ordinal as i16, "Enum8")?;
                Value::Enum8(ordinal)
            }
            DataType::Enum16(table) => {
                let ordinal = buf.try_get_i16_le()?;
                self.check_enum(table, ordinal, "Enum16")?;
                Value::Enum16(ordinal)
            }
            DataType::Interval(unit) => Value::Interval(Interval {
                unit: *unit,
                count: buf.try_get_u64_le()?,
            }),
            DataType::Point
            | DataType::Ring
            | DataType::LineString
            | DataType::Polygon
            | DataType::MultiLineString
            | DataType::MultiPolygon => match data_type.geometry_layout() {
                Some(layout) => self.decode_at(buf, &layout, depth)?,
                None => return Err(CodecError::UnsupportedType(data_type.to_string())),
            },
            DataType::Array(element) => {
                let count = read_len(buf)?;
                check_zero_width_count(count, is_zero_width(element), "Array")?;
                let mut items = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    items.push(self.decode_at(buf, element, depth)?);
                }
                Value::Array(items)
            }
            DataType::Tuple { elements, .. } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.decode_at(buf, element, depth)?);
                }
                Value::Tuple(items)
            }
            DataType::Map { key, value } => {
                let count = read_len(buf)?;
                check_zero_width_count(count, is_zero_width(key) && is_zero_width(value), "Map")?;
                let mut entries = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    let k = self.decode_at(buf, key, depth)?;
                    let v = self.decode_at(buf, value, depth)?;
                    entries.push((k, v));
                }
                Value::Map(entries)
            }
            DataType::Variant(alternatives) => {
                let discriminator = buf.try_get_u8()?;
                if discriminator == VARIANT_NULL_DISCRIMINATOR {
                    return Ok(Value::Null);
                }
                let alternative = alternatives.get(discriminator as usize).ok_or_else(|| {
                    CodecError::invalid(
                        "Variant",
                        format!(
                            "discriminator {discriminator} with {} alternatives",
                            alternatives.len()
                        ),
                    )
                })?;
                self.decode_at(buf, alternative, depth)?
            }
            DataType::Dynamic { .. } => {
                let actual = read_type_tag(buf)?;
                trace!(ty = %actual, "dynamic value");
                self.decode_at(buf, &actual, depth)?
            }
            DataType::SimpleAggregateFunction { argument, .. } => {
                self.decode_at(buf, argument, depth)?
            }
            DataType::AggregateFunction {
                function,
                arguments,
            } if function == "groupBitmap" && arguments.len() == 1 => {
                self.decode_bitmap(buf, &arguments[0], depth)?
            }
            DataType::AggregateFunction { function, .. } => {
                return Err(CodecError::UnsupportedType(format!(
                    "AggregateFunction({function})"
                )));
            }
        })
    }

    /// Serialized `groupBitmap` state: a flag byte, then either an explicit
    /// small set of values or an opaque roaring bitmap blob.
    fn decode_bitmap<B: Buf>(
        &self,
        buf: &mut B,
        element: &TypeDescriptor,
        depth: usize,
    ) -> Result<Value, CodecError> {
        match buf.try_get_u8()? {
            0 => {
                let count = read_len(buf)?;
                let mut items = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    items.push(self.decode_kind(buf, &element.data_type, depth)?);
                }
                Ok(Value::Array(items))
            }
            1 => {
                let len = read_len(buf)?;
                Ok(Value::Bytes(Arc::from(read_exact(buf, len)?)))
            }
            flag => Err(CodecError::invalid(
                "groupBitmap",
                format!("state flag 0x{flag:02x}"),
            )),
        }
    }

    fn time_zone(&self, declared: Option<Tz>) -> Tz {
        declared.unwrap_or(self.options.default_time_zone)
    }

    fn check_enum(&self, table: &EnumTable, ordinal: i16, kind: &str) -> Result<(), CodecError> {
        if self.options.strict_enums && !table.contains_value(ordinal) {
            return Err(CodecError::invalid(
                kind,
                format!("ordinal {ordinal} has no name"),
            ));
        }
        Ok(())
    }
}

/// True when a value of `ty` occupies no bytes on the wire.
fn is_zero_width(ty: &TypeDescriptor) -> bool {
    !ty.nullable
        && match &ty.data_type {
            DataType::Nothing => true,
            DataType::Tuple { elements, .. } => elements.iter().all(is_zero_width),
            DataType::SimpleAggregateFunction { argument, .. } => is_zero_width(argument),
            _ => false,
        }
}

/// Element counts are otherwise bounded by the input length; zero-width
/// elements are not.
fn check_zero_width_count(count: usize, zero_width: bool, kind: &str) -> Result<(), CodecError> {
    if zero_width && count > MAX_ZERO_WIDTH_ITEMS {
        return Err(CodecError::invalid(
            kind,
            format!("{count} zero-width elements exceed {MAX_ZERO_WIDTH_ITEMS}"),
        ));
    }
    Ok(())
}

fn read_i256<B: Buf>(buf: &mut B) -> Result<i256, CodecError> {
    let mut raw = [0u8; 32];
    buf.try_copy_to_slice(&mut raw)?;
    Ok(i256::from_le_bytes(raw))
}

fn date_from_days(days: i64, kind: &str) -> Result<chrono::NaiveDate, CodecError> {
    time::date_from_epoch_days(days)
        .ok_or_else(|| CodecError::invalid(kind, format!("{days} days out of range")))
}
