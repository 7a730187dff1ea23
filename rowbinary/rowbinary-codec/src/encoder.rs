//! RowBinary value encoding.

use bytes::BufMut;
use rowbinary_core::{
    Coercion, CodecError, DataType, DecimalWidth, TypeDescriptor, Value, i256, time,
};
use tracing::{debug, trace};

use crate::{
    decoder::VARIANT_NULL_DISCRIMINATOR,
    infer::infer_type,
    options::CodecOptions,
    type_tag::{tag, write_type_tag},
    varint::write_len,
};

/// Writes values of a given [`TypeDescriptor`] to a byte sink.
///
/// Input values are converted with the configured [`Coercion`] rules before
/// being written; only the native representation ever reaches the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueEncoder {
    coercion: Coercion,
}

impl ValueEncoder {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            coercion: options.coercion(),
        }
    }

    pub fn coercion(&self) -> &Coercion {
        &self.coercion
    }

    pub fn encode<B: BufMut>(
        &self,
        buf: &mut B,
        value: &Value,
        ty: &TypeDescriptor,
    ) -> Result<(), CodecError> {
        if ty.nullable {
            if value.is_null() {
                buf.put_u8(1);
                return Ok(());
            }
            buf.put_u8(0);
        }
        self.encode_kind(buf, value, &ty.data_type)
    }

    fn encode_kind<B: BufMut>(
        &self,
        buf: &mut B,
        value: &Value,
        data_type: &DataType,
    ) -> Result<(), CodecError> {
        if value.is_null() {
            return self.encode_null(buf, data_type);
        }
        match data_type {
            DataType::Array(element) => {
                let Value::Array(items) = value else {
                    return self.encode_coerced(buf, value, data_type);
                };
                write_len(buf, items.len())?;
                for item in items {
                    self.encode(buf, item, element)?;
                }
                Ok(())
            }
            DataType::Tuple { elements, .. } => {
                let items = match value {
                    Value::Tuple(items) | Value::Array(items) => items,
                    _ => return self.encode_coerced(buf, value, data_type),
                };
                if items.len() != elements.len() {
                    return Err(CodecError::invalid(
                        data_type.to_string(),
                        format!("expected {} elements, got {}", elements.len(), items.len()),
                    ));
                }
                for (item, element) in items.iter().zip(elements) {
                    self.encode(buf, item, element)?;
                }
                Ok(())
            }
            DataType::Map { key, value: val } => {
                let Value::Map(entries) = value else {
                    return self.encode_coerced(buf, value, data_type);
                };
                write_len(buf, entries.len())?;
                for (k, v) in entries {
                    self.encode(buf, k, key)?;
                    self.encode(buf, v, val)?;
                }
                Ok(())
            }
            DataType::Variant(alternatives) => {
                let index = self
                    .coercion
                    .variant_index(alternatives, value)
                    .ok_or_else(|| CodecError::UnsupportedConversion {
                        from: value.variant_name(),
                        to: data_type.to_string(),
                    })?;
                let discriminator = u8::try_from(index)
                    .ok()
                    .filter(|d| *d != VARIANT_NULL_DISCRIMINATOR)
                    .ok_or_else(|| CodecError::overflow(index, "Variant discriminator"))?;
                buf.put_u8(discriminator);
                self.encode(buf, value, &alternatives[index])
            }
            DataType::Dynamic { .. } => {
                let actual = infer_type(value)?;
                trace!(ty = %actual, "dynamic value");
                write_type_tag(buf, &actual)?;
                self.encode(buf, value, &actual)
            }
            DataType::SimpleAggregateFunction { argument, .. } => {
                self.encode(buf, value, argument)
            }
            DataType::Point
            | DataType::Ring
            | DataType::LineString
            | DataType::Polygon
            | DataType::MultiLineString
            | DataType::MultiPolygon => match data_type.geometry_layout() {
                Some(layout) => self.encode(buf, value, &layout),
                None => Err(CodecError::UnsupportedType(data_type.to_string())),
            },
            DataType::AggregateFunction {
                function,
                arguments,
            } if function == "groupBitmap" && arguments.len() == 1 => {
                self.encode_bitmap(buf, value, &arguments[0])
            }
            _ => self.encode_coerced(buf, value, data_type),
        }
    }

    /// NULL written under a kind that is not itself nullable.
    fn encode_null<B: BufMut>(&self, buf: &mut B, data_type: &DataType) -> Result<(), CodecError> {
        match data_type {
            DataType::Nothing => Ok(()),
            DataType::Array(_) => write_len(buf, 0),
            DataType::Variant(_) => {
                buf.put_u8(VARIANT_NULL_DISCRIMINATOR);
                Ok(())
            }
            DataType::Dynamic { .. } => {
                buf.put_u8(tag::NOTHING);
                Ok(())
            }
            DataType::SimpleAggregateFunction { argument, .. } => {
                self.encode(buf, &Value::Null, argument)
            }
            _ => Err(CodecError::invalid(
                data_type.to_string(),
                "NULL for a non-nullable column",
            )),
        }
    }

    fn encode_coerced<B: BufMut>(
        &self,
        buf: &mut B,
        value: &Value,
        data_type: &DataType,
    ) -> Result<(), CodecError> {
        let native = self.coercion.coerce_to(value, data_type)?;
        write_native(buf, &native, data_type)
    }

    fn encode_bitmap<B: BufMut>(
        &self,
        buf: &mut B,
        value: &Value,
        element: &TypeDescriptor,
    ) -> Result<(), CodecError> {
        match value {
            Value::Bytes(blob) => {
                buf.put_u8(1);
                write_len(buf, blob.len())?;
                buf.put_slice(blob);
                Ok(())
            }
            Value::Array(items) => {
                buf.put_u8(0);
                write_len(buf, items.len())?;
                for item in items {
                    self.encode_kind(buf, item, &element.data_type)?;
                }
                Ok(())
            }
            _ => Err(CodecError::UnsupportedConversion {
                from: value.variant_name(),
                to: "AggregateFunction(groupBitmap)".into(),
            }),
        }
    }
}

/// Writes a value already in the native representation of a scalar kind.
fn write_native<B: BufMut>(
    buf: &mut B,
    value: &Value,
    data_type: &DataType,
) -> Result<(), CodecError> {
    match (data_type, value) {
        (DataType::Bool, Value::Bool(v)) => buf.put_u8(*v as u8),
        (DataType::I8, Value::I8(v)) => buf.put_i8(*v),
        (DataType::I16, Value::I16(v)) => buf.put_i16_le(*v),
        (DataType::I32, Value::I32(v)) => buf.put_i32_le(*v),
        (DataType::I64, Value::I64(v)) => buf.put_i64_le(*v),
        (DataType::I128, Value::I128(v)) => buf.put_i128_le(*v),
        (DataType::I256, Value::I256(v)) => buf.put_slice(&v.to_le_bytes()),
        (DataType::U8, Value::U8(v)) => buf.put_u8(*v),
        (DataType::U16, Value::U16(v)) => buf.put_u16_le(*v),
        (DataType::U32, Value::U32(v)) => buf.put_u32_le(*v),
        (DataType::U64, Value::U64(v)) => buf.put_u64_le(*v),
        (DataType::U128, Value::U128(v)) => buf.put_u128_le(*v),
        (DataType::U256, Value::U256(v)) => buf.put_slice(&v.to_le_bytes()),
        (DataType::F32, Value::F32(v)) => buf.put_f32_le(*v),
        (DataType::F64, Value::F64(v)) => buf.put_f64_le(*v),
        (DataType::BFloat16, Value::F32(v)) => buf.put_u16_le((v.to_bits() >> 16) as u16),
        (DataType::Decimal { precision, .. }, Value::Decimal(d)) => {
            write_decimal(buf, d.unscaled(), DecimalWidth::for_precision(*precision))?
        }
        (DataType::String, Value::String(s)) => {
            write_len(buf, s.len())?;
            buf.put_slice(s.as_bytes());
        }
        (DataType::FixedString(_), Value::Bytes(b)) => buf.put_slice(b),
        (DataType::Date, Value::Date(d)) => {
            let days = time::epoch_days(*d);
            let days = u16::try_from(days).map_err(|_| CodecError::overflow(d, "Date"))?;
            buf.put_u16_le(days);
        }
        (DataType::Date32, Value::Date(d)) => {
            let days = time::epoch_days(*d);
            let days = i32::try_from(days).map_err(|_| CodecError::overflow(d, "Date32"))?;
            buf.put_i32_le(days);
        }
        (DataType::DateTime(_), Value::DateTime(dt)) => {
            let seconds = u32::try_from(dt.timestamp())
                .map_err(|_| CodecError::overflow(dt, "DateTime"))?;
            if dt.timestamp_subsec_nanos() != 0 {
                debug!(%dt, "dropping sub-second part for DateTime");
            }
            buf.put_u32_le(seconds);
        }
        (DataType::DateTime64 { scale, .. }, Value::DateTime(dt)) => {
            let divisor = time::scale_factor(9 - (*scale).min(9));
            if i64::from(dt.timestamp_subsec_nanos()) % divisor != 0 {
                debug!(%dt, scale = *scale, "truncating DateTime64 below its scale");
            }
            let ticks = time::datetime64_ticks(dt, *scale)
                .ok_or_else(|| CodecError::overflow(dt, data_type))?;
            buf.put_i64_le(ticks);
        }
        (DataType::Uuid, Value::Uuid(u)) => {
            let (high, low) = u.as_u64_pair();
            buf.put_u64_le(high);
            buf.put_u64_le(low);
        }
        (DataType::Ipv4, Value::Ipv4(ip)) => buf.put_u32_le(u32::from(*ip)),
        (DataType::Ipv6, Value::Ipv6(ip)) => buf.put_slice(&ip.octets()),
        (DataType::Enum8(_), Value::Enum8(v)) => buf.put_i8(*v),
        (DataType::Enum16(_), Value::Enum16(v)) => buf.put_i16_le(*v),
        (DataType::Interval(_), Value::Interval(i)) => buf.put_u64_le(i.count),
        (DataType::Nothing, _) => {}
        _ => {
            return Err(CodecError::UnsupportedConversion {
                from: value.variant_name(),
                to: data_type.to_string(),
            });
        }
    }
    Ok(())
}

fn write_decimal<B: BufMut>(
    buf: &mut B,
    unscaled: i256,
    width: DecimalWidth,
) -> Result<(), CodecError> {
    let overflow = || CodecError::overflow(unscaled, format!("{}-byte decimal", width.byte_len()));
    match width {
        DecimalWidth::W32 => {
            let v = unscaled.to_i128().and_then(|v| i32::try_from(v).ok());
            buf.put_i32_le(v.ok_or_else(overflow)?);
        }
        DecimalWidth::W64 => {
            let v = unscaled.to_i128().and_then(|v| i64::try_from(v).ok());
            buf.put_i64_le(v.ok_or_else(overflow)?);
        }
        DecimalWidth::W128 => buf.put_i128_le(unscaled.to_i128().ok_or_else(overflow)?),
        DecimalWidth::W256 => buf.put_slice(&unscaled.to_le_bytes()),
    }
    Ok(())
}
