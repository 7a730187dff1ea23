//! Binary type encoding used by `Dynamic` values.
//!
//! Every kind has one tag byte. `Nullable` and `LowCardinality` are modifier
//! tags written ahead of the kind tag; parameterized kinds append their
//! parameters right after it.

use bytes::{Buf, BufMut};
use rowbinary_core::{
    CodecError, DataType, DecimalWidth, EnumTable, IntervalUnit, TypeDescriptor, Tz,
};

use crate::varint::{read_len, read_string, read_varint, write_len, write_string, write_varint};

/// Tag bytes of the binary type encoding.
pub mod tag {
    pub const NOTHING: u8 = 0x00;
    pub const UINT8: u8 = 0x01;
    pub const UINT16: u8 = 0x02;
    pub const UINT32: u8 = 0x03;
    pub const UINT64: u8 = 0x04;
    pub const UINT128: u8 = 0x05;
    pub const UINT256: u8 = 0x06;
    pub const INT8: u8 = 0x07;
    pub const INT16: u8 = 0x08;
    pub const INT32: u8 = 0x09;
    pub const INT64: u8 = 0x0A;
    pub const INT128: u8 = 0x0B;
    pub const INT256: u8 = 0x0C;
    pub const FLOAT32: u8 = 0x0D;
    pub const FLOAT64: u8 = 0x0E;
    pub const DATE: u8 = 0x0F;
    pub const DATE32: u8 = 0x10;
    pub const DATETIME: u8 = 0x11;
    pub const DATETIME_WITH_TZ: u8 = 0x12;
    pub const DATETIME64: u8 = 0x13;
    pub const DATETIME64_WITH_TZ: u8 = 0x14;
    pub const STRING: u8 = 0x15;
    pub const FIXED_STRING: u8 = 0x16;
    pub const ENUM8: u8 = 0x17;
    pub const ENUM16: u8 = 0x18;
    pub const DECIMAL32: u8 = 0x19;
    pub const DECIMAL64: u8 = 0x1A;
    pub const DECIMAL128: u8 = 0x1B;
    pub const DECIMAL256: u8 = 0x1C;
    pub const UUID: u8 = 0x1D;
    pub const ARRAY: u8 = 0x1E;
    pub const TUPLE: u8 = 0x1F;
    pub const NAMED_TUPLE: u8 = 0x20;
    pub const SET: u8 = 0x21;
    pub const INTERVAL: u8 = 0x22;
    pub const NULLABLE: u8 = 0x23;
    pub const FUNCTION: u8 = 0x24;
    pub const AGGREGATE_FUNCTION: u8 = 0x25;
    pub const LOW_CARDINALITY: u8 = 0x26;
    pub const MAP: u8 = 0x27;
    pub const IPV4: u8 = 0x28;
    pub const IPV6: u8 = 0x29;
    pub const VARIANT: u8 = 0x2A;
    pub const DYNAMIC: u8 = 0x2B;
    pub const CUSTOM: u8 = 0x2C;
    pub const BOOL: u8 = 0x2D;
    pub const SIMPLE_AGGREGATE_FUNCTION: u8 = 0x2E;
    pub const NESTED: u8 = 0x2F;
    pub const JSON: u8 = 0x30;
    pub const BFLOAT16: u8 = 0x31;
}

/// `max_types` written for `Dynamic` when the descriptor leaves it open.
pub const DEFAULT_DYNAMIC_MAX_TYPES: u8 = 32;

/// Nesting limit when reading tags from untrusted input.
const MAX_DEPTH: usize = 64;

pub fn write_type_tag<B: BufMut>(buf: &mut B, ty: &TypeDescriptor) -> Result<(), CodecError> {
    if ty.nullable {
        buf.put_u8(tag::NULLABLE);
    }
    if ty.low_cardinality {
        buf.put_u8(tag::LOW_CARDINALITY);
    }
    write_kind(buf, &ty.data_type)
}

fn write_kind<B: BufMut>(buf: &mut B, data_type: &DataType) -> Result<(), CodecError> {
    match data_type {
        DataType::Nothing => buf.put_u8(tag::NOTHING),
        DataType::Bool => buf.put_u8(tag::BOOL),
        DataType::U8 => buf.put_u8(tag::UINT8),
        DataType::U16 => buf.put_u8(tag::UINT16),
        DataType::U32 => buf.put_u8(tag::UINT32),
        DataType::U64 => buf.put_u8(tag::UINT64),
        DataType::U128 => buf.put_u8(tag::UINT128),
        DataType::U256 => buf.put_u8(tag::UINT256),
        DataType::I8 => buf.put_u8(tag::INT8),
        DataType::I16 => buf.put_u8(tag::INT16),
        DataType::I32 => buf.put_u8(tag::INT32),
        DataType::I64 => buf.put_u8(tag::INT64),
        DataType::I128 => buf.put_u8(tag::INT128),
        DataType::I256 => buf.put_u8(tag::INT256),
        DataType::F32 => buf.put_u8(tag::FLOAT32),
        DataType::F64 => buf.put_u8(tag::FLOAT64),
        DataType::BFloat16 => buf.put_u8(tag::BFLOAT16),
        DataType::Date => buf.put_u8(tag::DATE),
        DataType::Date32 => buf.put_u8(tag::DATE32),
        DataType::DateTime(None) => buf.put_u8(tag::DATETIME),
        DataType::DateTime(Some(tz)) => {
            buf.put_u8(tag::DATETIME_WITH_TZ);
            write_string(buf, tz.name())?;
        }
        DataType::DateTime64 {
            scale,
            time_zone: None,
        } => {
            buf.put_u8(tag::DATETIME64);
            buf.put_u8(*scale);
        }
        DataType::DateTime64 {
            scale,
            time_zone: Some(tz),
        } => {
            buf.put_u8(tag::DATETIME64_WITH_TZ);
            buf.put_u8(*scale);
            write_string(buf, tz.name())?;
        }
        DataType::String => buf.put_u8(tag::STRING),
        DataType::FixedString(n) => {
            buf.put_u8(tag::FIXED_STRING);
            write_len(buf, *n)?;
        }
        DataType::Enum8(table) => {
            buf.put_u8(tag::ENUM8);
            write_len(buf, table.len())?;
            for (name, value) in table.iter() {
                write_string(buf, name)?;
                let value = i8::try_from(*value).map_err(|_| CodecError::overflow(value, "Enum8"))?;
                buf.put_i8(value);
            }
        }
        DataType::Enum16(table) => {
            buf.put_u8(tag::ENUM16);
            write_len(buf, table.len())?;
            for (name, value) in table.iter() {
                write_string(buf, name)?;
                buf.put_i16_le(*value);
            }
        }
        DataType::Decimal { precision, scale } => {
            buf.put_u8(match DecimalWidth::for_precision(*precision) {
                DecimalWidth::W32 => tag::DECIMAL32,
                DecimalWidth::W64 => tag::DECIMAL64,
                DecimalWidth::W128 => tag::DECIMAL128,
                DecimalWidth::W256 => tag::DECIMAL256,
            });
            buf.put_u8(*precision);
            buf.put_u8(*scale);
        }
        DataType::Uuid => buf.put_u8(tag::UUID),
        DataType::Ipv4 => buf.put_u8(tag::IPV4),
        DataType::Ipv6 => buf.put_u8(tag::IPV6),
        DataType::Interval(unit) => {
            buf.put_u8(tag::INTERVAL);
            buf.put_u8(unit.code());
        }
        DataType::Point
        | DataType::Ring
        | DataType::LineString
        | DataType::Polygon
        | DataType::MultiLineString
        | DataType::MultiPolygon => {
            buf.put_u8(tag::CUSTOM);
            write_string(buf, data_type.kind_name())?;
        }
        DataType::Array(element) => {
            buf.put_u8(tag::ARRAY);
            write_type_tag(buf, element)?;
        }
        DataType::Tuple {
            elements,
            names: None,
        } => {
            buf.put_u8(tag::TUPLE);
            write_len(buf, elements.len())?;
            for element in elements {
                write_type_tag(buf, element)?;
            }
        }
        DataType::Tuple {
            elements,
            names: Some(names),
        } => {
            if names.len() != elements.len() {
                return Err(CodecError::invalid(
                    "Tuple",
                    format!("{} names for {} elements", names.len(), elements.len()),
                ));
            }
            buf.put_u8(tag::NAMED_TUPLE);
            write_len(buf, elements.len())?;
            for (name, element) in names.iter().zip(elements) {
                write_string(buf, name)?;
                write_type_tag(buf, element)?;
            }
        }
        DataType::Map { key, value } => {
            buf.put_u8(tag::MAP);
            write_type_tag(buf, key)?;
            write_type_tag(buf, value)?;
        }
        DataType::Variant(alternatives) => {
            buf.put_u8(tag::VARIANT);
            write_len(buf, alternatives.len())?;
            for alternative in alternatives {
                write_type_tag(buf, alternative)?;
            }
        }
        DataType::Dynamic { max_types } => {
            buf.put_u8(tag::DYNAMIC);
            buf.put_u8(max_types.unwrap_or(DEFAULT_DYNAMIC_MAX_TYPES));
        }
        DataType::SimpleAggregateFunction { function, argument } => {
            buf.put_u8(tag::SIMPLE_AGGREGATE_FUNCTION);
            write_string(buf, function)?;
            write_varint(buf, 0)?;
            write_varint(buf, 1)?;
            write_type_tag(buf, argument)?;
        }
        DataType::AggregateFunction {
            function,
            arguments,
        } => {
            buf.put_u8(tag::AGGREGATE_FUNCTION);
            write_varint(buf, 0)?;
            write_string(buf, function)?;
            write_varint(buf, 0)?;
            write_len(buf, arguments.len())?;
            for argument in arguments {
                write_type_tag(buf, argument)?;
            }
        }
    }
    Ok(())
}

pub fn read_type_tag<B: Buf>(buf: &mut B) -> Result<TypeDescriptor, CodecError> {
    read_descriptor(buf, 0)
}

fn read_descriptor<B: Buf>(buf: &mut B, depth: usize) -> Result<TypeDescriptor, CodecError> {
    if depth > MAX_DEPTH {
        return Err(CodecError::invalid(
            "type encoding",
            format!("nesting deeper than {MAX_DEPTH}"),
        ));
    }
    let mut nullable = false;
    let mut low_cardinality = false;
    let mut code = buf.try_get_u8()?;
    loop {
        match code {
            tag::NULLABLE if !nullable => nullable = true,
            tag::LOW_CARDINALITY if !low_cardinality => low_cardinality = true,
            _ => break,
        }
        code = buf.try_get_u8()?;
    }
    let data_type = read_kind(buf, code, depth)?;
    Ok(TypeDescriptor {
        data_type,
        nullable,
        low_cardinality,
    })
}

fn read_kind<B: Buf>(buf: &mut B, code: u8, depth: usize) -> Result<DataType, CodecError> {
    let nested = |buf: &mut B| read_descriptor(buf, depth + 1);
    Ok(match code {
        tag::NOTHING => DataType::Nothing,
        tag::BOOL => DataType::Bool,
        tag::UINT8 => DataType::U8,
        tag::UINT16 => DataType::U16,
        tag::UINT32 => DataType::U32,
        tag::UINT64 => DataType::U64,
        tag::UINT128 => DataType::U128,
        tag::UINT256 => DataType::U256,
        tag::INT8 => DataType::I8,
        tag::INT16 => DataType::I16,
        tag::INT32 => DataType::I32,
        tag::INT64 => DataType::I64,
        tag::INT128 => DataType::I128,
        tag::INT256 => DataType::I256,
        tag::FLOAT32 => DataType::F32,
        tag::FLOAT64 => DataType::F64,
        tag::BFLOAT16 => DataType::BFloat16,
        tag::DATE => DataType::Date,
        tag::DATE32 => DataType::Date32,
        tag::DATETIME => DataType::DateTime(None),
        tag::DATETIME_WITH_TZ => DataType::DateTime(Some(read_time_zone(buf)?)),
        tag::DATETIME64 => DataType::datetime64(buf.try_get_u8()?, None)?,
        tag::DATETIME64_WITH_TZ => {
            let scale = buf.try_get_u8()?;
            DataType::datetime64(scale, Some(read_time_zone(buf)?))?
        }
        tag::STRING => DataType::String,
        tag::FIXED_STRING => DataType::FixedString(read_len(buf)?),
        tag::ENUM8 => {
            let count = read_len(buf)?;
            let mut members = Vec::with_capacity(count.min(buf.remaining()));
            for _ in 0..count {
                let name = read_string(buf)?;
                members.push((name, buf.try_get_i8()? as i16));
            }
            DataType::Enum8(EnumTable::new(members))
        }
        tag::ENUM16 => {
            let count = read_len(buf)?;
            let mut members = Vec::with_capacity(count.min(buf.remaining()));
            for _ in 0..count {
                let name = read_string(buf)?;
                members.push((name, buf.try_get_i16_le()?));
            }
            DataType::Enum16(EnumTable::new(members))
        }
        tag::DECIMAL32 | tag::DECIMAL64 | tag::DECIMAL128 | tag::DECIMAL256 => {
            let precision = buf.try_get_u8()?;
            let scale = buf.try_get_u8()?;
            DataType::decimal(precision, scale)?
        }
        tag::UUID => DataType::Uuid,
        tag::IPV4 => DataType::Ipv4,
        tag::IPV6 => DataType::Ipv6,
        tag::INTERVAL => {
            let unit = buf.try_get_u8()?;
            DataType::Interval(IntervalUnit::from_code(unit).ok_or_else(|| {
                CodecError::invalid("Interval", format!("unknown unit byte 0x{unit:02x}"))
            })?)
        }
        tag::CUSTOM => {
            let name = read_string(buf)?;
            match name.as_str() {
                "Point" => DataType::Point,
                "Ring" => DataType::Ring,
                "LineString" => DataType::LineString,
                "Polygon" => DataType::Polygon,
                "MultiLineString" => DataType::MultiLineString,
                "MultiPolygon" => DataType::MultiPolygon,
                _ => return Err(CodecError::UnsupportedType(name)),
            }
        }
        tag::ARRAY => DataType::Array(Box::new(nested(buf)?)),
        tag::TUPLE => {
            let count = read_len(buf)?;
            let mut elements = Vec::with_capacity(count.min(buf.remaining()));
            for _ in 0..count {
                elements.push(nested(buf)?);
            }
            DataType::Tuple {
                elements,
                names: None,
            }
        }
        tag::NAMED_TUPLE => {
            let count = read_len(buf)?;
            let mut names = Vec::with_capacity(count.min(buf.remaining()));
            let mut elements = Vec::with_capacity(count.min(buf.remaining()));
            for _ in 0..count {
                names.push(read_string(buf)?);
                elements.push(nested(buf)?);
            }
            DataType::Tuple {
                elements,
                names: Some(names),
            }
        }
        tag::MAP => {
            let key = nested(buf)?;
            let value = nested(buf)?;
            DataType::Map {
                key: Box::new(key),
                value: Box::new(value),
            }
        }
        tag::VARIANT => {
            let count = read_len(buf)?;
            let mut alternatives = Vec::with_capacity(count.min(buf.remaining()));
            for _ in 0..count {
                alternatives.push(nested(buf)?);
            }
            DataType::variant(alternatives)
        }
        tag::DYNAMIC => DataType::Dynamic {
            max_types: Some(buf.try_get_u8()?),
        },
        tag::SIMPLE_AGGREGATE_FUNCTION => {
            let function = read_string(buf)?;
            expect_no_parameters(buf, &function)?;
            let arguments = read_len(buf)?;
            if arguments != 1 {
                return Err(CodecError::UnsupportedType(format!(
                    "SimpleAggregateFunction({function}) with {arguments} arguments"
                )));
            }
            DataType::SimpleAggregateFunction {
                function,
                argument: Box::new(nested(buf)?),
            }
        }
        tag::AGGREGATE_FUNCTION => {
            let _version = read_varint(buf)?;
            let function = read_string(buf)?;
            expect_no_parameters(buf, &function)?;
            let count = read_len(buf)?;
            let mut arguments = Vec::with_capacity(count.min(buf.remaining()));
            for _ in 0..count {
                arguments.push(nested(buf)?);
            }
            DataType::AggregateFunction {
                function,
                arguments,
            }
        }
        tag::SET => return Err(CodecError::UnsupportedType("Set".into())),
        tag::FUNCTION => return Err(CodecError::UnsupportedType("Function".into())),
        tag::NESTED => return Err(CodecError::UnsupportedType("Nested".into())),
        tag::JSON => return Err(CodecError::UnsupportedType("JSON".into())),
        other => {
            return Err(CodecError::UnsupportedType(format!(
                "type tag 0x{other:02x}"
            )));
        }
    })
}

fn read_time_zone<B: Buf>(buf: &mut B) -> Result<Tz, CodecError> {
    let name = read_string(buf)?;
    name.parse()
        .map_err(|_| CodecError::invalid("DateTime", format!("unknown time zone '{name}'")))
}

/// Parameterized aggregate functions carry typed field values the codec does
/// not model.
fn expect_no_parameters<B: Buf>(buf: &mut B, function: &str) -> Result<(), CodecError> {
    match read_len(buf)? {
        0 => Ok(()),
        n => Err(CodecError::UnsupportedType(format!(
            "{function} with {n} parameters"
        ))),
    }
}
