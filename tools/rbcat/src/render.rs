//! Conversion of decoded values to JSON.
//!
//! Integers wider than 64 bits, decimals and byte strings become JSON
//! strings so no precision is lost. Enum ordinals are shown by name when the
//! column type is known.

use rowbinary::{
    TypeDescriptor, Value,
    core::{DataType, EnumTable},
};
use serde_json::{Map, Number, Value as Json};

pub fn to_json(value: &Value, ty: Option<&TypeDescriptor>) -> Json {
    let data_type = ty.map(|ty| &ty.data_type);
    match value {
        Value::Null => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::I8(v) => Json::from(*v),
        Value::I16(v) => Json::from(*v),
        Value::I32(v) => Json::from(*v),
        Value::I64(v) => Json::from(*v),
        Value::U8(v) => Json::from(*v),
        Value::U16(v) => Json::from(*v),
        Value::U32(v) => Json::from(*v),
        Value::U64(v) => Json::from(*v),
        Value::I128(v) => Json::String(v.to_string()),
        Value::U128(v) => Json::String(v.to_string()),
        Value::I256(v) => Json::String(v.to_string()),
        Value::U256(v) => Json::String(v.to_string()),
        Value::F32(v) => float(f64::from(*v)),
        Value::F64(v) => float(*v),
        Value::Decimal(v) => Json::String(v.to_string()),
        Value::String(s) => Json::String(s.to_string()),
        Value::Bytes(b) => Json::String(hex::encode(b)),
        Value::Date(d) => Json::String(d.to_string()),
        Value::DateTime(dt) => Json::String(dt.to_rfc3339()),
        Value::LocalDateTime(dt) => Json::String(dt.to_string()),
        Value::Uuid(u) => Json::String(u.to_string()),
        Value::Ipv4(ip) => Json::String(ip.to_string()),
        Value::Ipv6(ip) => Json::String(ip.to_string()),
        Value::Enum8(v) => enum_json(i16::from(*v), data_type),
        Value::Enum16(v) => enum_json(*v, data_type),
        Value::Interval(interval) => Json::from(interval.count),
        Value::Array(items) => {
            let element = match data_type {
                Some(DataType::Array(element)) => Some(element.as_ref()),
                _ => None,
            };
            Json::Array(items.iter().map(|v| to_json(v, element)).collect())
        }
        Value::Tuple(items) => tuple_json(items, data_type),
        Value::Map(entries) => map_json(entries, data_type),
    }
}

/// Cell text for tab-separated output: strings unquoted, everything else as JSON.
pub fn to_text(value: &Value, ty: Option<&TypeDescriptor>) -> String {
    match to_json(value, ty) {
        Json::String(s) => s,
        Json::Null => "\\N".to_string(),
        other => other.to_string(),
    }
}

fn float(v: f64) -> Json {
    Number::from_f64(v).map_or_else(|| Json::String(v.to_string()), Json::Number)
}

fn enum_json(ordinal: i16, data_type: Option<&DataType>) -> Json {
    let table: Option<&EnumTable> = match data_type {
        Some(DataType::Enum8(table) | DataType::Enum16(table)) => Some(table),
        _ => None,
    };
    match table.and_then(|t| t.name_of(ordinal)) {
        Some(name) => Json::String(name.to_string()),
        None => Json::from(ordinal),
    }
}

fn tuple_json(items: &[Value], data_type: Option<&DataType>) -> Json {
    let Some(DataType::Tuple { elements, names }) = data_type else {
        return Json::Array(items.iter().map(|v| to_json(v, None)).collect());
    };
    let values = items
        .iter()
        .enumerate()
        .map(|(i, v)| to_json(v, elements.get(i)));
    match names {
        Some(names) => Json::Object(names.iter().cloned().zip(values).collect()),
        None => Json::Array(values.collect()),
    }
}

/// Object when every key renders as a string, otherwise `[key, value]` pairs.
fn map_json(entries: &[(Value, Value)], data_type: Option<&DataType>) -> Json {
    let (key_ty, value_ty) = match data_type {
        Some(DataType::Map { key, value }) => (Some(key.as_ref()), Some(value.as_ref())),
        _ => (None, None),
    };
    let pairs: Vec<(Json, Json)> = entries
        .iter()
        .map(|(k, v)| (to_json(k, key_ty), to_json(v, value_ty)))
        .collect();
    if pairs.iter().all(|(k, _)| k.is_string()) {
        let mut object = Map::new();
        for (k, v) in pairs {
            if let Json::String(k) = k {
                object.insert(k, v);
            }
        }
        Json::Object(object)
    } else {
        Json::Array(
            pairs
                .into_iter()
                .map(|(k, v)| Json::Array(vec![k, v]))
                .collect(),
        )
    }
}
