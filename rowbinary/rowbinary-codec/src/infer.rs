//! Type inference for values written into `Dynamic` columns.

use rowbinary_core::{
    CodecError, DataType, DecimalWidth, MAX_DECIMAL_PRECISION, TypeDescriptor, Value,
};
use tracing::trace;

/// Derives the descriptor a runtime value is written as inside a `Dynamic`
/// column.
///
/// Values whose type cannot be derived without guessing, such as empty
/// arrays, are rejected with [`CodecError::CannotInferType`].
pub fn infer_type(value: &Value) -> Result<TypeDescriptor, CodecError> {
    let data_type = match value {
        Value::Null => DataType::Nothing,
        Value::Bool(_) => DataType::Bool,
        Value::I8(_) => DataType::I8,
        Value::I16(_) => DataType::I16,
        Value::I32(_) => DataType::I32,
        Value::I64(_) => DataType::I64,
        Value::I128(_) => DataType::I128,
        Value::I256(_) => DataType::I256,
        Value::U8(_) => DataType::U8,
        Value::U16(_) => DataType::U16,
        Value::U32(_) => DataType::U32,
        Value::U64(_) => DataType::U64,
        Value::U128(_) => DataType::U128,
        Value::U256(_) => DataType::U256,
        Value::F32(_) => DataType::F32,
        Value::F64(_) => DataType::F64,
        Value::Decimal(d) => {
            let digits = d.precision();
            if digits > MAX_DECIMAL_PRECISION as u32 {
                return Err(CodecError::CannotInferType(format!(
                    "decimal {d} needs {digits} digits"
                )));
            }
            let width = DecimalWidth::for_precision(digits as u8);
            DataType::Decimal {
                precision: width.max_precision(),
                scale: d.scale(),
            }
        }
        Value::String(_) => DataType::String,
        Value::Bytes(b) if b.is_empty() => DataType::String,
        Value::Bytes(b) => DataType::FixedString(b.len()),
        Value::Date(_) => DataType::Date32,
        Value::DateTime(dt) => DataType::DateTime64 {
            scale: 9,
            time_zone: Some(dt.timezone()),
        },
        Value::LocalDateTime(_) => DataType::DateTime64 {
            scale: 9,
            time_zone: None,
        },
        Value::Uuid(_) => DataType::Uuid,
        Value::Ipv4(_) => DataType::Ipv4,
        Value::Ipv6(_) => DataType::Ipv6,
        Value::Enum8(_) | Value::Enum16(_) => {
            return Err(CodecError::CannotInferType(
                "enum ordinal without an enum table".into(),
            ));
        }
        Value::Interval(i) => DataType::Interval(i.unit),
        Value::Tuple(items) => DataType::Tuple {
            elements: items.iter().map(infer_type).collect::<Result<_, _>>()?,
            names: None,
        },
        Value::Map(entries) => return infer_map(entries),
        Value::Array(items) => return infer_array(items),
    };
    Ok(TypeDescriptor::new(data_type))
}

fn infer_map(entries: &[(Value, Value)]) -> Result<TypeDescriptor, CodecError> {
    let Some((first_key, _)) = entries.first() else {
        return Err(CodecError::CannotInferType("empty map".into()));
    };
    if first_key.is_null() {
        return Err(CodecError::CannotInferType("NULL map key".into()));
    }
    let key = infer_type(first_key)?;
    let Some(sample) = entries.iter().map(|(_, v)| v).find(|v| !v.is_null()) else {
        return Err(CodecError::CannotInferType("map with only NULL values".into()));
    };
    let has_null = entries.iter().any(|(_, v)| v.is_null());
    let value = nullable_leaf(infer_type(sample)?, has_null)?;
    Ok(TypeDescriptor::map(key, value))
}

/// Shape of a nested array found by walking all of its levels.
#[derive(Debug, Default)]
struct ArrayShape {
    /// Nesting level of the first scalar leaf; the outermost items sit at 1.
    leaf_depth: Option<usize>,
    leaf: Option<TypeDescriptor>,
    /// Levels at which NULL items occur.
    null_depths: Vec<usize>,
    /// Deepest level holding an array item.
    max_array_depth: usize,
}

impl ArrayShape {
    fn walk(&mut self, items: &[Value], depth: usize) -> Result<(), CodecError> {
        for item in items {
            match item {
                Value::Array(inner) => {
                    self.max_array_depth = self.max_array_depth.max(depth);
                    self.walk(inner, depth + 1)?;
                }
                Value::Null => {
                    if !self.null_depths.contains(&depth) {
                        self.null_depths.push(depth);
                    }
                }
                leaf => self.add_leaf(infer_type(leaf)?, depth)?,
            }
        }
        Ok(())
    }

    fn add_leaf(&mut self, ty: TypeDescriptor, depth: usize) -> Result<(), CodecError> {
        match self.leaf_depth {
            Some(d) if d != depth => {
                return Err(CodecError::CannotInferType(format!(
                    "array leaves at depths {d} and {depth}"
                )));
            }
            _ => self.leaf_depth = Some(depth),
        }
        match &self.leaf {
            Some(existing) if *existing != ty => Err(CodecError::CannotInferType(format!(
                "array mixes {existing} and {ty}"
            ))),
            Some(_) => Ok(()),
            None => {
                self.leaf = Some(ty);
                Ok(())
            }
        }
    }
}

fn infer_array(items: &[Value]) -> Result<TypeDescriptor, CodecError> {
    let mut shape = ArrayShape::default();
    shape.walk(items, 1)?;
    trace!(?shape, "array shape");

    let (Some(depth), Some(leaf)) = (shape.leaf_depth, shape.leaf) else {
        return Err(CodecError::CannotInferType(
            "array with no non-NULL leaf".into(),
        ));
    };
    if shape.max_array_depth >= depth {
        return Err(CodecError::CannotInferType(format!(
            "array nested deeper than its leaves at depth {depth}"
        )));
    }
    if let Some(d) = shape.null_depths.iter().find(|d| **d != depth) {
        return Err(CodecError::CannotInferType(format!(
            "NULL array item at depth {d}, leaves at depth {depth}"
        )));
    }
    let mut ty = nullable_leaf(leaf, !shape.null_depths.is_empty())?;
    for _ in 0..depth {
        ty = TypeDescriptor::array(ty);
    }
    Ok(ty)
}

fn nullable_leaf(ty: TypeDescriptor, nullable: bool) -> Result<TypeDescriptor, CodecError> {
    if !nullable || ty.nullable {
        return Ok(ty);
    }
    match ty.data_type {
        DataType::Tuple { .. } | DataType::Map { .. } | DataType::Array(_) => Err(
            CodecError::CannotInferType(format!("{ty} cannot be Nullable")),
        ),
        _ => Ok(ty.with_nullable(true)),
    }
}
