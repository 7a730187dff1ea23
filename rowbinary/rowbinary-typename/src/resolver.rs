//! Turns parsed type expressions into validated type descriptors.

use rowbinary_core::{
    CodecError, DataType, DecimalWidth, EnumTable, IntervalUnit, TypeDescriptor, Tz,
};

use crate::parser::{Arg, TypeExpr};

pub fn resolve(expr: &TypeExpr<'_>) -> Result<TypeDescriptor, CodecError> {
    let args = expr.args.as_deref();
    match expr.name {
        "Nullable" => {
            let inner = resolve(single_type(expr)?)?;
            if inner.nullable || inner.low_cardinality || !can_be_nullable(&inner.data_type) {
                return Err(CodecError::invalid(
                    "Nullable",
                    format!("{inner} cannot be wrapped"),
                ));
            }
            Ok(inner.with_nullable(true))
        }
        "LowCardinality" => {
            let inner = resolve(single_type(expr)?)?;
            if inner.low_cardinality {
                return Err(CodecError::invalid(
                    "LowCardinality",
                    format!("{inner} cannot be wrapped"),
                ));
            }
            Ok(inner.with_low_cardinality(true))
        }
        _ => resolve_kind(expr, args).map(TypeDescriptor::new),
    }
}

fn resolve_kind(expr: &TypeExpr<'_>, args: Option<&[Arg<'_>]>) -> Result<DataType, CodecError> {
    let name = expr.name;
    if let Some(kind) = simple_kind(name) {
        no_args(expr)?;
        return Ok(kind);
    }
    if let Some(unit) = name.strip_prefix("Interval").and_then(IntervalUnit::from_name) {
        no_args(expr)?;
        return Ok(DataType::Interval(unit));
    }
    let args = args.unwrap_or_default();
    match name {
        "DateTime" | "DateTime32" => match args {
            [] => Ok(DataType::DateTime(None)),
            [Arg::Text(tz)] => Ok(DataType::DateTime(Some(time_zone(tz)?))),
            _ => Err(bad_args(expr)),
        },
        "DateTime64" => match args {
            [Arg::Number(scale)] => DataType::datetime64(integer(scale, name)?, None),
            [Arg::Number(scale), Arg::Text(tz)] => {
                DataType::datetime64(integer(scale, name)?, Some(time_zone(tz)?))
            }
            _ => Err(bad_args(expr)),
        },
        "Decimal" => match args {
            [Arg::Number(p)] => DataType::decimal(integer(p, name)?, 0),
            [Arg::Number(p), Arg::Number(s)] => {
                DataType::decimal(integer(p, name)?, integer(s, name)?)
            }
            _ => Err(bad_args(expr)),
        },
        "Decimal32" | "Decimal64" | "Decimal128" | "Decimal256" => {
            let width = match name {
                "Decimal32" => DecimalWidth::W32,
                "Decimal64" => DecimalWidth::W64,
                "Decimal128" => DecimalWidth::W128,
                _ => DecimalWidth::W256,
            };
            match args {
                [Arg::Number(s)] => DataType::decimal(width.max_precision(), integer(s, name)?),
                _ => Err(bad_args(expr)),
            }
        }
        "FixedString" => match args {
            [Arg::Number(n)] => Ok(DataType::FixedString(integer(n, name)?)),
            _ => Err(bad_args(expr)),
        },
        "Enum8" | "Enum16" | "Enum" => {
            let table = enum_members(expr, args)?;
            let fits_i8 = table.iter().all(|(_, v)| i8::try_from(*v).is_ok());
            match name {
                "Enum8" if !fits_i8 => Err(CodecError::invalid(
                    "Enum8",
                    "member value outside -128..=127",
                )),
                "Enum8" => Ok(DataType::Enum8(table)),
                "Enum" if fits_i8 => Ok(DataType::Enum8(table)),
                _ => Ok(DataType::Enum16(table)),
            }
        }
        "Array" => Ok(DataType::Array(Box::new(resolve(single_type(expr)?)?))),
        "Tuple" => resolve_tuple(expr, args),
        "Map" => match args {
            [Arg::Type(key), Arg::Type(value)] => Ok(DataType::Map {
                key: Box::new(resolve(key)?),
                value: Box::new(resolve(value)?),
            }),
            _ => Err(bad_args(expr)),
        },
        "Variant" => args
            .iter()
            .map(|arg| match arg {
                Arg::Type(ty) => resolve(ty),
                _ => Err(bad_args(expr)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(DataType::variant),
        "Dynamic" => match args {
            [] => Ok(DataType::Dynamic { max_types: None }),
            [Arg::Setting("max_types", n)] => Ok(DataType::Dynamic {
                max_types: Some(integer(n, name)?),
            }),
            _ => Err(bad_args(expr)),
        },
        "SimpleAggregateFunction" => match args {
            [Arg::Type(function), Arg::Type(argument)] => {
                Ok(DataType::SimpleAggregateFunction {
                    function: function_name(function)?.to_string(),
                    argument: Box::new(resolve(argument)?),
                })
            }
            _ => Err(bad_args(expr)),
        },
        "AggregateFunction" => match args {
            [Arg::Type(function), rest @ ..] => Ok(DataType::AggregateFunction {
                function: function_name(function)?.to_string(),
                arguments: rest
                    .iter()
                    .map(|arg| match arg {
                        Arg::Type(ty) => resolve(ty),
                        _ => Err(bad_args(expr)),
                    })
                    .collect::<Result<_, _>>()?,
            }),
            _ => Err(bad_args(expr)),
        },
        _ => Err(CodecError::UnsupportedType(name.to_string())),
    }
}

fn simple_kind(name: &str) -> Option<DataType> {
    Some(match name {
        "Nothing" => DataType::Nothing,
        "Bool" | "Boolean" => DataType::Bool,
        "Int8" => DataType::I8,
        "Int16" => DataType::I16,
        "Int32" => DataType::I32,
        "Int64" => DataType::I64,
        "Int128" => DataType::I128,
        "Int256" => DataType::I256,
        "UInt8" => DataType::U8,
        "UInt16" => DataType::U16,
        "UInt32" => DataType::U32,
        "UInt64" => DataType::U64,
        "UInt128" => DataType::U128,
        "UInt256" => DataType::U256,
        "Float32" => DataType::F32,
        "Float64" => DataType::F64,
        "BFloat16" => DataType::BFloat16,
        "String" => DataType::String,
        "Date" => DataType::Date,
        "Date32" => DataType::Date32,
        "UUID" => DataType::Uuid,
        "IPv4" => DataType::Ipv4,
        "IPv6" => DataType::Ipv6,
        "Point" => DataType::Point,
        "Ring" => DataType::Ring,
        "LineString" => DataType::LineString,
        "Polygon" => DataType::Polygon,
        "MultiLineString" => DataType::MultiLineString,
        "MultiPolygon" => DataType::MultiPolygon,
        _ => return None,
    })
}

fn can_be_nullable(data_type: &DataType) -> bool {
    !matches!(
        data_type,
        DataType::Array(_)
            | DataType::Tuple { .. }
            | DataType::Map { .. }
            | DataType::Variant(_)
            | DataType::Dynamic { .. }
            | DataType::AggregateFunction { .. }
            | DataType::SimpleAggregateFunction { .. }
    ) && data_type.geometry_layout().is_none()
}

fn resolve_tuple(expr: &TypeExpr<'_>, args: &[Arg<'_>]) -> Result<DataType, CodecError> {
    let named = args.iter().filter(|a| matches!(a, Arg::Field(..))).count();
    if named != 0 && named != args.len() {
        return Err(CodecError::invalid(
            "Tuple",
            "elements must be all named or all unnamed",
        ));
    }
    let mut names = Vec::with_capacity(named);
    let mut elements = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Arg::Type(ty) => elements.push(resolve(ty)?),
            Arg::Field(name, ty) => {
                names.push(name.to_string());
                elements.push(resolve(ty)?);
            }
            _ => return Err(bad_args(expr)),
        }
    }
    Ok(DataType::Tuple {
        elements,
        names: (named != 0).then_some(names),
    })
}

fn enum_members(expr: &TypeExpr<'_>, args: &[Arg<'_>]) -> Result<EnumTable, CodecError> {
    if args.is_empty() {
        return Err(bad_args(expr));
    }
    let mut members: Vec<(String, i16)> = Vec::with_capacity(args.len());
    for arg in args {
        let Arg::EnumMember(member, value) = arg else {
            return Err(bad_args(expr));
        };
        let value: i16 = integer(value, expr.name)?;
        if members.iter().any(|(n, v)| n == member || *v == value) {
            return Err(CodecError::invalid(
                expr.name,
                format!("duplicate member '{member}' = {value}"),
            ));
        }
        members.push((member.clone(), value));
    }
    Ok(EnumTable::new(members))
}

fn single_type<'e, 'a>(expr: &'e TypeExpr<'a>) -> Result<&'e TypeExpr<'a>, CodecError> {
    match expr.args.as_deref() {
        Some([Arg::Type(inner)]) => Ok(inner),
        _ => Err(bad_args(expr)),
    }
}

/// Aggregate function name; parameterized functions are not modelled.
fn function_name<'a>(function: &TypeExpr<'a>) -> Result<&'a str, CodecError> {
    match &function.args {
        None => Ok(function.name),
        Some(_) => Err(CodecError::UnsupportedType(format!(
            "parameterized aggregate function {}",
            function.name
        ))),
    }
}

fn no_args(expr: &TypeExpr<'_>) -> Result<(), CodecError> {
    match expr.args {
        None => Ok(()),
        Some(_) => Err(bad_args(expr)),
    }
}

fn integer<T: std::str::FromStr>(text: &str, kind: &str) -> Result<T, CodecError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.strip_prefix('+')
        .unwrap_or(text)
        .parse()
        .map_err(|e| CodecError::parse(text, format!("{kind} parameter"), e))
}

fn time_zone(name: &str) -> Result<Tz, CodecError> {
    name.parse()
        .map_err(|_| CodecError::invalid("DateTime", format!("unknown time zone '{name}'")))
}

fn bad_args(expr: &TypeExpr<'_>) -> CodecError {
    CodecError::invalid(expr.name, "unexpected arguments")
}
