use std::fmt::{Display, Formatter, Result, Write as _};

use super::{DataType, TypeDescriptor};

/// Renders the server's canonical type name, e.g.
/// `LowCardinality(Nullable(String))` or `DateTime64(3, 'UTC')`.
impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match (self.low_cardinality, self.nullable) {
            (true, true) => write!(f, "LowCardinality(Nullable({}))", self.data_type),
            (true, false) => write!(f, "LowCardinality({})", self.data_type),
            (false, true) => write!(f, "Nullable({})", self.data_type),
            (false, false) => write!(f, "{}", self.data_type),
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            DataType::Decimal { precision, scale } => write!(f, "Decimal({precision}, {scale})"),
            DataType::FixedString(n) => write!(f, "FixedString({n})"),
            DataType::DateTime(None) => f.write_str("DateTime"),
            DataType::DateTime(Some(tz)) => {
                f.write_str("DateTime(")?;
                write_quoted(f, tz.name())?;
                f.write_char(')')
            }
            DataType::DateTime64 { scale, time_zone } => {
                write!(f, "DateTime64({scale}")?;
                if let Some(tz) = time_zone {
                    f.write_str(", ")?;
                    write_quoted(f, tz.name())?;
                }
                f.write_char(')')
            }
            DataType::Enum8(table) | DataType::Enum16(table) => {
                write!(f, "{}(", self.kind_name())?;
                for (i, (name, value)) in table.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, name)?;
                    write!(f, " = {value}")?;
                }
                f.write_char(')')
            }
            DataType::Interval(unit) => write!(f, "Interval{}", unit.name()),
            DataType::Array(element) => write!(f, "Array({element})"),
            DataType::Tuple { elements, names } => {
                f.write_str("Tuple(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(name) = names.as_ref().and_then(|n| n.get(i)) {
                        write!(f, "{name} ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_char(')')
            }
            DataType::Map { key, value } => write!(f, "Map({key}, {value})"),
            DataType::Variant(alternatives) => {
                f.write_str("Variant(")?;
                write_list(f, alternatives)?;
                f.write_char(')')
            }
            DataType::Dynamic { max_types: None } => f.write_str("Dynamic"),
            DataType::Dynamic {
                max_types: Some(n),
            } => write!(f, "Dynamic(max_types={n})"),
            DataType::SimpleAggregateFunction { function, argument } => {
                write!(f, "SimpleAggregateFunction({function}, {argument})")
            }
            DataType::AggregateFunction {
                function,
                arguments,
            } => {
                write!(f, "AggregateFunction({function}")?;
                for argument in arguments {
                    write!(f, ", {argument}")?;
                }
                f.write_char(')')
            }
            _ => f.write_str(self.kind_name()),
        }
    }
}

fn write_list(f: &mut Formatter<'_>, items: &[TypeDescriptor]) -> Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> Result {
    f.write_char('\'')?;
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('\'')
}
