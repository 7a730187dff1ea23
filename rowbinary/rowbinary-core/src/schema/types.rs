use std::ops::Deref;

use chrono_tz::Tz;

use crate::{decimal::MAX_DECIMAL_PRECISION, error::CodecError};

/// Immutable description of one column's wire type.
///
/// `nullable` adds a presence byte ahead of every payload; `low_cardinality`
/// only marks dictionary encoding, which is resolved to direct values before
/// reaching the value codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub data_type: DataType,
    pub nullable: bool,
    pub low_cardinality: bool,
}

impl TypeDescriptor {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            nullable: false,
            low_cardinality: false,
        }
    }

    pub fn nullable(data_type: DataType) -> Self {
        Self::new(data_type).with_nullable(true)
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_low_cardinality(mut self, low_cardinality: bool) -> Self {
        self.low_cardinality = low_cardinality;
        self
    }

    pub fn array(element: TypeDescriptor) -> Self {
        Self::new(DataType::Array(Box::new(element)))
    }

    pub fn tuple(elements: Vec<TypeDescriptor>) -> Self {
        Self::new(DataType::Tuple {
            elements,
            names: None,
        })
    }

    pub fn named_tuple(fields: Vec<(String, TypeDescriptor)>) -> Self {
        let (names, elements) = fields.into_iter().unzip();
        Self::new(DataType::Tuple {
            elements,
            names: Some(names),
        })
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::new(DataType::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    pub fn variant(alternatives: Vec<TypeDescriptor>) -> Self {
        Self::new(DataType::variant(alternatives))
    }
}

impl From<DataType> for TypeDescriptor {
    fn from(data_type: DataType) -> Self {
        TypeDescriptor::new(data_type)
    }
}

/// Closed set of column kinds. Each variant carries exactly the parameters
/// its kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Nothing,
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    I256,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    F32,
    F64,
    BFloat16,
    Decimal {
        precision: u8,
        scale: u8,
    },
    String,
    FixedString(usize),
    Date,
    Date32,
    DateTime(Option<Tz>),
    DateTime64 {
        scale: u8,
        time_zone: Option<Tz>,
    },
    Uuid,
    Ipv4,
    Ipv6,
    Enum8(EnumTable),
    Enum16(EnumTable),
    Interval(IntervalUnit),
    Point,
    Ring,
    LineString,
    Polygon,
    MultiLineString,
    MultiPolygon,
    Array(Box<TypeDescriptor>),
    Tuple {
        elements: Vec<TypeDescriptor>,
        names: Option<Vec<String>>,
    },
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Variant(Vec<TypeDescriptor>),
    Dynamic {
        max_types: Option<u8>,
    },
    SimpleAggregateFunction {
        function: String,
        argument: Box<TypeDescriptor>,
    },
    AggregateFunction {
        function: String,
        arguments: Vec<TypeDescriptor>,
    },
}

impl DataType {
    /// Validated decimal constructor.
    pub fn decimal(precision: u8, scale: u8) -> Result<Self, CodecError> {
        if precision == 0 || precision > MAX_DECIMAL_PRECISION {
            return Err(CodecError::invalid(
                "Decimal",
                format!("precision {precision} outside 1..={MAX_DECIMAL_PRECISION}"),
            ));
        }
        if scale > precision {
            return Err(CodecError::invalid(
                "Decimal",
                format!("scale {scale} exceeds precision {precision}"),
            ));
        }
        Ok(DataType::Decimal { precision, scale })
    }

    /// Validated sub-second datetime constructor.
    pub fn datetime64(scale: u8, time_zone: Option<Tz>) -> Result<Self, CodecError> {
        if scale > 9 {
            return Err(CodecError::invalid(
                "DateTime64",
                format!("scale {scale} outside 0..=9"),
            ));
        }
        Ok(DataType::DateTime64 { scale, time_zone })
    }

    /// `Variant` with its alternatives in canonical order, sorted by type
    /// name. Discriminators on the wire index into this order.
    pub fn variant(mut alternatives: Vec<TypeDescriptor>) -> Self {
        alternatives.sort_by_cached_key(ToString::to_string);
        DataType::Variant(alternatives)
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            DataType::Array(_)
                | DataType::Tuple { .. }
                | DataType::Map { .. }
                | DataType::Variant(_)
                | DataType::Dynamic { .. }
                | DataType::AggregateFunction { .. }
        ) || self.geometry_layout().is_some()
    }

    /// Tuple/Array structure that geometry kinds share on the wire.
    pub fn geometry_layout(&self) -> Option<TypeDescriptor> {
        fn point() -> TypeDescriptor {
            TypeDescriptor::tuple(vec![DataType::F64.into(), DataType::F64.into()])
        }
        fn ring() -> TypeDescriptor {
            TypeDescriptor::array(point())
        }
        fn polygon() -> TypeDescriptor {
            TypeDescriptor::array(ring())
        }
        match self {
            DataType::Point => Some(point()),
            DataType::Ring | DataType::LineString => Some(ring()),
            DataType::Polygon | DataType::MultiLineString => Some(polygon()),
            DataType::MultiPolygon => Some(TypeDescriptor::array(polygon())),
            _ => None,
        }
    }

    /// Name of the kind without parameters, e.g. `Decimal` or `Array`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DataType::Nothing => "Nothing",
            DataType::Bool => "Bool",
            DataType::I8 => "Int8",
            DataType::I16 => "Int16",
            DataType::I32 => "Int32",
            DataType::I64 => "Int64",
            DataType::I128 => "Int128",
            DataType::I256 => "Int256",
            DataType::U8 => "UInt8",
            DataType::U16 => "UInt16",
            DataType::U32 => "UInt32",
            DataType::U64 => "UInt64",
            DataType::U128 => "UInt128",
            DataType::U256 => "UInt256",
            DataType::F32 => "Float32",
            DataType::F64 => "Float64",
            DataType::BFloat16 => "BFloat16",
            DataType::Decimal { .. } => "Decimal",
            DataType::String => "String",
            DataType::FixedString(_) => "FixedString",
            DataType::Date => "Date",
            DataType::Date32 => "Date32",
            DataType::DateTime(_) => "DateTime",
            DataType::DateTime64 { .. } => "DateTime64",
            DataType::Uuid => "UUID",
            DataType::Ipv4 => "IPv4",
            DataType::Ipv6 => "IPv6",
            DataType::Enum8(_) => "Enum8",
            DataType::Enum16(_) => "Enum16",
            DataType::Interval(_) => "Interval",
            DataType::Point => "Point",
            DataType::Ring => "Ring",
            DataType::LineString => "LineString",
            DataType::Polygon => "Polygon",
            DataType::MultiLineString => "MultiLineString",
            DataType::MultiPolygon => "MultiPolygon",
            DataType::Array(_) => "Array",
            DataType::Tuple { .. } => "Tuple",
            DataType::Map { .. } => "Map",
            DataType::Variant(_) => "Variant",
            DataType::Dynamic { .. } => "Dynamic",
            DataType::SimpleAggregateFunction { .. } => "SimpleAggregateFunction",
            DataType::AggregateFunction { .. } => "AggregateFunction",
        }
    }
}

/// Storage width of a decimal, chosen by its precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalWidth {
    W32,
    W64,
    W128,
    W256,
}

impl DecimalWidth {
    pub fn for_precision(precision: u8) -> Self {
        match precision {
            0..=9 => DecimalWidth::W32,
            10..=18 => DecimalWidth::W64,
            19..=38 => DecimalWidth::W128,
            _ => DecimalWidth::W256,
        }
    }

    pub fn max_precision(self) -> u8 {
        match self {
            DecimalWidth::W32 => 9,
            DecimalWidth::W64 => 18,
            DecimalWidth::W128 => 38,
            DecimalWidth::W256 => 76,
        }
    }

    pub fn byte_len(self) -> usize {
        match self {
            DecimalWidth::W32 => 4,
            DecimalWidth::W64 => 8,
            DecimalWidth::W128 => 16,
            DecimalWidth::W256 => 32,
        }
    }
}

/// Ordered `(name, value)` members of an enumeration type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumTable(Vec<(String, i16)>);

impl EnumTable {
    pub fn new(members: Vec<(String, i16)>) -> Self {
        Self(members)
    }

    pub fn name_of(&self, value: i16) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| name.as_str())
    }

    pub fn value_of(&self, name: &str) -> Option<i16> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn contains_value(&self, value: i16) -> bool {
        self.0.iter().any(|(_, v)| *v == value)
    }
}

impl Deref for EnumTable {
    type Target = [(String, i16)];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<(S, i16)> for EnumTable {
    fn from_iter<I: IntoIterator<Item = (S, i16)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }
}

/// Unit of an `Interval*` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl IntervalUnit {
    pub const ALL: [IntervalUnit; 11] = [
        IntervalUnit::Nanosecond,
        IntervalUnit::Microsecond,
        IntervalUnit::Millisecond,
        IntervalUnit::Second,
        IntervalUnit::Minute,
        IntervalUnit::Hour,
        IntervalUnit::Day,
        IntervalUnit::Week,
        IntervalUnit::Month,
        IntervalUnit::Quarter,
        IntervalUnit::Year,
    ];

    /// Unit byte used by the binary type encoding.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            IntervalUnit::Nanosecond => "Nanosecond",
            IntervalUnit::Microsecond => "Microsecond",
            IntervalUnit::Millisecond => "Millisecond",
            IntervalUnit::Second => "Second",
            IntervalUnit::Minute => "Minute",
            IntervalUnit::Hour => "Hour",
            IntervalUnit::Day => "Day",
            IntervalUnit::Week => "Week",
            IntervalUnit::Month => "Month",
            IntervalUnit::Quarter => "Quarter",
            IntervalUnit::Year => "Year",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.name() == name)
    }
}
