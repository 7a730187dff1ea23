use rowbinary_core::{DataType, DecimalWidth, ErrorKind, IntervalUnit, TypeDescriptor, Tz};
use rowbinary_typename::{TypeNameError, parse_type_name};

// ── helpers ──────────────────────────────────────────────────────────────────

fn parse(name: &str) -> TypeDescriptor {
    parse_type_name(name).unwrap_or_else(|e| panic!("{name}: {e}"))
}

/// Parsed kind of a name without modifiers.
fn kind(name: &str) -> DataType {
    let ty = parse(name);
    assert!(!ty.nullable && !ty.low_cardinality, "{name}");
    ty.data_type
}

fn error_kind(name: &str) -> ErrorKind {
    parse_type_name(name)
        .expect_err("type name should be rejected")
        .kind()
}

/// Parsing then rendering gives back the canonical text.
fn assert_canonical(name: &str) {
    assert_eq!(parse(name).to_string(), name);
}

// ── scalars ──────────────────────────────────────────────────────────────────

#[test]
fn scalar_names() {
    assert_eq!(kind("UInt8"), DataType::U8);
    assert_eq!(kind("Int256"), DataType::I256);
    assert_eq!(kind("Float64"), DataType::F64);
    assert_eq!(kind("Boolean"), DataType::Bool);
    assert_eq!(kind("UUID"), DataType::Uuid);
    assert_eq!(kind("IPv6"), DataType::Ipv6);
    assert_eq!(kind("  String  "), DataType::String);
}

#[test]
fn canonical_names_round_trip() {
    for name in [
        "Nothing",
        "Bool",
        "BFloat16",
        "Date32",
        "DateTime",
        "DateTime('Europe/Berlin')",
        "DateTime64(3)",
        "DateTime64(9, 'UTC')",
        "Decimal(18, 4)",
        "FixedString(16)",
        r"Enum8('a' = 1, 'it\'s' = -2)",
        "Enum16('big' = 1000)",
        "IntervalQuarter",
        "Point",
        "MultiPolygon",
        "LowCardinality(Nullable(String))",
        "Array(Nullable(Int32))",
        "Tuple(UInt8, String)",
        "Tuple(id UInt64, tags Array(String))",
        "Map(String, Array(Nullable(Float64)))",
        "Variant(String, UInt64)",
        "Dynamic",
        "Dynamic(max_types=8)",
        "SimpleAggregateFunction(sum, UInt64)",
        "AggregateFunction(groupBitmap, UInt32)",
    ] {
        assert_canonical(name);
    }
}

#[test]
fn parameterized_kinds() {
    let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
    assert_eq!(
        kind("DateTime64(6, 'Asia/Tokyo')"),
        DataType::datetime64(6, Some(tokyo)).unwrap()
    );
    assert_eq!(kind("Decimal(10)"), DataType::decimal(10, 0).unwrap());
    assert_eq!(
        kind("Decimal64(3)"),
        DataType::decimal(DecimalWidth::W64.max_precision(), 3).unwrap()
    );
    assert_eq!(
        kind("IntervalNanosecond"),
        DataType::Interval(IntervalUnit::Nanosecond)
    );
    assert_eq!(kind("DateTime32"), DataType::DateTime(None));
}

#[test]
fn enum_width_follows_member_values() {
    let DataType::Enum8(table) = parse("Enum('a' = 1, 'b' = 2)").data_type else {
        panic!("expected Enum8");
    };
    assert_eq!(table.value_of("b"), Some(2));
    assert!(matches!(
        parse("Enum('a' = 1, 'b' = 300)").data_type,
        DataType::Enum16(_)
    ));
}

#[test]
fn variant_alternatives_take_canonical_order() {
    let ty = parse("Variant(UInt64, String)");
    assert_eq!(
        ty.data_type,
        DataType::Variant(vec![DataType::String.into(), DataType::U64.into()])
    );
    assert_eq!(ty.to_string(), "Variant(String, UInt64)");
    assert_eq!(ty, parse("Variant(String, UInt64)"));
    assert_eq!(
        parse("Variant(Nullable(Int8), Array(UInt8), Int64)").to_string(),
        "Variant(Array(UInt8), Int64, Nullable(Int8))"
    );
}

#[test]
fn whitespace_is_flexible() {
    assert_eq!(
        parse("Map( String ,Array( Nullable(Float64) ) )"),
        parse("Map(String, Array(Nullable(Float64)))")
    );
    assert_eq!(
        kind("Dynamic(max_types = 4)"),
        DataType::Dynamic { max_types: Some(4) }
    );
}

// ── failures ─────────────────────────────────────────────────────────────────

#[test]
fn syntax_errors_report_offset() {
    let err = parse_type_name("Array(String").unwrap_err();
    assert!(matches!(err, TypeNameError::Syntax { .. }), "{err}");

    let err = parse_type_name("String)").unwrap_err();
    let TypeNameError::Syntax { offset, .. } = err else {
        panic!("expected syntax error");
    };
    assert_eq!(offset, 6);
}

#[test]
fn unknown_and_unsupported_kinds() {
    assert_eq!(error_kind("Int512"), ErrorKind::UnsupportedType);
    assert_eq!(error_kind("JSON"), ErrorKind::UnsupportedType);
    assert_eq!(error_kind("Nested(a UInt8)"), ErrorKind::UnsupportedType);
    assert_eq!(
        error_kind("AggregateFunction(quantile(0.5), Float64)"),
        ErrorKind::UnsupportedType
    );
}

#[test]
fn invalid_parameters() {
    assert_eq!(error_kind("Decimal(80, 2)"), ErrorKind::InvalidValue);
    assert_eq!(error_kind("Decimal(5, 6)"), ErrorKind::InvalidValue);
    assert_eq!(error_kind("DateTime64(12)"), ErrorKind::InvalidValue);
    assert_eq!(error_kind("DateTime('Mars/Base')"), ErrorKind::InvalidValue);
    assert_eq!(error_kind("Enum8('a' = 200)"), ErrorKind::InvalidValue);
    assert_eq!(error_kind("Enum8('a' = 1, 'a' = 2)"), ErrorKind::InvalidValue);
    assert_eq!(error_kind("FixedString"), ErrorKind::InvalidValue);
    assert_eq!(error_kind("UInt8(3)"), ErrorKind::InvalidValue);
    assert_eq!(error_kind("Map(String)"), ErrorKind::InvalidValue);
    assert_eq!(error_kind("Tuple(a UInt8, String)"), ErrorKind::InvalidValue);
}

#[test]
fn nullable_wraps_only_plain_kinds() {
    assert_eq!(error_kind("Nullable(Array(UInt8))"), ErrorKind::InvalidValue);
    assert_eq!(
        error_kind("Nullable(LowCardinality(String))"),
        ErrorKind::InvalidValue
    );
    assert_eq!(error_kind("Nullable(Nullable(UInt8))"), ErrorKind::InvalidValue);
}

#[test]
fn deep_nesting_is_rejected() {
    let name = format!("{}String{}", "Array(".repeat(100), ")".repeat(100));
    assert!(matches!(
        parse_type_name(&name),
        Err(TypeNameError::Syntax { .. })
    ));
}
