use chrono::TimeZone;
use rowbinary_codec::infer_type;
use rowbinary_core::{DataType, Decimal, ErrorKind, Interval, IntervalUnit, TypeDescriptor, Tz, Value};

fn inferred(value: Value) -> String {
    infer_type(&value).expect("type should be inferred").to_string()
}

fn failure(value: Value) -> ErrorKind {
    infer_type(&value).expect_err("inference should fail").kind()
}

// ── scalars ──────────────────────────────────────────────────────────────────

#[test]
fn scalars_map_to_their_own_kind() {
    assert_eq!(inferred(Value::Null), "Nothing");
    assert_eq!(inferred(Value::Bool(true)), "Bool");
    assert_eq!(inferred(Value::U16(1)), "UInt16");
    assert_eq!(inferred(Value::F64(1.0)), "Float64");
    assert_eq!(inferred(Value::string("x")), "String");
    assert_eq!(inferred(Value::bytes([1u8, 2, 3, 4])), "FixedString(4)");
    assert_eq!(inferred(Value::bytes(b"")), "String");
    assert_eq!(
        inferred(Value::Interval(Interval {
            unit: IntervalUnit::Hour,
            count: 2
        })),
        "IntervalHour"
    );
}

#[test]
fn decimal_picks_smallest_width_holding_its_digits() {
    let small: Decimal = "1.23".parse().unwrap();
    assert_eq!(inferred(Value::Decimal(small)), "Decimal(9, 2)");

    let wide: Decimal = "12345678901234567890.5".parse().unwrap();
    assert_eq!(inferred(Value::Decimal(wide)), "Decimal(38, 1)");
}

#[test]
fn zoned_datetime_keeps_its_zone_at_nanosecond_scale() {
    let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
    let dt = tokyo.timestamp_opt(0, 0).unwrap();
    assert_eq!(inferred(Value::DateTime(dt)), "DateTime64(9, 'Asia/Tokyo')");
    assert_eq!(inferred(Value::LocalDateTime(dt.naive_utc())), "DateTime64(9)");
}

#[test]
fn enum_ordinal_alone_cannot_be_inferred() {
    assert_eq!(failure(Value::Enum8(1)), ErrorKind::CannotInferType);
}

// ── arrays ───────────────────────────────────────────────────────────────────

#[test]
fn array_with_null_leaf_becomes_nullable() {
    let value = Value::Array(vec![Value::Null, Value::I32(5)]);
    assert_eq!(
        infer_type(&value).unwrap(),
        TypeDescriptor::array(TypeDescriptor::nullable(DataType::I32))
    );
}

#[test]
fn nested_arrays_use_leaf_depth() {
    let value = Value::Array(vec![
        Value::Array(vec![Value::I64(1)]),
        Value::Array(vec![]),
        Value::Array(vec![Value::I64(2), Value::I64(3)]),
    ]);
    assert_eq!(inferred(value), "Array(Array(Int64))");

    let value = Value::Array(vec![
        Value::Array(vec![Value::Null]),
        Value::Array(vec![Value::string("a")]),
    ]);
    assert_eq!(inferred(value), "Array(Array(Nullable(String)))");
}

#[test]
fn empty_or_all_null_array_cannot_be_inferred() {
    assert_eq!(failure(Value::Array(vec![])), ErrorKind::CannotInferType);
    assert_eq!(failure(Value::Array(vec![Value::Null])), ErrorKind::CannotInferType);
    assert_eq!(
        failure(Value::Array(vec![Value::Array(vec![])])),
        ErrorKind::CannotInferType
    );
}

#[test]
fn mixed_leaf_types_are_rejected() {
    let value = Value::Array(vec![Value::I32(1), Value::string("a")]);
    assert_eq!(failure(value), ErrorKind::CannotInferType);
}

#[test]
fn inconsistent_depth_is_rejected() {
    let value = Value::Array(vec![Value::Array(vec![Value::I32(1)]), Value::I32(2)]);
    assert_eq!(failure(value), ErrorKind::CannotInferType);

    let value = Value::Array(vec![Value::Null, Value::Array(vec![Value::I32(1)])]);
    assert_eq!(failure(value), ErrorKind::CannotInferType);
}

#[test]
fn nullable_tuple_leaf_is_rejected() {
    let tuple = Value::Tuple(vec![Value::I32(1)]);
    assert_eq!(
        failure(Value::Array(vec![tuple.clone(), Value::Null])),
        ErrorKind::CannotInferType
    );
    assert_eq!(inferred(Value::Array(vec![tuple])), "Array(Tuple(Int32))");
}

// ── maps ─────────────────────────────────────────────────────────────────────

#[test]
fn map_value_type_comes_from_first_non_null_value() {
    let value = Value::Map(vec![
        (Value::string("a"), Value::Null),
        (Value::string("b"), Value::F64(1.0)),
    ]);
    assert_eq!(inferred(value), "Map(String, Nullable(Float64))");

    let value = Value::Map(vec![(Value::U8(1), Value::string("x"))]);
    assert_eq!(inferred(value), "Map(UInt8, String)");
}

#[test]
fn empty_or_null_only_map_cannot_be_inferred() {
    assert_eq!(failure(Value::Map(vec![])), ErrorKind::CannotInferType);
    let value = Value::Map(vec![(Value::string("a"), Value::Null)]);
    assert_eq!(failure(value), ErrorKind::CannotInferType);
}
