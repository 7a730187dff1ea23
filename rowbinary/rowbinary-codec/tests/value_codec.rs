use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{NaiveDate, TimeZone};
use rowbinary_codec::{
    CodecOptions, ValueDecoder, ValueEncoder, decode, encode,
    varint::{read_varint, write_varint},
};
use rowbinary_core::{
    CodecError, DataType, Decimal, EnumTable, ErrorKind, Interval, IntervalUnit, TypeDescriptor,
    Tz, U256, Value, i256, pow10,
};
use uuid::Uuid;

// ── helpers ──────────────────────────────────────────────────────────────────

fn encoded(value: Value, ty: &TypeDescriptor) -> Vec<u8> {
    let mut buf = Vec::new();
    encode(&mut buf, &value, ty).expect("encode should succeed");
    buf
}

fn decoded(bytes: &[u8], ty: &TypeDescriptor) -> Value {
    let mut cursor = bytes;
    let value = decode(&mut cursor, ty).expect("decode should succeed");
    assert!(cursor.is_empty(), "decoder left {} bytes", cursor.len());
    value
}

fn encode_err(value: Value, ty: &TypeDescriptor) -> CodecError {
    let mut buf = Vec::new();
    encode(&mut buf, &value, ty).expect_err("encode should fail")
}

fn decode_err(bytes: &[u8], ty: &TypeDescriptor) -> CodecError {
    let mut cursor = bytes;
    decode(&mut cursor, ty).expect_err("decode should fail")
}

fn ty(data_type: DataType) -> TypeDescriptor {
    TypeDescriptor::new(data_type)
}

fn states() -> EnumTable {
    [("stopped", 1), ("running", 2)].into_iter().collect()
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn utc(seconds: i64, nanos: u32) -> Value {
    Value::DateTime(Tz::UTC.timestamp_opt(seconds, nanos).unwrap())
}

fn decimal(unscaled: i256, scale: u8) -> Value {
    Value::Decimal(Decimal::new(unscaled, scale))
}

/// Encoding then decoding gives back `value`.
fn assert_round_trip(value: &Value, ty: &TypeDescriptor) {
    let bytes = encoded(value.clone(), ty);
    assert_eq!(&decoded(&bytes, ty), value, "{ty}: {value:?}");
}

// ── varint ───────────────────────────────────────────────────────────────────

#[test]
fn varint_boundaries() {
    for (value, expected) in [(0u64, vec![0x00]), (127, vec![0x7F]), (128, vec![0x80, 0x01])] {
        let mut buf = Vec::new();
        write_varint(&mut buf, value).unwrap();
        assert_eq!(buf, expected);
        assert_eq!(read_varint(&mut buf.as_slice()).unwrap(), value);
    }
}

#[test]
fn varint_rejects_tenth_byte_and_63_bit_overflow() {
    let err = read_varint(&mut [0x80u8; 10].as_slice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);

    let err = write_varint(&mut Vec::new(), 1 << 63).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);

    let err = read_varint(&mut [0x80u8, 0x80].as_slice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Truncated);
}

// ── scalars ──────────────────────────────────────────────────────────────────

#[test]
fn integers_are_little_endian() {
    assert_eq!(encoded(Value::I32(-2), &ty(DataType::I32)), [0xFE, 0xFF, 0xFF, 0xFF]);
    assert_eq!(encoded(Value::U16(0x1234), &ty(DataType::U16)), [0x34, 0x12]);
    assert_eq!(decoded(&[0x01, 0x02], &ty(DataType::U16)), Value::U16(0x0201));
}

#[test]
fn encoder_coerces_before_writing() {
    assert_eq!(encoded(Value::string("42"), &ty(DataType::U8)), [42]);
    assert_eq!(encoded(Value::I64(7), &ty(DataType::F64)), 7.0f64.to_le_bytes());
    assert_eq!(
        encode_err(Value::I32(300), &ty(DataType::I8)).kind(),
        ErrorKind::Overflow
    );
}

#[test]
fn wide_integers_round_trip() {
    let value = Value::I256(rowbinary_core::parse_i256("-12345678901234567890123456789").unwrap());
    let bytes = encoded(value.clone(), &ty(DataType::I256));
    assert_eq!(bytes.len(), 32);
    assert_eq!(decoded(&bytes, &ty(DataType::I256)), value);

    let bytes = encoded(Value::U128(u128::MAX), &ty(DataType::U128));
    assert_eq!(bytes, [0xFF; 16]);
}

#[test]
fn bool_decodes_any_nonzero_byte_as_true() {
    assert_eq!(decoded(&[0], &ty(DataType::Bool)), Value::Bool(false));
    assert_eq!(decoded(&[2], &ty(DataType::Bool)), Value::Bool(true));
    assert_eq!(encoded(Value::Bool(true), &ty(DataType::Bool)), [1]);
}

#[test]
fn bfloat16_keeps_upper_half_of_float32() {
    let bytes = encoded(Value::F32(1.5), &ty(DataType::BFloat16));
    assert_eq!(bytes, [0xC0, 0x3F]);
    assert_eq!(decoded(&bytes, &ty(DataType::BFloat16)), Value::F32(1.5));
}

#[test]
fn decimal_is_scaled_integer_of_declared_width() {
    let value = Value::Decimal("1.23".parse::<Decimal>().unwrap());
    let bytes = encoded(value, &ty(DataType::decimal(9, 2).unwrap()));
    assert_eq!(bytes, 123i32.to_le_bytes());

    let bytes = encoded(Value::F64(1.5), &ty(DataType::decimal(18, 3).unwrap()));
    assert_eq!(bytes, 1500i64.to_le_bytes());

    let decimal = decoded(&1500i64.to_le_bytes(), &ty(DataType::decimal(18, 3).unwrap()));
    assert_eq!(decimal, Value::Decimal(Decimal::from_i128(1500, 3)));
}

#[test]
fn decimal_beyond_precision_overflows() {
    let err = encode_err(Value::I64(1_000), &ty(DataType::decimal(4, 2).unwrap()));
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn strings_are_length_prefixed_utf8() {
    let bytes = encoded(Value::string("héllo"), &ty(DataType::String));
    assert_eq!(bytes[0], 6);
    assert_eq!(&bytes[1..], "héllo".as_bytes());

    let err = decode_err(&[2, 0xC3, 0x28], &ty(DataType::String));
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[test]
fn fixed_string_is_zero_padded() {
    let fixed = ty(DataType::FixedString(4));
    assert_eq!(encoded(Value::string("ab"), &fixed), [b'a', b'b', 0, 0]);
    assert_eq!(decoded(b"abcd", &fixed), Value::bytes(b"abcd"));
    assert_eq!(
        encode_err(Value::string("abcde"), &fixed).kind(),
        ErrorKind::InvalidValue
    );
}

// ── dates and times ──────────────────────────────────────────────────────────

#[test]
fn dates_count_days_from_epoch() {
    let day_one = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
    assert_eq!(encoded(Value::Date(day_one), &ty(DataType::Date)), [1, 0]);

    let before = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();
    assert_eq!(encoded(Value::Date(before), &ty(DataType::Date32)), [0xFF; 4]);
    assert_eq!(decoded(&[0xFF; 4], &ty(DataType::Date32)), Value::Date(before));

    assert_eq!(
        encode_err(Value::Date(before), &ty(DataType::Date)).kind(),
        ErrorKind::Overflow
    );
}

#[test]
fn datetime64_counts_ticks_at_declared_scale() {
    let dt = Tz::UTC.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
    let dt64 = ty(DataType::datetime64(3, None).unwrap());
    let bytes = encoded(Value::DateTime(dt), &dt64);
    assert_eq!(bytes, 1_700_000_000_500i64.to_le_bytes());
    assert_eq!(decoded(&bytes, &dt64), Value::DateTime(dt));

    let finer = Tz::UTC.timestamp_opt(1_700_000_000, 500_700_000).unwrap();
    assert_eq!(encoded(Value::DateTime(finer), &dt64), bytes);
}

#[test]
fn datetime_drops_sub_second_part() {
    let dt = Tz::UTC.timestamp_opt(1_700_000_000, 999_000_000).unwrap();
    let bytes = encoded(Value::DateTime(dt), &ty(DataType::DateTime(None)));
    assert_eq!(bytes, 1_700_000_000u32.to_le_bytes());
}

#[test]
fn datetime_decodes_in_declared_or_default_zone() {
    let berlin: Tz = "Europe/Berlin".parse().unwrap();
    let bytes = 0u32.to_le_bytes();

    let value = decoded(&bytes, &ty(DataType::DateTime(Some(berlin))));
    let dt = value.try_datetime().unwrap().unwrap();
    assert_eq!(dt.timezone(), berlin);
    assert_eq!(dt.timestamp(), 0);

    let decoder = ValueDecoder::new(CodecOptions::default().with_time_zone(berlin));
    let value = decoder
        .decode(&mut bytes.as_slice(), &ty(DataType::DateTime(None)))
        .unwrap();
    assert_eq!(value.try_datetime().unwrap().unwrap().timezone(), berlin);
}

#[test]
fn zoneless_input_is_localized_before_encoding() {
    let berlin: Tz = "Europe/Berlin".parse().unwrap();
    let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let bytes = encoded(
        Value::LocalDateTime(naive),
        &ty(DataType::DateTime(Some(berlin))),
    );
    assert_eq!(bytes, 1_704_063_600u32.to_le_bytes());
}

// ── identifiers ──────────────────────────────────────────────────────────────

#[test]
fn uuid_is_two_little_endian_halves() {
    let uuid = Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff);
    let bytes = encoded(Value::Uuid(uuid), &ty(DataType::Uuid));
    assert_eq!(
        bytes,
        [
            0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11, 0x00, 0xFF, 0xEE, 0xDD, 0xCC, 0xBB, 0xAA,
            0x99, 0x88,
        ]
    );
    assert_eq!(decoded(&bytes, &ty(DataType::Uuid)), Value::Uuid(uuid));
}

#[test]
fn ip_addresses() {
    let v4 = encoded(Value::string("192.168.1.10"), &ty(DataType::Ipv4));
    assert_eq!(v4, [10, 1, 168, 192]);
    assert_eq!(
        decoded(&v4, &ty(DataType::Ipv4)),
        Value::Ipv4(Ipv4Addr::new(192, 168, 1, 10))
    );

    let v6 = encoded(Value::Ipv6(Ipv6Addr::LOCALHOST), &ty(DataType::Ipv6));
    assert_eq!(v6, Ipv6Addr::LOCALHOST.octets());
}

#[test]
fn enums_check_ordinals_against_table() {
    let enum8 = ty(DataType::Enum8(states()));
    assert_eq!(encoded(Value::string("running"), &enum8), [2]);
    assert_eq!(decoded(&[1], &enum8), Value::Enum8(1));
    assert_eq!(decode_err(&[3], &enum8).kind(), ErrorKind::InvalidValue);

    let lenient = ValueDecoder::new(CodecOptions {
        strict_enums: false,
        ..CodecOptions::default()
    });
    assert_eq!(
        lenient.decode(&mut [3u8].as_slice(), &enum8).unwrap(),
        Value::Enum8(3)
    );

    let enum16 = ty(DataType::Enum16(states()));
    assert_eq!(encoded(Value::I32(2), &enum16), [2, 0]);
}

#[test]
fn interval_is_unsigned_count() {
    let interval = ty(DataType::Interval(IntervalUnit::Day));
    let value = Value::Interval(Interval {
        unit: IntervalUnit::Day,
        count: 3,
    });
    assert_eq!(encoded(value.clone(), &interval), 3u64.to_le_bytes());
    assert_eq!(decoded(&3u64.to_le_bytes(), &interval), value);
}

// ── nullability ──────────────────────────────────────────────────────────────

#[test]
fn nullable_flag_precedes_payload() {
    let nullable = TypeDescriptor::nullable(DataType::I32);
    assert_eq!(encoded(Value::Null, &nullable), [1]);
    assert_eq!(encoded(Value::I32(5), &nullable), [0, 5, 0, 0, 0]);
    assert_eq!(decoded(&[1], &nullable), Value::Null);
    assert_eq!(decode_err(&[2], &nullable).kind(), ErrorKind::InvalidValue);
}

#[test]
fn null_for_non_nullable_scalar_is_rejected() {
    assert_eq!(
        encode_err(Value::Null, &ty(DataType::I32)).kind(),
        ErrorKind::InvalidValue
    );
}

#[test]
fn null_array_is_written_empty() {
    let array = TypeDescriptor::array(ty(DataType::String));
    assert_eq!(encoded(Value::Null, &array), [0]);
}

#[test]
fn low_cardinality_does_not_change_value_bytes() {
    let lc = TypeDescriptor::nullable(DataType::String).with_low_cardinality(true);
    assert_eq!(encoded(Value::string("a"), &lc), [0, 1, b'a']);
}

// ── composites ───────────────────────────────────────────────────────────────

#[test]
fn array_of_nullable_int32() {
    let array = TypeDescriptor::array(TypeDescriptor::nullable(DataType::I32));
    let value = Value::Array(vec![Value::Null, Value::I32(5)]);
    let bytes = encoded(value.clone(), &array);
    assert_eq!(bytes, [2, 1, 0, 5, 0, 0, 0]);
    assert_eq!(decoded(&bytes, &array), value);
}

#[test]
fn tuple_elements_are_concatenated() {
    let tuple = TypeDescriptor::tuple(vec![ty(DataType::U8), ty(DataType::String)]);
    let value = Value::Tuple(vec![Value::U8(1), Value::string("x")]);
    assert_eq!(encoded(value.clone(), &tuple), [1, 1, b'x']);
    assert_eq!(decoded(&[1, 1, b'x'], &tuple), value);

    let short = Value::Tuple(vec![Value::U8(1)]);
    assert_eq!(encode_err(short, &tuple).kind(), ErrorKind::InvalidValue);
}

#[test]
fn map_is_counted_key_value_pairs() {
    let map = TypeDescriptor::map(ty(DataType::String), ty(DataType::U8));
    let value = Value::Map(vec![(Value::string("a"), Value::U8(1))]);
    assert_eq!(encoded(value.clone(), &map), [1, 1, b'a', 1]);
    assert_eq!(decoded(&[1, 1, b'a', 1], &map), value);
}

#[test]
fn geometry_uses_tuple_and_array_layout() {
    let point = Value::Tuple(vec![Value::F64(1.0), Value::F64(2.0)]);
    let bytes = encoded(point.clone(), &ty(DataType::Point));
    assert_eq!(bytes.len(), 16);
    assert_eq!(decoded(&bytes, &ty(DataType::Point)), point);

    let ring = Value::Array(vec![point.clone(), point]);
    let bytes = encoded(ring.clone(), &ty(DataType::Ring));
    assert_eq!(bytes[0], 2);
    assert_eq!(decoded(&bytes, &ty(DataType::Ring)), ring);
}

#[test]
fn variant_writes_discriminator_then_alternative() {
    let variant = TypeDescriptor::variant(vec![ty(DataType::String), ty(DataType::U64)]);

    assert_eq!(encoded(Value::string("x"), &variant), [0, 1, b'x']);
    let bytes = encoded(Value::U64(5), &variant);
    assert_eq!(bytes[0], 1);
    assert_eq!(decoded(&bytes, &variant), Value::U64(5));

    assert_eq!(encoded(Value::Null, &variant), [0xFF]);
    assert_eq!(decoded(&[0xFF], &variant), Value::Null);
    assert_eq!(decode_err(&[5], &variant).kind(), ErrorKind::InvalidValue);
}

#[test]
fn variant_discriminator_indexes_sorted_alternatives() {
    let variant = TypeDescriptor::variant(vec![ty(DataType::U64), ty(DataType::String)]);
    assert_eq!(decoded(&[0, 2, b'a', b'b'], &variant), Value::string("ab"));
    assert_eq!(
        decoded(&[1, 3, 0, 0, 0, 0, 0, 0, 0], &variant),
        Value::U64(3)
    );
    assert_eq!(encoded(Value::U64(3), &variant)[0], 1);
}

#[test]
fn dynamic_prefixes_inferred_type_tag() {
    let dynamic = ty(DataType::Dynamic { max_types: None });
    let bytes = encoded(Value::I32(7), &dynamic);
    assert_eq!(bytes, [0x09, 7, 0, 0, 0]);
    assert_eq!(decoded(&bytes, &dynamic), Value::I32(7));

    assert_eq!(encoded(Value::Null, &dynamic), [0x00]);
    assert_eq!(decoded(&[0x00], &dynamic), Value::Null);

    let err = encode_err(Value::Array(vec![]), &dynamic);
    assert_eq!(err.kind(), ErrorKind::CannotInferType);
}

#[test]
fn group_bitmap_states() {
    let bitmap = ty(DataType::AggregateFunction {
        function: "groupBitmap".into(),
        arguments: vec![ty(DataType::U32)],
    });
    let small = Value::Array(vec![Value::U32(1), Value::U32(2)]);
    let bytes = encoded(small.clone(), &bitmap);
    assert_eq!(bytes, [0, 2, 1, 0, 0, 0, 2, 0, 0, 0]);
    assert_eq!(decoded(&bytes, &bitmap), small);

    let blob = Value::bytes([0xABu8, 0xCD]);
    assert_eq!(encoded(blob.clone(), &bitmap), [1, 2, 0xAB, 0xCD]);
    assert_eq!(decoded(&[1, 2, 0xAB, 0xCD], &bitmap), blob);
}

#[test]
fn other_aggregate_states_are_unsupported() {
    let uniq = ty(DataType::AggregateFunction {
        function: "uniq".into(),
        arguments: vec![ty(DataType::U64)],
    });
    assert_eq!(decode_err(&[0], &uniq).kind(), ErrorKind::UnsupportedType);
}

#[test]
fn simple_aggregate_is_its_argument() {
    let sum = ty(DataType::SimpleAggregateFunction {
        function: "sum".into(),
        argument: Box::new(ty(DataType::U64)),
    });
    assert_eq!(encoded(Value::U64(9), &sum), 9u64.to_le_bytes());
}

// ── boundary round trips ─────────────────────────────────────────────────────

/// Scalar kinds with their zero, minus one, minimum and maximum where the
/// kind has them.
fn scalar_boundaries() -> Vec<(DataType, Vec<Value>)> {
    let dec = |precision: u8, scale: u8| DataType::decimal(precision, scale).unwrap();
    let bound = |digits: u32| pow10(digits).unwrap().wrapping_sub(i256::ONE);
    let extremes: EnumTable = [("low", i16::MIN), ("zero", 0), ("high", i16::MAX)]
        .into_iter()
        .collect();
    let small: EnumTable = [("low", -128), ("minus", -1), ("high", 127)].into_iter().collect();

    vec![
        (DataType::Nothing, vec![Value::Null]),
        (DataType::Bool, vec![Value::Bool(false), Value::Bool(true)]),
        (
            DataType::I8,
            vec![Value::I8(0), Value::I8(-1), Value::I8(i8::MIN), Value::I8(i8::MAX)],
        ),
        (
            DataType::I16,
            vec![Value::I16(0), Value::I16(-1), Value::I16(i16::MIN), Value::I16(i16::MAX)],
        ),
        (
            DataType::I32,
            vec![Value::I32(0), Value::I32(-1), Value::I32(i32::MIN), Value::I32(i32::MAX)],
        ),
        (
            DataType::I64,
            vec![Value::I64(0), Value::I64(-1), Value::I64(i64::MIN), Value::I64(i64::MAX)],
        ),
        (
            DataType::I128,
            vec![
                Value::I128(0),
                Value::I128(-1),
                Value::I128(i128::MIN),
                Value::I128(i128::MAX),
            ],
        ),
        (
            DataType::I256,
            vec![
                Value::I256(i256::ZERO),
                Value::I256(i256::MINUS_ONE),
                Value::I256(i256::MIN),
                Value::I256(i256::MAX),
            ],
        ),
        (DataType::U8, vec![Value::U8(0), Value::U8(u8::MAX)]),
        (DataType::U16, vec![Value::U16(0), Value::U16(u16::MAX)]),
        (DataType::U32, vec![Value::U32(0), Value::U32(u32::MAX)]),
        (DataType::U64, vec![Value::U64(0), Value::U64(u64::MAX)]),
        (DataType::U128, vec![Value::U128(0), Value::U128(u128::MAX)]),
        (DataType::U256, vec![Value::U256(U256::ZERO), Value::U256(U256::MAX)]),
        (
            DataType::F32,
            vec![Value::F32(0.0), Value::F32(-1.0), Value::F32(f32::MIN), Value::F32(f32::MAX)],
        ),
        (
            DataType::F64,
            vec![Value::F64(0.0), Value::F64(-1.0), Value::F64(f64::MIN), Value::F64(f64::MAX)],
        ),
        (
            DataType::BFloat16,
            vec![
                Value::F32(0.0),
                Value::F32(-1.0),
                Value::F32(f32::from_bits(0xFF7F_0000)),
                Value::F32(f32::from_bits(0x7F7F_0000)),
            ],
        ),
        (
            dec(9, 2),
            vec![
                decimal(i256::ZERO, 2),
                decimal(i256::from_i128(-100), 2),
                decimal(bound(9).wrapping_neg(), 2),
                decimal(bound(9), 2),
            ],
        ),
        (
            dec(18, 4),
            vec![decimal(bound(18).wrapping_neg(), 4), decimal(bound(18), 4)],
        ),
        (
            dec(38, 10),
            vec![decimal(bound(38).wrapping_neg(), 10), decimal(bound(38), 10)],
        ),
        (
            dec(76, 0),
            vec![
                decimal(i256::ZERO, 0),
                decimal(i256::MINUS_ONE, 0),
                decimal(bound(76).wrapping_neg(), 0),
                decimal(bound(76), 0),
            ],
        ),
        (DataType::String, vec![Value::string(""), Value::string("-1")]),
        (
            DataType::FixedString(3),
            vec![Value::bytes([0, 0, 0]), Value::bytes([0xFF; 3])],
        ),
        (DataType::Date, vec![date(1970, 1, 1), date(2149, 6, 6)]),
        (
            DataType::Date32,
            vec![date(1970, 1, 1), date(1969, 12, 31), date(1900, 1, 1), date(2299, 12, 31)],
        ),
        (
            DataType::DateTime(None),
            vec![utc(0, 0), utc(u32::MAX as i64, 0)],
        ),
        (
            DataType::datetime64(3, None).unwrap(),
            vec![utc(0, 0), utc(-1, 999_000_000), utc(-2_208_988_800, 0)],
        ),
        (
            DataType::datetime64(9, None).unwrap(),
            vec![utc(-1, 999_999_999), utc(i64::MAX / 1_000_000_000, 0)],
        ),
        (
            DataType::Uuid,
            vec![Value::Uuid(Uuid::nil()), Value::Uuid(Uuid::from_u128(u128::MAX))],
        ),
        (
            DataType::Ipv4,
            vec![
                Value::Ipv4(Ipv4Addr::UNSPECIFIED),
                Value::Ipv4(Ipv4Addr::BROADCAST),
            ],
        ),
        (
            DataType::Ipv6,
            vec![
                Value::Ipv6(Ipv6Addr::UNSPECIFIED),
                Value::Ipv6(Ipv6Addr::from(u128::MAX)),
            ],
        ),
        (
            DataType::Enum8(small),
            vec![Value::Enum8(-1), Value::Enum8(i8::MIN), Value::Enum8(i8::MAX)],
        ),
        (
            DataType::Enum16(extremes),
            vec![Value::Enum16(0), Value::Enum16(i16::MIN), Value::Enum16(i16::MAX)],
        ),
        (
            DataType::Interval(IntervalUnit::Second),
            vec![
                Value::Interval(Interval {
                    unit: IntervalUnit::Second,
                    count: 0,
                }),
                Value::Interval(Interval {
                    unit: IntervalUnit::Second,
                    count: u64::MAX,
                }),
            ],
        ),
    ]
}

#[test]
fn scalar_boundaries_round_trip() {
    for (data_type, values) in scalar_boundaries() {
        let plain = ty(data_type.clone());
        let nullable = TypeDescriptor::nullable(data_type);
        assert_round_trip(&Value::Null, &nullable);
        for value in &values {
            assert_round_trip(value, &plain);
            assert_round_trip(value, &nullable);
        }
    }
}

#[test]
fn composite_boundaries_round_trip() {
    let ints = TypeDescriptor::array(TypeDescriptor::nullable(DataType::I64));
    assert_round_trip(&Value::Array(vec![]), &ints);
    assert_round_trip(
        &Value::Array(vec![Value::I64(i64::MIN), Value::Null, Value::I64(-1)]),
        &ints,
    );

    let tuple = TypeDescriptor::tuple(vec![ty(DataType::U64), ty(DataType::String)]);
    assert_round_trip(&Value::Tuple(vec![Value::U64(u64::MAX), Value::string("")]), &tuple);

    let map = TypeDescriptor::map(ty(DataType::String), TypeDescriptor::nullable(DataType::I8));
    assert_round_trip(&Value::Map(vec![]), &map);
    assert_round_trip(
        &Value::Map(vec![
            (Value::string("min"), Value::I8(i8::MIN)),
            (Value::string("none"), Value::Null),
        ]),
        &map,
    );

    let variant = TypeDescriptor::variant(vec![ty(DataType::U64), ty(DataType::String)]);
    for value in [Value::Null, Value::U64(u64::MAX), Value::string("")] {
        assert_round_trip(&value, &variant);
    }
}

// ── truncation ───────────────────────────────────────────────────────────────

#[test]
fn short_input_is_truncated() {
    assert_eq!(decode_err(&[1, 2], &ty(DataType::U32)).kind(), ErrorKind::Truncated);
    assert_eq!(decode_err(&[5, b'a'], &ty(DataType::String)).kind(), ErrorKind::Truncated);

    let array = TypeDescriptor::array(ty(DataType::U16));
    assert_eq!(decode_err(&[3, 1, 0], &array).kind(), ErrorKind::Truncated);
}

#[test]
fn huge_declared_count_fails_without_allocating() {
    let array = TypeDescriptor::array(ty(DataType::U8));
    let err = decode_err(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F], &array);
    assert!(err.is_truncated());
}

#[test]
fn zero_width_elements_have_a_count_limit() {
    let nothing = TypeDescriptor::array(ty(DataType::Nothing));
    assert_eq!(
        decoded(&[3], &nothing),
        Value::Array(vec![Value::Null, Value::Null, Value::Null])
    );

    let mut bytes = Vec::new();
    write_varint(&mut bytes, 10_000_000).unwrap();
    assert_eq!(decode_err(&bytes, &nothing).kind(), ErrorKind::InvalidValue);

    let empty_tuples = TypeDescriptor::array(TypeDescriptor::tuple(vec![]));
    let mut bytes = Vec::new();
    write_varint(&mut bytes, (1 << 63) - 1).unwrap();
    assert_eq!(decode_err(&bytes, &empty_tuples).kind(), ErrorKind::InvalidValue);

    let nulls = TypeDescriptor::array(TypeDescriptor::nullable(DataType::Nothing));
    let mut bytes = Vec::new();
    write_varint(&mut bytes, 10_000_000).unwrap();
    assert!(decode_err(&bytes, &nulls).is_truncated());
}

#[test]
fn dynamic_inside_dynamic_is_depth_limited() {
    let dynamic = ty(DataType::Dynamic { max_types: None });
    assert_eq!(
        decoded(&[0x2B, 0x20, 0x2B, 0x20, 0x09, 7, 0, 0, 0], &dynamic),
        Value::I32(7)
    );

    let mut bytes = [0x2Bu8, 0x20].repeat(200_000);
    bytes.push(0x00);
    assert_eq!(decode_err(&bytes, &dynamic).kind(), ErrorKind::InvalidValue);
}

#[test]
fn consecutive_values_share_one_cursor() {
    let mut buf = Vec::new();
    let encoder = ValueEncoder::default();
    encoder.encode(&mut buf, &Value::U8(1), &ty(DataType::U8)).unwrap();
    encoder
        .encode(&mut buf, &Value::string("ok"), &ty(DataType::String))
        .unwrap();

    let mut cursor = buf.as_slice();
    let decoder = ValueDecoder::default();
    assert_eq!(decoder.decode(&mut cursor, &ty(DataType::U8)).unwrap(), Value::U8(1));
    assert_eq!(
        decoder.decode(&mut cursor, &ty(DataType::String)).unwrap(),
        Value::string("ok")
    );
    assert!(cursor.is_empty());
}

// ── options ──────────────────────────────────────────────────────────────────

#[test]
fn options_load_from_toml() {
    let options: CodecOptions =
        toml::from_str("default_time_zone = \"Europe/Berlin\"\nstrict_enums = false").unwrap();
    assert_eq!(options.default_time_zone, "Europe/Berlin".parse::<Tz>().unwrap());
    assert!(!options.strict_enums);

    let defaults: CodecOptions = toml::from_str("").unwrap();
    assert_eq!(defaults, CodecOptions::default());

    assert!(toml::from_str::<CodecOptions>("default_time_zone = \"Mars/Olympus\"").is_err());
    assert!(toml::from_str::<CodecOptions>("colour = 1").is_err());
}
