use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use mapgraph_core::literal::ArrayLiteral;
use mapgraph_core::reflect::{Enumeration, ObjectRef, TypeRegistry};
use mapgraph_core::{
    reflect_struct, Array, Literal, LiteralRegistry, MapError, Mapper, Result, TypeDesc, Value,
};
use mapgraph_util::names::SequentialNames;
use num_bigint::BigInt;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn codec(name: &str) -> Arc<dyn Literal> {
    LiteralRegistry::new()
        .literal_for(&TypeDesc::scalar(name), &TypeRegistry::new())
        .unwrap()
}

fn round_trip(name: &str, value: Value) {
    let literal = codec(name);
    let text = literal.to_text(&value).unwrap();
    assert_eq!(literal.to_value(&text).unwrap(), value, "{name}: {text}");
}

#[test]
fn test_integer_boundaries() {
    round_trip("i8", Value::I8(i8::MIN));
    round_trip("i8", Value::I8(i8::MAX));
    round_trip("i16", Value::I16(i16::MIN));
    round_trip("i16", Value::I16(i16::MAX));
    round_trip("i32", Value::I32(i32::MIN));
    round_trip("i32", Value::I32(i32::MAX));
    round_trip("i64", Value::I64(i64::MIN));
    round_trip("i64", Value::I64(i64::MAX));
    round_trip("i128", Value::I128(i128::MIN));
    round_trip("i128", Value::I128(i128::MAX));
    round_trip("isize", Value::Isize(isize::MIN));
    round_trip("u8", Value::U8(u8::MAX));
    round_trip("u16", Value::U16(u16::MAX));
    round_trip("u32", Value::U32(u32::MAX));
    round_trip("u64", Value::U64(u64::MAX));
    round_trip("u128", Value::U128(u128::MAX));
    round_trip("usize", Value::Usize(usize::MAX));
    round_trip("u8", Value::U8(0));
}

#[test]
fn test_float_boundaries_are_bit_exact() {
    for f in [f64::MIN, f64::MAX, f64::MIN_POSITIVE, f64::EPSILON, -0.0, 5e-324] {
        let literal = codec("f64");
        let text = literal.to_text(&Value::F64(f)).unwrap();
        match literal.to_value(&text).unwrap() {
            Value::F64(back) => assert_eq!(back.to_bits(), f.to_bits(), "{text}"),
            other => panic!("unexpected {other:?}"),
        }
    }
    for f in [f32::MIN, f32::MAX, f32::MIN_POSITIVE, f32::EPSILON, 1e-45] {
        let literal = codec("f32");
        let text = literal.to_text(&Value::F32(f)).unwrap();
        match literal.to_value(&text).unwrap() {
            Value::F32(back) => assert_eq!(back.to_bits(), f.to_bits(), "{text}"),
            other => panic!("unexpected {other:?}"),
        }
    }
    round_trip("f64", Value::F64(f64::INFINITY));
    round_trip("f64", Value::F64(f64::NEG_INFINITY));
    match codec("f64").to_value("NaN").unwrap() {
        Value::F64(nan) => assert!(nan.is_nan()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_big_numbers() {
    let big = BigInt::from_str("-123456789012345678901234567890123456789012345678901234567890").unwrap();
    round_trip("BigInt", Value::BigInt(big));
    round_trip("Decimal", Value::Decimal(Decimal::MAX));
    round_trip("Decimal", Value::Decimal(Decimal::MIN));
    round_trip("Decimal", Value::Decimal(Decimal::from_str("-0.000000001").unwrap()));
}

#[test]
fn test_other_base_literals() {
    round_trip("bool", Value::Bool(false));
    round_trip("char", Value::Char('['));
    round_trip("String", Value::from("with, [brackets] and \\ backslash"));
    round_trip("String", Value::from(""));
}

#[test]
fn test_null_is_uniform() {
    for name in ["bool", "i32", "String", "DateTime", "BigInt"] {
        let literal = codec(name);
        assert_eq!(literal.to_text(&Value::Null).unwrap(), "\\N");
        assert_eq!(literal.to_value("\\N").unwrap(), Value::Null);
    }
}

#[test]
fn test_conversion_failures() {
    assert!(matches!(
        codec("u8").to_value("256"),
        Err(MapError::Conversion { .. })
    ));
    assert!(matches!(
        codec("DateTime").to_value("yesterday"),
        Err(MapError::Conversion { .. })
    ));
    let error = codec("i32").to_value("1.5").unwrap_err();
    assert!(error.to_string().contains("1.5"));
}

fn string_array(items: &[Option<&str>]) -> Value {
    Value::Array(Array::new(
        TypeDesc::scalar("String"),
        items.iter().map(|s| Value::from(*s)).collect(),
    ))
}

#[test]
fn test_string_array_with_null_element() {
    let registry = LiteralRegistry::new();
    let literal = registry
        .literal_for(&TypeDesc::with_dimensions("String", 1), &TypeRegistry::new())
        .unwrap();
    let value = string_array(&[Some(""), None, Some("[")]);
    assert_eq!(literal.to_text(&value).unwrap(), "[,\\N,\\[]");
    assert_eq!(literal.to_value("[,\\N,\\[]").unwrap(), value);
}

#[test]
fn test_enum_array() {
    let registry = LiteralRegistry::new();
    let mut types = TypeRegistry::new();
    types.register_enumeration(Enumeration::new("F", ["A", "B"]));
    let literal = registry
        .literal_for(&TypeDesc::with_dimensions("F", 1), &types)
        .unwrap();
    let value = literal.to_value("[A,B,\\N]").unwrap();
    assert_eq!(literal.to_text(&value).unwrap(), "[A,B,\\N]");
    assert!(literal.to_value("[A,Z]").is_err());
}

#[test]
fn test_concurrent_lookups_share_one_codec() {
    let registry = LiteralRegistry::new();
    let types = TypeRegistry::new();
    let ty = TypeDesc::with_dimensions("i64", 3);
    let codecs: Vec<Arc<dyn Literal>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| registry.literal_for(&ty, &types).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let canonical = registry.literal_for(&ty, &types).unwrap();
    for codec in &codecs {
        assert!(Arc::ptr_eq(codec, &canonical));
    }
}

#[derive(Debug, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}
reflect_struct!("geo.Point", Point { x: i32, y: i32 });

#[derive(Debug, Default)]
struct Holder {
    point: Option<ObjectRef>,
}
reflect_struct!("geo.Holder", Holder { point: Option<ObjectRef> });

/// Points as `x;y`.
struct PointLiteral;

impl Literal for PointLiteral {
    fn format(&self, value: &Value) -> Result<String> {
        let point = value
            .as_object()
            .and_then(|o| o.get::<Point>().map(|p| format!("{};{}", p.x, p.y)));
        point.ok_or_else(|| MapError::mismatch("geo.Point", value.kind()))
    }

    fn parse(&self, text: &str) -> Result<Value> {
        let (x, y) = text
            .split_once(';')
            .ok_or_else(|| MapError::conversion("geo.Point", text, "expected x;y"))?;
        let coordinate = |s: &str| {
            s.parse::<i32>()
                .map_err(|e| MapError::conversion("geo.Point", text, e))
        };
        Ok(Value::Object(ObjectRef::new(Point {
            x: coordinate(x)?,
            y: coordinate(y)?,
        })))
    }
}

#[test]
fn test_custom_literal_for_structure() {
    let registry = Arc::new(LiteralRegistry::new());
    registry
        .register(TypeDesc::scalar("geo.Point"), Arc::new(PointLiteral))
        .unwrap();
    let mut types = TypeRegistry::new();
    types.register::<Point>().register::<Holder>();
    let mapper = Mapper::builder()
        .literals(Arc::clone(&registry))
        .introspector(types)
        .name_allocator(SequentialNames::default())
        .build();

    let holder = ObjectRef::new(Holder {
        point: Some(ObjectRef::new(Point { x: 3, y: -4 })),
    });
    let mapped = mapper.to_map(&Value::Object(holder)).unwrap();
    assert_eq!(mapped.objects["obj_ref_holder"]["point"].as_deref(), Some("obj_ref_point"));
    assert_eq!(mapped.objects["obj_ref_point"]["point"].as_deref(), Some("3;-4"));

    let rebuilt = mapper.from_map(&mapped).unwrap();
    let holder = rebuilt.as_object().unwrap().get::<Holder>().unwrap();
    let point = holder.point.as_ref().unwrap().get::<Point>().unwrap();
    assert_eq!(*point, Point { x: 3, y: -4 });

    assert!(registry.unregister(&TypeDesc::scalar("geo.Point")).unwrap().is_some());
    let mapped = mapper
        .to_map(&Value::Object(ObjectRef::new(Point { x: 1, y: 2 })))
        .unwrap();
    assert_eq!(mapped.objects["obj_ref_point"]["x"].as_deref(), Some("1"));
}

#[test]
fn test_nested_array_keeps_escaped_leaves() {
    let registry = LiteralRegistry::new();
    let types = TypeRegistry::new();
    let literal = registry
        .literal_for(&TypeDesc::with_dimensions("String", 2), &types)
        .unwrap();
    let value = Value::Array(Array::new(
        TypeDesc::with_dimensions("String", 1),
        vec![string_array(&[Some("a,b")]), Value::Null, string_array(&[])],
    ));
    let text = literal.to_text(&value).unwrap();
    assert_eq!(text, "[[a\\,b],\\N,[]]");
    assert_eq!(literal.to_value(&text).unwrap(), value);
}

#[test]
fn test_array_literal_can_wrap_custom_codec() {
    let literal = ArrayLiteral::new(TypeDesc::scalar("geo.Point"), Arc::new(PointLiteral));
    let value = literal.to_value("[1;2,\\N]").unwrap();
    let items = &value.as_array().unwrap().items;
    assert_eq!(*items[0].as_object().unwrap().get::<Point>().unwrap(), Point { x: 1, y: 2 });
    assert_eq!(items[1], Value::Null);
}

proptest! {
    #[test]
    fn prop_i64_round_trip(n in any::<i64>()) {
        let literal = codec("i64");
        prop_assert_eq!(literal.to_value(&literal.to_text(&Value::I64(n)).unwrap()).unwrap(), Value::I64(n));
    }

    #[test]
    fn prop_f64_round_trip_is_bit_exact(f in any::<f64>().prop_filter("not NaN", |f| !f.is_nan())) {
        let literal = codec("f64");
        let text = literal.to_text(&Value::F64(f)).unwrap();
        match literal.to_value(&text).unwrap() {
            Value::F64(back) => prop_assert_eq!(back.to_bits(), f.to_bits()),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn prop_string_array_round_trip(
        items in proptest::collection::vec(proptest::option::of("[a-c\\[\\],\\\\N ]{0,6}"), 0..6)
            .prop_filter("a lone empty string reads back as an empty array", |items| {
                !(items.len() == 1 && items[0].as_deref() == Some(""))
            })
    ) {
        let registry = LiteralRegistry::new();
        let literal = registry
            .literal_for(&TypeDesc::with_dimensions("String", 1), &TypeRegistry::new())
            .unwrap();
        let value = Value::Array(Array::new(
            TypeDesc::scalar("String"),
            items.into_iter().map(Value::from).collect(),
        ));
        let text = literal.to_text(&value).unwrap();
        prop_assert_eq!(literal.to_value(&text).unwrap(), value);
    }
}
