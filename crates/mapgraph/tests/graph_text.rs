//! Object graphs through every codec and back.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use mapgraph::{
    reflect_enum, reflect_struct, Error, GraphText, JsonSerializer, LiteralRegistry, MapError,
    Mapper, ObjectRef, SequentialNames, SerializeError, Serializer, TypeRegistry, Value,
    XmlSerializer, YamlSerializer,
};
use proptest::prelude::*;

#[derive(Debug, Default, PartialEq)]
struct A {
    a: String,
    b: i32,
}
reflect_struct!("A", A { a: String, b: i32 });

#[derive(Debug, Default)]
struct B {
    a: i32,
    b: String,
    c: Option<ObjectRef>,
}
reflect_struct!("B", B { a: i32, b: String, c: Option<ObjectRef> });

#[derive(Debug, Default)]
struct C {
    c: Option<ObjectRef>,
}
reflect_struct!("C", C { c: Option<ObjectRef> });

#[derive(Debug, Default)]
struct D {
    e: Option<ObjectRef>,
}
reflect_struct!("D", D { e: Option<ObjectRef> });

#[derive(Debug, Default)]
struct E {
    d: Option<ObjectRef>,
    e: Option<ObjectRef>,
}
reflect_struct!("E", E { d: Option<ObjectRef>, e: Option<ObjectRef> });

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Level {
    #[default]
    Low,
    High,
}
reflect_enum!("demo.Level", Level { Low, High });

#[derive(Debug, Default, PartialEq)]
struct Event {
    when: NaiveDateTime,
    note: Option<String>,
    text: String,
    initial: char,
    ratio: f64,
    count: u64,
    level: Level,
    history: Vec<Level>,
    tags: Vec<Vec<Option<String>>>,
}
reflect_struct!("demo.Event", Event {
    when: NaiveDateTime,
    note: Option<String>,
    text: String,
    initial: char,
    ratio: f64,
    count: u64,
    level: Level,
    history: Vec<Level>,
    tags: Vec<Vec<Option<String>>>,
});

fn mapper() -> Mapper {
    let mut types = TypeRegistry::new();
    types
        .register::<A>()
        .register::<B>()
        .register::<C>()
        .register::<D>()
        .register::<E>()
        .register::<Event>()
        .register_enum::<Level>();
    Mapper::builder()
        .literals(Arc::new(LiteralRegistry::new()))
        .introspector(types)
        .name_allocator(SequentialNames::default())
        .build()
}

fn codecs() -> Vec<(&'static str, GraphText<Box<dyn Serializer>>)> {
    let json: Box<dyn Serializer> = Box::new(
        JsonSerializer::builder()
            .name_allocator(SequentialNames::default())
            .build()
            .unwrap(),
    );
    let xml: Box<dyn Serializer> = Box::new(
        XmlSerializer::builder()
            .name_allocator(SequentialNames::default())
            .build()
            .unwrap(),
    );
    let yaml: Box<dyn Serializer> = Box::new(
        YamlSerializer::builder()
            .name_allocator(SequentialNames::default())
            .build()
            .unwrap(),
    );
    vec![
        ("json", GraphText::new(mapper(), json)),
        ("xml", GraphText::new(mapper(), xml)),
        ("yaml", GraphText::new(mapper(), yaml)),
    ]
}

fn field(object: &ObjectRef, name: &str) -> ObjectRef {
    match object.field(name) {
        Some(Value::Object(target)) => target,
        other => panic!("{name} is not an object reference: {other:?}"),
    }
}

#[test]
fn test_json_of_single_object() {
    let text = GraphText::new(mapper(), JsonSerializer::default());
    let a = ObjectRef::new(A {
        a: "Test".into(),
        b: 10,
    });
    assert_eq!(
        text.to_text(&Value::Object(a)).unwrap(),
        "{\n  \"obj_ref_a\": {\n    \"class\": \"A\",\n    \"a\": \"Test\",\n    \"b\": \"10\"\n  }\n}"
    );
}

#[test]
fn test_self_cycle() {
    for (name, text) in codecs() {
        let c = ObjectRef::new(C::default());
        c.get_mut::<C>().unwrap().c = Some(c.clone());
        let written = text.to_text(&Value::Object(c)).unwrap();
        let rebuilt = text.from_text(&written).unwrap();
        let rebuilt = rebuilt.as_object().unwrap();
        assert!(field(rebuilt, "c").ptr_eq(rebuilt), "{name}: {written}");
    }
}

#[test]
fn test_mutual_cycle() {
    for (name, text) in codecs() {
        let d = ObjectRef::new(D::default());
        let e = ObjectRef::new(E::default());
        d.get_mut::<D>().unwrap().e = Some(e.clone());
        {
            let mut inner = e.get_mut::<E>().unwrap();
            inner.d = Some(d.clone());
            inner.e = Some(e.clone());
        }
        let written = text.to_text(&Value::Object(d)).unwrap();
        let d = text.from_text(&written).unwrap();
        let d = d.as_object().unwrap();
        let e = field(d, "e");
        assert!(field(&e, "d").ptr_eq(d), "{name}: {written}");
        assert!(field(&e, "e").ptr_eq(&e), "{name}: {written}");
    }
}

#[test]
fn test_shared_object_stays_shared() {
    for (name, text) in codecs() {
        let shared = ObjectRef::new(C::default());
        let e = ObjectRef::new(E {
            d: Some(shared.clone()),
            e: Some(shared),
        });
        let written = text.to_text(&Value::Object(e)).unwrap();
        let e = text.from_text(&written).unwrap();
        let e = e.as_object().unwrap();
        assert!(field(e, "d").ptr_eq(&field(e, "e")), "{name}: {written}");
    }
}

#[test]
fn test_single_reference_is_inlined() {
    let text = GraphText::new(mapper(), JsonSerializer::default());
    let b = ObjectRef::new(B {
        a: 1,
        b: "outer".into(),
        c: Some(ObjectRef::new(A {
            a: "inner".into(),
            b: 2,
        })),
    });
    let inlined = text.to_text(&Value::Object(b.clone())).unwrap();
    assert!(inlined.contains("\"c\": {\n      \"class\": \"A\""), "{inlined}");
    let flat = text.to_text_inlined(&Value::Object(b), false).unwrap();
    assert!(flat.contains("\"c\": \"obj_ref_a\""), "{flat}");

    for written in [inlined, flat] {
        let b = text.from_text(&written).unwrap();
        let b = b.as_object().unwrap();
        let a = field(b, "c");
        assert_eq!(
            *a.get::<A>().unwrap(),
            A {
                a: "inner".into(),
                b: 2
            }
        );
    }
}

fn event() -> Event {
    Event {
        when: NaiveDate::from_ymd_opt(2016, 3, 7)
            .unwrap()
            .and_hms_milli_opt(14, 5, 9, 250)
            .unwrap(),
        note: None,
        text: "<tag> & \"quotes\" ]]> \n\ttabbed".into(),
        initial: '&',
        ratio: -0.1,
        count: u64::MAX,
        level: Level::High,
        history: vec![Level::Low, Level::High],
        tags: vec![
            vec![Some("a,b".into()), None, Some("[x]".into()), Some(String::new())],
            vec![],
        ],
    }
}

#[test]
fn test_literals_survive_every_codec() {
    for (name, text) in codecs() {
        let written = text.to_text(&Value::Object(ObjectRef::new(event()))).unwrap();
        let rebuilt = text.from_text(&written).unwrap();
        let rebuilt = rebuilt.as_object().unwrap().get::<Event>().unwrap();
        assert_eq!(*rebuilt, event(), "{name}: {written}");
    }
}

#[test]
fn test_streams() {
    for (name, text) in codecs() {
        let mut out = Vec::new();
        text.write(&Value::Object(ObjectRef::new(event())), &mut out).unwrap();
        let rebuilt = text.read_from(&mut out.as_slice()).unwrap();
        assert_eq!(*rebuilt.as_object().unwrap().get::<Event>().unwrap(), event(), "{name}");
    }
}

#[test]
fn test_errors_keep_their_layer() {
    let text = GraphText::new(mapper(), JsonSerializer::default());
    assert!(matches!(
        text.from_text(r#"{"obj_ref_a": {"a": "x"}}"#),
        Err(Error::Serialize(SerializeError::Malformed(_)))
    ));
    assert!(matches!(
        text.from_text(r#"{"obj_ref_a": {"class": "Missing"}}"#),
        Err(Error::Map(MapError::NotFound(_)))
    ));
    assert!(matches!(
        text.from_text(r#"{"obj_ref_a": {"class": "A", "b": "ten"}}"#),
        Err(Error::Map(MapError::Conversion { .. }))
    ));
}

fn chain(links: &[(i32, String)]) -> Option<ObjectRef> {
    links.iter().rev().fold(None, |next, (a, b)| {
        Some(ObjectRef::new(B {
            a: *a,
            b: b.clone(),
            c: next,
        }))
    })
}

fn links_of(mut node: Option<ObjectRef>) -> Vec<(i32, String)> {
    let mut links = Vec::new();
    while let Some(current) = node {
        let b = current.get::<B>().unwrap();
        links.push((b.a, b.b.clone()));
        node = b.c.clone();
    }
    links
}

proptest! {
    #[test]
    fn prop_acyclic_chain_round_trip(
        links in proptest::collection::vec((any::<i32>(), "[a-zA-Z0-9 <>&,\\[\\]\"]{0,10}"), 1..6)
    ) {
        for (name, text) in codecs() {
            let root = Value::Object(chain(&links).unwrap());
            let written = text.to_text(&root).unwrap();
            let rebuilt = text.from_text(&written).unwrap();
            let rebuilt = rebuilt.as_object().cloned();
            prop_assert_eq!(links_of(rebuilt), links.clone(), "{}: {}", name, written);
        }
    }
}
