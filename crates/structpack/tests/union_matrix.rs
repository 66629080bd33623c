use structpack::{
    DecodeError, Decoder, Encoder, Field, Kind, ObjectSchema, Registry, RegistryBuilder,
    SchemaError, UnionSchema, Value,
};

fn registry() -> Registry {
    RegistryBuilder::new()
        .object(ObjectSchema::fixed(
            "FooClass",
            vec![Field::new("xyz", Kind::I32)],
        ))
        .object(ObjectSchema::fixed(
            "BarClass",
            vec![Field::new("opq", Kind::Str)],
        ))
        .union(UnionSchema::new(
            "UnionSample",
            vec![(0, "FooClass"), (1, "BarClass")],
        ))
        .build()
        .unwrap()
}

fn kind() -> Kind {
    Kind::union("UnionSample")
}

fn foo(xyz: i32) -> Value {
    Value::Union {
        variant: "FooClass".to_string(),
        value: Box::new(Value::record([("xyz", Value::I32(xyz))])),
    }
}

fn bar(opq: &str) -> Value {
    Value::Union {
        variant: "BarClass".to_string(),
        value: Box::new(Value::record([("opq", Value::str(opq))])),
    }
}

fn roundtrip(registry: &Registry, value: &Value) -> Value {
    let bytes = Encoder::new(registry)
        .encode(value, &kind())
        .unwrap_or_else(|e| panic!("encode failed: {e}"));
    Decoder::new(registry)
        .decode(&bytes, &kind())
        .unwrap_or_else(|e| panic!("decode failed: {e}"))
}

#[test]
fn both_variants_roundtrip() {
    let registry = registry();
    assert_eq!(roundtrip(&registry, &foo(999)), foo(999));
    assert_eq!(roundtrip(&registry, &bar("hello")), bar("hello"));
}

#[test]
fn byte_layout_is_tag_then_payload() {
    let registry = registry();
    let bytes = Encoder::new(&registry).encode(&foo(999), &kind()).unwrap();
    assert_eq!(bytes, [0x00, 0xe7, 0x03, 0x00, 0x00]);
    let bytes = Encoder::new(&registry).encode(&bar("hi"), &kind()).unwrap();
    assert_eq!(bytes, [0x01, 0x02, b'h', b'i']);
}

#[test]
fn null_union_is_sentinel_tag() {
    let registry = registry();
    let bytes = Encoder::new(&registry)
        .encode(&Value::Null, &kind())
        .unwrap();
    let mut expected = vec![0xffu8; 9];
    expected.push(0x01);
    assert_eq!(bytes, expected);
    let decoded = Decoder::new(&registry).decode(&bytes, &kind()).unwrap();
    assert_eq!(decoded, Value::Null);
}

#[test]
fn unknown_tag_is_rejected() {
    let registry = registry();
    // tag 5 was never registered
    let bytes = [0x05, 0xe7, 0x03, 0x00, 0x00];
    let err = Decoder::new(&registry).decode(&bytes, &kind()).unwrap_err();
    assert_eq!(err, DecodeError::UnknownUnionTag(5));
}

#[test]
fn unregistered_variant_is_rejected_on_encode() {
    let registry = registry();
    let value = Value::Union {
        variant: "BazClass".to_string(),
        value: Box::new(Value::record([("xyz", Value::I32(1))])),
    };
    let err = Encoder::new(&registry).encode(&value, &kind()).unwrap_err();
    assert_eq!(err, SchemaError::UnregisteredVariant("BazClass".to_string()));
}

#[test]
fn sparse_tags_are_preserved() {
    let registry = RegistryBuilder::new()
        .object(ObjectSchema::fixed(
            "FooClass",
            vec![Field::new("xyz", Kind::I32)],
        ))
        .union(UnionSchema::new("Sparse", vec![(200, "FooClass")]))
        .build()
        .unwrap();
    let value = Value::Union {
        variant: "FooClass".to_string(),
        value: Box::new(Value::record([("xyz", Value::I32(7))])),
    };
    let bytes = Encoder::new(&registry)
        .encode(&value, &Kind::union("Sparse"))
        .unwrap();
    // 200 is a two-byte varint
    assert_eq!(&bytes[..2], [0xc8, 0x01]);
    let decoded = Decoder::new(&registry)
        .decode(&bytes, &Kind::union("Sparse"))
        .unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn union_as_object_field() {
    let registry = RegistryBuilder::new()
        .object(ObjectSchema::fixed(
            "FooClass",
            vec![Field::new("xyz", Kind::I32)],
        ))
        .object(ObjectSchema::fixed(
            "BarClass",
            vec![Field::new("opq", Kind::Str)],
        ))
        .union(UnionSchema::new(
            "UnionSample",
            vec![(0, "FooClass"), (1, "BarClass")],
        ))
        .object(ObjectSchema::fixed(
            "Holder",
            vec![
                Field::new("before", Kind::Bool),
                Field::new("sample", Kind::union("UnionSample")),
                Field::new("after", Kind::I32),
            ],
        ))
        .build()
        .unwrap();
    let holder_kind = Kind::object("Holder");
    for sample in [foo(3), bar("mid"), Value::Null] {
        let value = Value::record([
            ("before", Value::Bool(true)),
            ("sample", sample.clone()),
            ("after", Value::I32(-1)),
        ]);
        let bytes = Encoder::new(&registry).encode(&value, &holder_kind).unwrap();
        let decoded = Decoder::new(&registry).decode(&bytes, &holder_kind).unwrap();
        assert_eq!(decoded, value, "sample variant: {sample:?}");
    }
}

#[test]
fn version_tolerant_variant_payload_evolves() {
    let variant = |fields| ObjectSchema::version_tolerant("Evolving", fields);
    let make = |schema| {
        RegistryBuilder::new()
            .object(schema)
            .union(UnionSchema::new("Wrapped", vec![(0, "Evolving")]))
            .build()
            .unwrap()
    };
    let writer = make(variant(vec![
        Field::new("a", Kind::I32),
        Field::new("b", Kind::Str),
    ]));
    let reader = make(variant(vec![Field::new("a", Kind::I32)]));
    let value = Value::Union {
        variant: "Evolving".to_string(),
        value: Box::new(Value::record([
            ("a", Value::I32(11)),
            ("b", Value::str("new")),
        ])),
    };
    let wrapped = Kind::union("Wrapped");
    let bytes = Encoder::new(&writer).encode(&value, &wrapped).unwrap();
    let decoded = Decoder::new(&reader).decode(&bytes, &wrapped).unwrap();
    assert_eq!(
        decoded,
        Value::Union {
            variant: "Evolving".to_string(),
            value: Box::new(Value::record([("a", Value::I32(11))])),
        }
    );
}
