//! The typed facade: domain structs wired through [`Packable`] and the free
//! `serialize`/`deserialize` functions.

use std::sync::OnceLock;

use structpack::{
    deserialize, serialize, static_registry, DecodeError, EnumRepr, Field, Kind, ObjectSchema,
    Packable, Registry, RegistryBuilder, SchemaError, UnionSchema, Value,
};

const TEST_F64_3_14159: f64 = 314_159.0 / 100_000.0;

static REGISTRY: OnceLock<Result<Registry, SchemaError>> = OnceLock::new();

fn shared_registry() -> Result<&'static Registry, SchemaError> {
    static_registry(&REGISTRY, || {
        RegistryBuilder::new()
            .object(ObjectSchema::fixed(
                "SimpleData",
                vec![
                    Field::new("id", Kind::I32),
                    Field::new("name", Kind::Str),
                    Field::new("value", Kind::F64),
                    Field::new("is_active", Kind::Bool),
                    Field::new("color", Kind::Enum(EnumRepr::I32)),
                ],
            ))
            .object(ObjectSchema::version_tolerant(
                "VersionTolerantData",
                vec![
                    Field::new("property1", Kind::I32),
                    Field::new("property2", Kind::Str),
                    Field::new("property3", Kind::F64),
                ],
            ))
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
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Green,
    Blue,
    Other(i32),
}

impl Color {
    fn code(self) -> i32 {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
            Color::Other(n) => n,
        }
    }

    fn from_code(n: i32) -> Self {
        match n {
            0 => Color::Red,
            1 => Color::Green,
            2 => Color::Blue,
            other => Color::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SimpleData {
    id: i32,
    name: String,
    value: f64,
    is_active: bool,
    color: Color,
}

impl Packable for SimpleData {
    fn registry() -> Result<&'static Registry, SchemaError> {
        shared_registry()
    }

    fn root() -> Kind {
        Kind::object("SimpleData")
    }

    fn to_value(&self) -> Value {
        Value::record([
            ("id", Value::I32(self.id)),
            ("name", Value::str(&self.name)),
            ("value", Value::F64(self.value)),
            ("is_active", Value::Bool(self.is_active)),
            ("color", Value::Enum(self.color.code() as i64)),
        ])
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let id = require_i32(&value, "id")?;
        let name = require_str(&value, "name")?;
        let is_active = match value.field("is_active") {
            Some(Value::Bool(b)) => *b,
            _ => return Err(DecodeError::TypeMismatch("bool field")),
        };
        let raw = match value.field("value") {
            Some(Value::F64(f)) => *f,
            _ => return Err(DecodeError::TypeMismatch("f64 field")),
        };
        let color = match value.field("color") {
            Some(Value::Enum(n)) => Color::from_code(*n as i32),
            _ => return Err(DecodeError::TypeMismatch("enum field")),
        };
        Ok(SimpleData {
            id,
            name,
            value: raw,
            is_active,
            color,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct VersionTolerantData {
    property1: i32,
    property2: String,
    property3: f64,
}

impl Packable for VersionTolerantData {
    fn registry() -> Result<&'static Registry, SchemaError> {
        shared_registry()
    }

    fn root() -> Kind {
        Kind::object("VersionTolerantData")
    }

    fn to_value(&self) -> Value {
        Value::record([
            ("property1", Value::I32(self.property1)),
            ("property2", Value::str(&self.property2)),
            ("property3", Value::F64(self.property3)),
        ])
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let property1 = require_i32(&value, "property1")?;
        let property2 = require_str(&value, "property2")?;
        let property3 = match value.field("property3") {
            Some(Value::F64(f)) => *f,
            _ => return Err(DecodeError::TypeMismatch("f64 field")),
        };
        Ok(VersionTolerantData {
            property1,
            property2,
            property3,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum UnionSample {
    Foo { xyz: i32 },
    Bar { opq: String },
}

impl Packable for UnionSample {
    fn registry() -> Result<&'static Registry, SchemaError> {
        shared_registry()
    }

    fn root() -> Kind {
        Kind::union("UnionSample")
    }

    fn to_value(&self) -> Value {
        match self {
            UnionSample::Foo { xyz } => Value::Union {
                variant: "FooClass".to_string(),
                value: Box::new(Value::record([("xyz", Value::I32(*xyz))])),
            },
            UnionSample::Bar { opq } => Value::Union {
                variant: "BarClass".to_string(),
                value: Box::new(Value::record([("opq", Value::str(opq))])),
            },
        }
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let Value::Union { variant, value } = value else {
            return Err(DecodeError::TypeMismatch("union value"));
        };
        match variant.as_str() {
            "FooClass" => Ok(UnionSample::Foo {
                xyz: require_i32(&value, "xyz")?,
            }),
            "BarClass" => Ok(UnionSample::Bar {
                opq: require_str(&value, "opq")?,
            }),
            _ => Err(DecodeError::TypeMismatch("union variant")),
        }
    }
}

fn require_i32(value: &Value, name: &str) -> Result<i32, DecodeError> {
    match value.field(name) {
        Some(Value::I32(n)) => Ok(*n),
        _ => Err(DecodeError::TypeMismatch("i32 field")),
    }
}

fn require_str(value: &Value, name: &str) -> Result<String, DecodeError> {
    match value.field(name) {
        Some(Value::Str(s)) => Ok(s.clone()),
        _ => Err(DecodeError::TypeMismatch("string field")),
    }
}

#[test]
fn simple_data_roundtrips_through_the_facade() {
    let original = SimpleData {
        id: 42,
        name: "Test Data".to_string(),
        value: TEST_F64_3_14159,
        is_active: true,
        color: Color::Blue,
    };
    let bytes = serialize(&original).unwrap();
    let restored: SimpleData = deserialize(&bytes).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn unknown_enum_member_survives_the_typed_path() {
    let original = SimpleData {
        id: 1,
        name: String::new(),
        value: 0.0,
        is_active: false,
        color: Color::Other(42),
    };
    let bytes = serialize(&original).unwrap();
    let restored: SimpleData = deserialize(&bytes).unwrap();
    assert_eq!(restored.color, Color::Other(42));
}

#[test]
fn version_tolerant_data_roundtrips_through_the_facade() {
    let original = VersionTolerantData {
        property1: 1000,
        property2: "Version Tolerant".to_string(),
        property3: 9_999.0 / 100.0,
    };
    let bytes = serialize(&original).unwrap();
    let restored: VersionTolerantData = deserialize(&bytes).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn union_variants_roundtrip_through_the_facade() {
    let foo = UnionSample::Foo { xyz: 999 };
    let bytes = serialize(&foo).unwrap();
    assert_eq!(bytes, [0x00, 0xe7, 0x03, 0x00, 0x00]);
    assert_eq!(deserialize::<UnionSample>(&bytes).unwrap(), foo);

    let bar = UnionSample::Bar {
        opq: "hello".to_string(),
    };
    let bytes = serialize(&bar).unwrap();
    assert_eq!(deserialize::<UnionSample>(&bytes).unwrap(), bar);
}

#[test]
fn typed_decode_reports_wire_errors() {
    let bytes = serialize(&UnionSample::Foo { xyz: 1 }).unwrap();
    let err = deserialize::<UnionSample>(&bytes[..2]).unwrap_err();
    assert_eq!(err, DecodeError::UnexpectedEndOfData);

    let err = deserialize::<UnionSample>(&[0x09, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
    assert_eq!(err, DecodeError::UnknownUnionTag(9));
}

#[test]
fn registry_is_built_once_and_shared() {
    let a = shared_registry().unwrap();
    let b = SimpleData::registry().unwrap();
    assert!(std::ptr::eq(a, b));
}
