//! Schema descriptors: immutable, build-once descriptions of on-wire layout.
//!
//! A [`Kind`] describes one wire position. Object and union kinds reference
//! registered types by name; the [`crate::registry::Registry`] resolves them,
//! so descriptors themselves stay flat and cheaply cloneable.

/// Underlying fixed width of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRepr {
    /// One byte.
    U8,
    /// Four bytes, little-endian.
    I32,
    /// Eight bytes, little-endian.
    I64,
}

impl EnumRepr {
    /// Encoded width in bytes.
    pub fn width(self) -> usize {
        match self {
            EnumRepr::U8 => 1,
            EnumRepr::I32 => 4,
            EnumRepr::I64 => 8,
        }
    }
}

/// Wire layout mode of an object schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Positional, headerless. Encode and decode schema must be identical.
    Fixed,
    /// Field-count header plus per-field length prefixes; trailing fields may
    /// be added or dropped across schema versions.
    VersionTolerant,
}

/// The kind of value occupying one wire position.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// One byte, 0 or 1.
    Bool,
    /// Four bytes, little-endian.
    I32,
    /// Eight bytes, little-endian.
    I64,
    /// IEEE-754 binary64 bit pattern, little-endian.
    F64,
    /// Varint byte length (or null sentinel) plus UTF-8 bytes.
    Str,
    /// Varint byte length (or null sentinel) plus raw bytes.
    Bytes,
    /// Varint element count (or null sentinel) plus elements in order.
    Seq(Box<Kind>),
    /// Varint entry count (or null sentinel) plus key/value pairs.
    Map(Box<Kind>, Box<Kind>),
    /// Underlying integer at the repr's fixed width; membership not enforced.
    Enum(EnumRepr),
    /// Reference to a registered object schema. When `nullable`, the payload
    /// is preceded by one presence byte (0 = null, 1 = present).
    Object { name: String, nullable: bool },
    /// Reference to a registered union; varint discriminator (null sentinel
    /// for an absent union) plus the variant's payload.
    Union { name: String },
}

impl Kind {
    /// Sequence of `element`.
    pub fn seq(element: Kind) -> Kind {
        Kind::Seq(Box::new(element))
    }

    /// Map from `key` to `value`.
    pub fn map(key: Kind, value: Kind) -> Kind {
        Kind::Map(Box::new(key), Box::new(value))
    }

    /// Non-nullable reference to a registered object.
    pub fn object(name: impl Into<String>) -> Kind {
        Kind::Object {
            name: name.into(),
            nullable: false,
        }
    }

    /// Nullable reference to a registered object.
    pub fn nullable_object(name: impl Into<String>) -> Kind {
        Kind::Object {
            name: name.into(),
            nullable: true,
        }
    }

    /// Reference to a registered union.
    pub fn union(name: impl Into<String>) -> Kind {
        Kind::Union { name: name.into() }
    }
}

/// One field of an object schema. The name pairs values with wire positions
/// at encode time and never reaches the wire itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: Kind,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Immutable description of an object type's on-wire layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub name: String,
    pub layout: Layout,
    pub fields: Vec<Field>,
}

impl ObjectSchema {
    /// Fixed-layout object: positional, headerless.
    pub fn fixed(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            layout: Layout::Fixed,
            fields,
        }
    }

    /// Version-tolerant object: self-describing enough to add or drop
    /// trailing fields across schema versions.
    pub fn version_tolerant(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            layout: Layout::VersionTolerant,
            fields,
        }
    }
}

/// One entry of a union's discriminator table.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionVariant {
    /// Wire discriminator.
    pub tag: u64,
    /// Name of the registered object schema this tag selects.
    pub variant: String,
}

/// Ordered discriminator table of a closed tagged union.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionSchema {
    pub name: String,
    pub variants: Vec<UnionVariant>,
}

impl UnionSchema {
    /// Builds a union from `(tag, variant type name)` pairs.
    pub fn new<S: Into<String>>(name: impl Into<String>, variants: Vec<(u64, S)>) -> Self {
        Self {
            name: name.into(),
            variants: variants
                .into_iter()
                .map(|(tag, variant)| UnionVariant {
                    tag,
                    variant: variant.into(),
                })
                .collect(),
        }
    }
}
