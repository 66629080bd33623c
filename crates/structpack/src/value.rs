//! The universal in-memory value tree consumed and produced by the codec.

/// A value conforming to some schema.
///
/// Field names in [`Value::Record`] exist only to pair values with schema
/// fields at encode time; they never reach the wire. Equality on floats is
/// IEEE equality, so `NaN != NaN` — byte-level tests compare bit patterns
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent reference-typed value (null string, bytes, sequence, map,
    /// nullable object or union).
    Null,
    /// Boolean.
    Bool(bool),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 64-bit IEEE-754 float.
    F64(f64),
    /// UTF-8 string.
    Str(String),
    /// Raw binary data.
    Bytes(Vec<u8>),
    /// Homogeneous sequence; element order is semantically significant.
    Seq(Vec<Value>),
    /// Key/value mapping; entry order is not semantically significant.
    Map(Vec<(Value, Value)>),
    /// Enumeration as its underlying integer. Unknown members round-trip.
    Enum(i64),
    /// Object as ordered (field name, value) pairs.
    Record(Vec<(String, Value)>),
    /// Concrete variant of a tagged union, named by its registered type.
    Union {
        variant: String,
        value: Box<Value>,
    },
}

impl Value {
    /// Builds a record from `(name, value)` pairs.
    pub fn record<I, S>(fields: I) -> Value
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Value::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a string value.
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    /// Builds a union value holding a concrete variant.
    pub fn union(variant: impl Into<String>, value: Value) -> Value {
        Value::Union {
            variant: variant.into(),
            value: Box::new(value),
        }
    }

    /// Looks up a record field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(pairs) => pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}
