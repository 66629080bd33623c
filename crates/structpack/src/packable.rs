//! Typed facade: concrete types declare their schema once and pass through
//! the dynamic value model.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{DecodeError, SchemaError};
use crate::registry::Registry;
use crate::schema::Kind;
use crate::value::Value;

/// A type with a declared wire schema.
///
/// `registry()` is expected to hand out one registry built once per process
/// (see [`crate::registry::static_registry`]); `root()` names the kind the
/// type occupies at the top level, typically an object or union reference.
pub trait Packable: Sized {
    /// The process-wide registry holding this type's schema graph.
    fn registry() -> Result<&'static Registry, SchemaError>;
    /// The kind of a top-level value of this type.
    fn root() -> Kind;
    /// Converts into the dynamic value model.
    fn to_value(&self) -> Value;
    /// Converts back from the dynamic value model.
    fn from_value(value: Value) -> Result<Self, DecodeError>;
}

/// Serializes a value into its compact byte encoding.
///
/// Fails only with [`SchemaError`] variants and never produces partial
/// output.
pub fn serialize<T: Packable>(value: &T) -> Result<Vec<u8>, SchemaError> {
    let registry = T::registry()?;
    let mut encoder = Encoder::new(registry);
    encoder.encode(&value.to_value(), &T::root())
}

/// Deserializes a value from bytes.
///
/// Fails with [`DecodeError`] variants and never returns a partially
/// populated value.
pub fn deserialize<T: Packable>(data: &[u8]) -> Result<T, DecodeError> {
    let registry = T::registry()?;
    let decoder = Decoder::new(registry);
    let value = decoder.decode(data, &T::root())?;
    T::from_value(value)
}
