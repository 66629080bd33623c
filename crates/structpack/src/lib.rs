//! Compact schema-driven binary object codec.
//!
//! structpack converts structured in-memory values — records, nested
//! objects, sequences, maps, enumerations, version-tolerant records and
//! closed tagged unions — into a compact byte encoding and back, with exact
//! round-trip fidelity and defined forward/backward compatibility for
//! evolving schemas.
//!
//! The wire format in one breath: little-endian fixed-width primitives;
//! 7-bit continuation varints for lengths, counts and union discriminators;
//! an all-ones varint as the null sentinel; fixed objects as headerless
//! positional field concatenations; version-tolerant objects as a field
//! count plus length-prefixed fields; unions as a varint discriminator plus
//! the variant's own payload.
//!
//! Schemas are declared explicitly, registered once at startup in a
//! [`registry::Registry`], and never mutated afterwards, so concurrent
//! encode/decode calls share the registry without synchronization. Decoding
//! is defensive end to end: truncated, lying or hostile input yields a typed
//! [`DecodeError`], never a panic or an unbounded allocation.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod packable;
pub mod registry;
pub mod schema;
pub mod value;
pub mod varint;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecodeError, SchemaError};
pub use packable::{deserialize, serialize, Packable};
pub use registry::{static_registry, Registry, RegistryBuilder};
pub use schema::{EnumRepr, Field, Kind, Layout, ObjectSchema, UnionSchema, UnionVariant};
pub use value::Value;
