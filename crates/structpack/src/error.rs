//! Error taxonomy for schema construction, encoding and decoding.

use structpack_buffers::BufferError;

/// Error raised while building a schema registry or encoding a value.
///
/// Encoding never produces partial output: when any variant below is
/// returned, no bytes are handed back to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// The type graph contains a cycle that only runs through non-nullable
    /// object references, so no finite encoding exists. Carries the cycle
    /// path for diagnostics.
    #[error("unsupported shape: unbreakable cycle through {0}")]
    UnsupportedShape(String),
    /// A length or count collides with the reserved null sentinel.
    #[error("length overflows the wire representation")]
    LengthOverflow,
    /// A union value's concrete variant has no discriminator entry.
    #[error("union variant is not registered: {0}")]
    UnregisteredVariant(String),
    /// A schema references a type name the registry does not know.
    #[error("unknown type reference: {0}")]
    UnknownType(String),
    /// Two registrations share one type name.
    #[error("duplicate type name: {0}")]
    DuplicateName(String),
    /// Two variants of one union share a discriminator.
    #[error("duplicate union discriminator: {0}")]
    DuplicateDiscriminator(u64),
    /// A record value is missing a field its schema declares.
    #[error("required field missing: {0}")]
    MissingField(String),
    /// The value's shape does not match its schema.
    #[error("value does not match schema: expected {0}")]
    ValueMismatch(&'static str),
}

/// Error raised while decoding. Decoding never panics, never reads out of
/// bounds and never returns a partially populated value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer ended before the schema was satisfied.
    #[error("unexpected end of data")]
    UnexpectedEndOfData,
    /// A length, count or field boundary is inconsistent with the buffer.
    #[error("invalid length")]
    InvalidLength,
    /// A union discriminator with no registered variant.
    #[error("unknown union tag: {0}")]
    UnknownUnionTag(u64),
    /// The registry resolved a reference to a schema incompatible with what
    /// the wire position requires.
    #[error("type mismatch: {0}")]
    TypeMismatch(&'static str),
    /// A varint ran past its maximum width or overflowed 64 bits.
    #[error("malformed varint")]
    InvalidVarint,
    /// String content is not valid UTF-8.
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    /// Bytes left over after a complete top-level value.
    #[error("{0} trailing bytes after value")]
    TrailingData(usize),
    /// Nesting ran past the decoder's recursion limit.
    #[error("nesting exceeds the decoder depth limit")]
    DepthLimitExceeded,
    /// Registry construction failed before decoding could start.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => DecodeError::UnexpectedEndOfData,
            BufferError::InvalidUtf8 => DecodeError::InvalidUtf8,
        }
    }
}
