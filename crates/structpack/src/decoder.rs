//! Defensive schema-driven decoder.
//!
//! Every failure path returns a typed [`DecodeError`]; malformed or hostile
//! input never panics, never reads out of bounds, and never triggers an
//! allocation the remaining buffer could not possibly back.

use structpack_buffers::{BufferError, Reader};

use crate::error::DecodeError;
use crate::registry::Registry;
use crate::schema::{EnumRepr, Kind, Layout, ObjectSchema};
use crate::value::Value;
use crate::varint::{read_length, read_varint, NULL_SENTINEL};

/// Nesting ceiling for one decode call. Self-referential schemas make the
/// recursion depth a function of the input bytes, so it has to be capped.
const MAX_DEPTH: usize = 1000;

/// Reconstructs values from bytes per a schema descriptor.
///
/// Duplicate map keys on the wire resolve last-write-wins: the final pair
/// with a given key is kept, so decoding stays total on semantically
/// resolvable input.
///
/// Values nested deeper than 1000 levels fail with
/// [`DecodeError::DepthLimitExceeded`] instead of exhausting the stack.
pub struct Decoder<'a> {
    registry: &'a Registry,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Decodes one value of `kind` from the whole of `data`.
    ///
    /// The buffer must be fully consumed; leftover bytes fail with
    /// [`DecodeError::TrailingData`].
    pub fn decode(&self, data: &[u8], kind: &Kind) -> Result<Value, DecodeError> {
        let mut reader = Reader::new(data);
        let value = self.read_value(&mut reader, kind, 0)?;
        match reader.remaining() {
            0 => Ok(value),
            n => Err(DecodeError::TrailingData(n)),
        }
    }

    fn read_value(
        &self,
        reader: &mut Reader,
        kind: &Kind,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::DepthLimitExceeded);
        }
        match kind {
            Kind::Bool => Ok(Value::Bool(reader.u8()? != 0)),
            Kind::I32 => Ok(Value::I32(reader.i32()?)),
            Kind::I64 => Ok(Value::I64(reader.i64()?)),
            Kind::F64 => Ok(Value::F64(reader.f64()?)),
            Kind::Str => match read_length(reader)? {
                None => Ok(Value::Null),
                Some(len) => {
                    let len = checked_len(len)?;
                    Ok(Value::Str(reader.utf8(len)?.to_string()))
                }
            },
            Kind::Bytes => match read_length(reader)? {
                None => Ok(Value::Null),
                Some(len) => {
                    let len = checked_len(len)?;
                    Ok(Value::Bytes(reader.buf(len)?.to_vec()))
                }
            },
            Kind::Seq(element) => match read_length(reader)? {
                None => Ok(Value::Null),
                Some(count) => {
                    let count = self.checked_count(count, element, reader)?;
                    let mut items = Vec::with_capacity(count);
                    for _ in 0..count {
                        items.push(self.read_value(reader, element, depth + 1)?);
                    }
                    Ok(Value::Seq(items))
                }
            },
            Kind::Map(key, val) => match read_length(reader)? {
                None => Ok(Value::Null),
                Some(count) => {
                    let min = self
                        .registry
                        .min_encoded_size(key)
                        .saturating_add(self.registry.min_encoded_size(val));
                    let count = checked_len(count)?;
                    if min > 0 && count > reader.remaining() / min {
                        return Err(DecodeError::InvalidLength);
                    }
                    let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(count);
                    for _ in 0..count {
                        let k = self.read_value(reader, key, depth + 1)?;
                        let v = self.read_value(reader, val, depth + 1)?;
                        match pairs.iter_mut().find(|(pk, _)| *pk == k) {
                            Some(slot) => slot.1 = v,
                            None => pairs.push((k, v)),
                        }
                    }
                    Ok(Value::Map(pairs))
                }
            },
            Kind::Enum(repr) => {
                let n = match repr {
                    EnumRepr::U8 => reader.u8()? as i64,
                    EnumRepr::I32 => reader.i32()? as i64,
                    EnumRepr::I64 => reader.i64()?,
                };
                Ok(Value::Enum(n))
            }
            Kind::Object { name, nullable } => {
                if *nullable {
                    match reader.u8()? {
                        0 => return Ok(Value::Null),
                        1 => {}
                        _ => return Err(DecodeError::TypeMismatch("object presence byte")),
                    }
                }
                let schema = resolve_object(self.registry, name)?;
                self.read_object(reader, schema, depth)
            }
            Kind::Union { name } => {
                let tag = read_varint(reader)?;
                if tag == NULL_SENTINEL {
                    return Ok(Value::Null);
                }
                let union = self
                    .registry
                    .union(name)
                    .map_err(|_| DecodeError::TypeMismatch("union is not registered"))?;
                let variant = self
                    .registry
                    .variant_for_tag(union, tag)
                    .ok_or(DecodeError::UnknownUnionTag(tag))?;
                let schema = resolve_object(self.registry, variant)?;
                let value = self.read_object(reader, schema, depth)?;
                Ok(Value::Union {
                    variant: variant.to_string(),
                    value: Box::new(value),
                })
            }
        }
    }

    fn read_object(
        &self,
        reader: &mut Reader,
        schema: &ObjectSchema,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        match schema.layout {
            Layout::Fixed => {
                let mut pairs = Vec::with_capacity(schema.fields.len());
                for field in &schema.fields {
                    let value = self.read_value(reader, &field.kind, depth + 1)?;
                    pairs.push((field.name.clone(), value));
                }
                Ok(Value::Record(pairs))
            }
            Layout::VersionTolerant => {
                let count = read_varint(reader)?;
                if count == NULL_SENTINEL {
                    return Err(DecodeError::InvalidLength);
                }
                let mut pairs = Vec::with_capacity(schema.fields.len());
                let known = schema.fields.len() as u64;
                for i in 0..count {
                    let len = match read_length(reader)? {
                        Some(len) => checked_len(len)?,
                        None => return Err(DecodeError::InvalidLength),
                    };
                    if i < known {
                        let field = &schema.fields[i as usize];
                        let mut window = reader.window(len).map_err(bad_window)?;
                        let value = self.read_value(&mut window, &field.kind, depth + 1)?;
                        // The field must fill its recorded length exactly;
                        // anything else means the prefix lied.
                        if window.remaining() != 0 {
                            return Err(DecodeError::InvalidLength);
                        }
                        pairs.push((field.name.clone(), value));
                    } else {
                        // Newer data, older schema: consume by recorded
                        // length only, without interpretation.
                        reader.skip(len).map_err(bad_window)?;
                    }
                }
                // Older data, newer schema: missing trailing fields take
                // their kind's default.
                for field in schema.fields.iter().skip(count as usize) {
                    pairs.push((field.name.clone(), self.default_value(&field.kind, depth + 1)?));
                }
                Ok(Value::Record(pairs))
            }
        }
    }

    /// The per-kind default used for missing version-tolerant fields:
    /// zero/false for scalars, empty for strings, bytes, sequences and maps,
    /// null for nullable objects and unions, an all-defaults record for
    /// non-nullable object references.
    fn default_value(&self, kind: &Kind, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::DepthLimitExceeded);
        }
        Ok(match kind {
            Kind::Bool => Value::Bool(false),
            Kind::I32 => Value::I32(0),
            Kind::I64 => Value::I64(0),
            Kind::F64 => Value::F64(0.0),
            Kind::Str => Value::Str(String::new()),
            Kind::Bytes => Value::Bytes(Vec::new()),
            Kind::Seq(_) => Value::Seq(Vec::new()),
            Kind::Map(_, _) => Value::Map(Vec::new()),
            Kind::Enum(_) => Value::Enum(0),
            Kind::Object { nullable: true, .. } | Kind::Union { .. } => Value::Null,
            Kind::Object {
                name,
                nullable: false,
            } => {
                let schema = resolve_object(self.registry, name)?;
                let mut pairs = Vec::with_capacity(schema.fields.len());
                for field in &schema.fields {
                    pairs.push((field.name.clone(), self.default_value(&field.kind, depth + 1)?));
                }
                Value::Record(pairs)
            }
        })
    }

    /// Rejects element counts that cannot possibly fit the remaining buffer,
    /// before any allocation happens.
    fn checked_count(
        &self,
        count: u64,
        element: &Kind,
        reader: &Reader,
    ) -> Result<usize, DecodeError> {
        let count = checked_len(count)?;
        let min = self.registry.min_encoded_size(element);
        if min > 0 && count > reader.remaining() / min {
            return Err(DecodeError::InvalidLength);
        }
        Ok(count)
    }
}

fn checked_len(len: u64) -> Result<usize, DecodeError> {
    usize::try_from(len).map_err(|_| DecodeError::InvalidLength)
}

fn resolve_object<'r>(
    registry: &'r Registry,
    name: &str,
) -> Result<&'r ObjectSchema, DecodeError> {
    registry
        .object(name)
        .map_err(|_| DecodeError::TypeMismatch("object type is not registered"))
}

/// A length prefix that points past the remaining buffer is a lying prefix,
/// not a plain truncation.
fn bad_window(err: BufferError) -> DecodeError {
    match err {
        BufferError::EndOfBuffer => DecodeError::InvalidLength,
        other => other.into(),
    }
}
