//! Schema-driven encoder.

use structpack_buffers::Writer;

use crate::error::SchemaError;
use crate::registry::Registry;
use crate::schema::{EnumRepr, Kind, Layout, ObjectSchema};
use crate::value::Value;
use crate::varint::{write_length, write_varint, NULL_SENTINEL};

/// Writes values into a byte buffer per their schema descriptor.
///
/// Encoding is all-or-nothing: on error no bytes are returned. A call never
/// fails for a value that structurally matches its schema, except when a
/// genuine length collides with the null sentinel
/// ([`SchemaError::LengthOverflow`]).
pub struct Encoder<'a> {
    writer: Writer,
    registry: &'a Registry,
}

impl<'a> Encoder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            writer: Writer::new(),
            registry,
        }
    }

    /// Encodes `value` per `kind` and returns the bytes.
    pub fn encode(&mut self, value: &Value, kind: &Kind) -> Result<Vec<u8>, SchemaError> {
        self.writer = Writer::new();
        self.write_value(value, kind)?;
        Ok(std::mem::take(&mut self.writer).into_bytes())
    }

    fn write_value(&mut self, value: &Value, kind: &Kind) -> Result<(), SchemaError> {
        match (kind, value) {
            (Kind::Bool, Value::Bool(b)) => {
                self.writer.bool(*b);
                Ok(())
            }
            (Kind::I32, Value::I32(n)) => {
                self.writer.i32(*n);
                Ok(())
            }
            (Kind::I64, Value::I64(n)) => {
                self.writer.i64(*n);
                Ok(())
            }
            (Kind::F64, Value::F64(f)) => {
                self.writer.f64(*f);
                Ok(())
            }
            (Kind::Str, Value::Str(s)) => {
                write_length(&mut self.writer, Some(s.len()))?;
                self.writer.utf8(s);
                Ok(())
            }
            (Kind::Str, Value::Null) => write_length(&mut self.writer, None),
            (Kind::Bytes, Value::Bytes(b)) => {
                write_length(&mut self.writer, Some(b.len()))?;
                self.writer.buf(b);
                Ok(())
            }
            (Kind::Bytes, Value::Null) => write_length(&mut self.writer, None),
            (Kind::Seq(element), Value::Seq(items)) => {
                write_length(&mut self.writer, Some(items.len()))?;
                for item in items {
                    self.write_value(item, element)?;
                }
                Ok(())
            }
            (Kind::Seq(_), Value::Null) => write_length(&mut self.writer, None),
            (Kind::Map(key, val), Value::Map(pairs)) => {
                write_length(&mut self.writer, Some(pairs.len()))?;
                for (k, v) in pairs {
                    self.write_value(k, key)?;
                    self.write_value(v, val)?;
                }
                Ok(())
            }
            (Kind::Map(_, _), Value::Null) => write_length(&mut self.writer, None),
            (Kind::Enum(repr), Value::Enum(n)) => self.write_enum(*repr, *n),
            (Kind::Object { name, nullable }, Value::Record(_)) => {
                if *nullable {
                    self.writer.u8(1);
                }
                let schema = self.registry.object(name)?;
                self.write_object(value, schema)
            }
            (
                Kind::Object {
                    nullable: true, ..
                },
                Value::Null,
            ) => {
                self.writer.u8(0);
                Ok(())
            }
            (Kind::Union { name }, Value::Union { variant, value }) => {
                let union = self.registry.union(name)?;
                let tag = self
                    .registry
                    .tag_for_variant(union, variant)
                    .ok_or_else(|| SchemaError::UnregisteredVariant(variant.clone()))?;
                write_varint(&mut self.writer, tag);
                let schema = self.registry.object(variant)?;
                self.write_object(value, schema)
            }
            (Kind::Union { .. }, Value::Null) => {
                write_varint(&mut self.writer, NULL_SENTINEL);
                Ok(())
            }
            (kind, _) => Err(SchemaError::ValueMismatch(kind_name(kind))),
        }
    }

    fn write_enum(&mut self, repr: EnumRepr, n: i64) -> Result<(), SchemaError> {
        match repr {
            EnumRepr::U8 => {
                let byte = u8::try_from(n).map_err(|_| SchemaError::ValueMismatch("u8 enum"))?;
                self.writer.u8(byte);
            }
            EnumRepr::I32 => {
                let v = i32::try_from(n).map_err(|_| SchemaError::ValueMismatch("i32 enum"))?;
                self.writer.i32(v);
            }
            EnumRepr::I64 => self.writer.i64(n),
        }
        Ok(())
    }

    fn write_object(&mut self, value: &Value, schema: &ObjectSchema) -> Result<(), SchemaError> {
        let Value::Record(pairs) = value else {
            return Err(SchemaError::ValueMismatch("record"));
        };
        match schema.layout {
            // Positional: field encodings back to back, no markers, no count.
            Layout::Fixed => {
                for field in &schema.fields {
                    let val = pairs
                        .iter()
                        .find(|(k, _)| k == &field.name)
                        .map(|(_, v)| v)
                        .ok_or_else(|| SchemaError::MissingField(field.name.clone()))?;
                    self.write_value(val, &field.kind)?;
                }
                Ok(())
            }
            // Count header, then every field wrapped in a byte-length prefix
            // so schema-skewed readers can skip what they do not know.
            Layout::VersionTolerant => {
                write_varint(&mut self.writer, schema.fields.len() as u64);
                for field in &schema.fields {
                    let val = pairs
                        .iter()
                        .find(|(k, _)| k == &field.name)
                        .map(|(_, v)| v)
                        .ok_or_else(|| SchemaError::MissingField(field.name.clone()))?;
                    let mut nested = Encoder::new(self.registry);
                    nested.write_value(val, &field.kind)?;
                    let payload = std::mem::take(&mut nested.writer).into_bytes();
                    write_length(&mut self.writer, Some(payload.len()))?;
                    self.writer.buf(&payload);
                }
                Ok(())
            }
        }
    }
}

fn kind_name(kind: &Kind) -> &'static str {
    match kind {
        Kind::Bool => "bool",
        Kind::I32 => "i32",
        Kind::I64 => "i64",
        Kind::F64 => "f64",
        Kind::Str => "string",
        Kind::Bytes => "bytes",
        Kind::Seq(_) => "sequence",
        Kind::Map(_, _) => "map",
        Kind::Enum(_) => "enum",
        Kind::Object { .. } => "object",
        Kind::Union { .. } => "union",
    }
}
