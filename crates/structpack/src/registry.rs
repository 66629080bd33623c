//! Process-wide schema registry: type name → object schema, union name →
//! discriminator table.
//!
//! A registry is built once through [`RegistryBuilder`], validated, and never
//! mutated afterwards, so concurrent encode/decode calls can share a
//! `&Registry` without synchronization.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::SchemaError;
use crate::schema::{Kind, Layout, ObjectSchema, UnionSchema};

/// Accumulates schema declarations before validation.
#[derive(Default)]
pub struct RegistryBuilder {
    objects: Vec<ObjectSchema>,
    unions: Vec<UnionSchema>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object schema.
    pub fn object(mut self, schema: ObjectSchema) -> Self {
        self.objects.push(schema);
        self
    }

    /// Registers a union's discriminator table.
    pub fn union(mut self, schema: UnionSchema) -> Self {
        self.unions.push(schema);
        self
    }

    /// Validates the declarations and freezes them into a [`Registry`].
    ///
    /// Checks, in order: unique type names, resolvable references, unique
    /// discriminators per union, and absence of cycles that run exclusively
    /// through non-nullable object references.
    pub fn build(self) -> Result<Registry, SchemaError> {
        let mut objects = HashMap::new();
        let mut unions = HashMap::new();
        for schema in self.objects {
            let name = schema.name.clone();
            if objects.insert(name.clone(), schema).is_some() {
                return Err(SchemaError::DuplicateName(name));
            }
        }
        for schema in self.unions {
            let name = schema.name.clone();
            if objects.contains_key(&name) || unions.insert(name.clone(), schema).is_some() {
                return Err(SchemaError::DuplicateName(name));
            }
        }

        let registry = Registry { objects, unions };
        registry.check_references()?;
        registry.check_cycles()?;
        Ok(registry)
    }
}

/// Immutable mapping from type identities to schema descriptors and, for
/// unions, discriminator↔variant tables.
#[derive(Debug)]
pub struct Registry {
    objects: HashMap<String, ObjectSchema>,
    unions: HashMap<String, UnionSchema>,
}

impl Registry {
    /// Resolves an object schema by name.
    pub fn object(&self, name: &str) -> Result<&ObjectSchema, SchemaError> {
        self.objects
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    /// Resolves a union's discriminator table by name.
    pub fn union(&self, name: &str) -> Result<&UnionSchema, SchemaError> {
        self.unions
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    /// Union dispatch, decode side: the variant type a discriminator selects.
    pub fn variant_for_tag<'u>(&self, union: &'u UnionSchema, tag: u64) -> Option<&'u str> {
        union
            .variants
            .iter()
            .find(|v| v.tag == tag)
            .map(|v| v.variant.as_str())
    }

    /// Union dispatch, encode side: the discriminator registered for a
    /// concrete variant type.
    pub fn tag_for_variant(&self, union: &UnionSchema, variant: &str) -> Option<u64> {
        union
            .variants
            .iter()
            .find(|v| v.variant == variant)
            .map(|v| v.tag)
    }

    /// Smallest number of bytes any value of `kind` can occupy on the wire.
    ///
    /// Used by the decoder to reject element counts that cannot possibly fit
    /// the remaining buffer before allocating for them.
    pub fn min_encoded_size(&self, kind: &Kind) -> usize {
        match kind {
            Kind::Bool => 1,
            Kind::I32 => 4,
            Kind::I64 => 8,
            Kind::F64 => 8,
            // One varint byte for the length/count or null sentinel start.
            Kind::Str | Kind::Bytes | Kind::Seq(_) | Kind::Map(_, _) => 1,
            Kind::Enum(repr) => repr.width(),
            Kind::Union { .. } => 1,
            Kind::Object { nullable: true, .. } => 1,
            Kind::Object {
                name,
                nullable: false,
            } => match self.objects.get(name) {
                Some(schema) if schema.layout == Layout::Fixed => schema
                    .fields
                    .iter()
                    .map(|f| self.min_encoded_size(&f.kind))
                    .sum::<usize>(),
                // Version-tolerant payloads start with a count varint; an
                // old encoder may legitimately have written count 0.
                Some(_) => 1,
                None => 1,
            },
        }
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        for schema in self.objects.values() {
            for field in &schema.fields {
                self.check_kind(&field.kind)?;
            }
        }
        for union in self.unions.values() {
            let mut seen = Vec::with_capacity(union.variants.len());
            for variant in &union.variants {
                if seen.contains(&variant.tag) {
                    return Err(SchemaError::DuplicateDiscriminator(variant.tag));
                }
                seen.push(variant.tag);
                if !self.objects.contains_key(&variant.variant) {
                    return Err(SchemaError::UnknownType(variant.variant.clone()));
                }
            }
        }
        Ok(())
    }

    fn check_kind(&self, kind: &Kind) -> Result<(), SchemaError> {
        match kind {
            Kind::Seq(element) => self.check_kind(element),
            Kind::Map(key, value) => {
                self.check_kind(key)?;
                self.check_kind(value)
            }
            Kind::Object { name, .. } => {
                if self.objects.contains_key(name) {
                    Ok(())
                } else {
                    Err(SchemaError::UnknownType(name.clone()))
                }
            }
            Kind::Union { name } => {
                if self.unions.contains_key(name) {
                    Ok(())
                } else {
                    Err(SchemaError::UnknownType(name.clone()))
                }
            }
            _ => Ok(()),
        }
    }

    /// Rejects type graphs with no finite encoding: a cycle is fatal only if
    /// every edge on it is a non-nullable object reference. Edges through
    /// nullable objects, unions, sequences, maps, strings and bytes can all
    /// be absent or empty and therefore break the cycle.
    fn check_cycles(&self) -> Result<(), SchemaError> {
        let mut done: Vec<&str> = Vec::new();
        for name in self.objects.keys() {
            if !done.contains(&name.as_str()) {
                let mut stack = Vec::new();
                self.visit(name, &mut stack, &mut done)?;
            }
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        stack: &mut Vec<&'a str>,
        done: &mut Vec<&'a str>,
    ) -> Result<(), SchemaError> {
        if let Some(start) = stack.iter().position(|n| *n == name) {
            let mut path: Vec<&str> = stack[start..].to_vec();
            path.push(name);
            return Err(SchemaError::UnsupportedShape(path.join(" -> ")));
        }
        if done.contains(&name) {
            return Ok(());
        }
        stack.push(name);
        if let Some(schema) = self.objects.get(name) {
            for field in &schema.fields {
                // Only a directly required object reference is a hard edge.
                if let Kind::Object {
                    name: target,
                    nullable: false,
                } = &field.kind
                {
                    self.visit(target, stack, done)?;
                }
            }
        }
        stack.pop();
        done.push(name);
        Ok(())
    }
}

/// Caches a built registry in a `'static` cell so per-type descriptors are
/// constructed exactly once per process.
///
/// ```
/// use std::sync::OnceLock;
/// use structpack::registry::{static_registry, Registry, RegistryBuilder};
/// use structpack::error::SchemaError;
/// use structpack::schema::{Field, Kind, ObjectSchema};
///
/// fn registry() -> Result<&'static Registry, SchemaError> {
///     static CELL: OnceLock<Result<Registry, SchemaError>> = OnceLock::new();
///     static_registry(&CELL, || {
///         RegistryBuilder::new()
///             .object(ObjectSchema::fixed(
///                 "Point",
///                 vec![Field::new("x", Kind::I32), Field::new("y", Kind::I32)],
///             ))
///             .build()
///     })
/// }
///
/// assert!(registry().is_ok());
/// ```
pub fn static_registry(
    cell: &'static OnceLock<Result<Registry, SchemaError>>,
    build: fn() -> Result<Registry, SchemaError>,
) -> Result<&'static Registry, SchemaError> {
    cell.get_or_init(build).as_ref().map_err(Clone::clone)
}
