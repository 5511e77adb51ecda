// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide registry of type descriptors.
//!
//! Settings of the "type reference" kind name a type, e.g. `handler = i64` or
//! `codec = app::codec::Gzip`. Resolving such a name yields a shared [`TypeDescriptor`].
//! The built-in scalar conversions are always resolvable; applications register their own
//! descriptors with [`register`].
//!
//! Concurrency contract: the first writer for a name wins, and later registrations of the same
//! name are no-ops that return the existing descriptor. Two threads resolving the same unknown
//! built-in name concurrently may both build a descriptor, but only one is stored and both
//! callers receive that one.

use crate::domain::value::{ScalarType, ValueType};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

static REGISTRY: Lazy<DashMap<String, Arc<TypeDescriptor>>> = Lazy::new(DashMap::new);

/// Describes a type that a setting may refer to by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: String,
    value_type: Option<ValueType>,
}

impl TypeDescriptor {
    /// Creates a descriptor for an application-defined type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: None,
        }
    }

    /// Creates a descriptor that also names the conversion used for values of this type.
    pub fn with_value_type(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type: Some(value_type),
        }
    }

    /// The canonical name, used when the reference is serialized.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The conversion associated with this type, if any.
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Registers a descriptor under its name.
///
/// Returns the descriptor that is registered after the call: the given one if the name was free,
/// otherwise the one registered first.
pub fn register(descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
    let name = descriptor.name.clone();
    let entry = REGISTRY.entry(name).or_insert_with(|| Arc::new(descriptor));
    Arc::clone(entry.value())
}

/// Resolves a type name, caching built-in descriptors on first use.
///
/// Built-in names are the scalar type names (`i32`, `url`, …) and their array forms (`i32[]`).
pub fn resolve(name: &str) -> Option<Arc<TypeDescriptor>> {
    let name = name.trim();
    if let Some(found) = REGISTRY.get(name) {
        return Some(Arc::clone(found.value()));
    }

    let value_type = builtin(name)?;
    tracing::debug!("Caching built-in type descriptor '{}'", name);
    Some(register(TypeDescriptor::with_value_type(name, value_type)))
}

/// Returns `true` if the name resolves.
pub fn is_known(name: &str) -> bool {
    resolve(name).is_some()
}

fn builtin(name: &str) -> Option<ValueType> {
    match name.strip_suffix("[]") {
        Some(element) => ScalarType::from_name(element).map(ValueType::Array),
        None => ScalarType::from_name(name).map(ValueType::Scalar),
    }
}
