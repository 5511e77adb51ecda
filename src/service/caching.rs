// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caching decorator.
//!
//! Converted values are cached per resolved key. A cached value is only returned when the
//! request asks for exactly the type that was cached; a request for any other type evicts the
//! entry and fails with [`ConfigError::CacheTypeConflict`], so one key is never silently read as
//! two different types. Every mutation through the decorator evicts the keys it touches.
//!
//! Defaults are never cached. Writes that bypass the decorator (for example through a
//! reference to the inner store) are not seen by the cache.

use crate::domain::chain::{self, DecoratorKind};
use crate::domain::settings::fallback;
use crate::domain::{conversion, ConfigError, Entries, Result, Settings, Value, ValueType};
use dashmap::DashMap;
use std::sync::Arc;

/// Caches converted values by key.
pub struct Caching {
    inner: Arc<dyn Settings>,
    cache: DashMap<String, Value>,
}

impl Caching {
    /// Wraps `inner`.
    pub fn wrap(inner: Arc<dyn Settings>) -> Result<Arc<Self>> {
        chain::wrap(inner, DecoratorKind::Caching, |inner| Self {
            inner,
            cache: DashMap::new(),
        })
    }

    /// The number of cached conversions.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached conversion.
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }

    fn evict<'a>(&self, keys: impl IntoIterator<Item = &'a String>) {
        for key in keys {
            self.cache.remove(key);
        }
    }
}

impl Settings for Caching {
    fn kind(&self) -> Option<DecoratorKind> {
        Some(DecoratorKind::Caching)
    }

    fn inner(&self) -> Option<&dyn Settings> {
        Some(self.inner.as_ref())
    }

    fn put(&self, key: &str, values: Vec<String>) -> Result<Option<Vec<String>>> {
        self.evict([&key.to_string()]);
        self.inner.put(key, values)
    }

    fn put_all(&self, entries: Entries) -> Result<()> {
        self.evict(entries.keys());
        self.inner.put_all(entries)
    }

    fn remove(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.evict([&key.to_string()]);
        self.inner.remove(key)
    }

    fn clear(&self) -> Result<()> {
        self.invalidate_all();
        self.inner.clear()
    }

    fn lookup(&self, candidates: &[&str], target: ValueType, default: Option<Value>) -> Result<Value> {
        let Some(key) = self.inner.resolve_key(candidates)? else {
            return fallback(candidates, default);
        };

        let cached = self.cache.get(&key).map(|entry| entry.value().clone());
        if let Some(value) = cached {
            let cached_type = value.value_type();
            if cached_type == target {
                // Reads served from the cache still count as use
                self.inner.get(&key)?;
                return Ok(value);
            }
            self.evict([&key]);
            tracing::warn!(
                "Key '{}' was cached as {} but requested as {}; evicted",
                key,
                cached_type,
                target
            );
            return Err(ConfigError::CacheTypeConflict {
                key,
                cached: cached_type.to_string(),
                requested: target.to_string(),
            });
        }

        let raw = match self.inner.get(&key)? {
            Some(raw) if !raw.is_empty() || target.is_array() => raw,
            _ => return fallback(candidates, default),
        };
        let value = conversion::convert(&key, &raw, target)?;
        self.cache.insert(key, value.clone());
        Ok(value)
    }
}
