// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only decorator.

use crate::domain::chain::{self, DecoratorKind};
use crate::domain::{ConfigError, Entries, Result, Settings};
use std::sync::Arc;

/// Rejects every mutation with [`ConfigError::ReadOnlyViolation`]; reads pass through.
pub struct ReadOnly {
    inner: Arc<dyn Settings>,
}

impl ReadOnly {
    /// Wraps `inner`.
    pub fn wrap(inner: Arc<dyn Settings>) -> Result<Arc<Self>> {
        chain::wrap(inner, DecoratorKind::ReadOnly, |inner| Self { inner })
    }

    fn reject<T>(operation: &str) -> Result<T> {
        tracing::debug!("Rejected '{}' on read-only settings", operation);
        Err(ConfigError::ReadOnlyViolation {
            operation: operation.to_string(),
        })
    }
}

impl Settings for ReadOnly {
    fn kind(&self) -> Option<DecoratorKind> {
        Some(DecoratorKind::ReadOnly)
    }

    fn inner(&self) -> Option<&dyn Settings> {
        Some(self.inner.as_ref())
    }

    fn put(&self, _key: &str, _values: Vec<String>) -> Result<Option<Vec<String>>> {
        Self::reject("put")
    }

    fn put_all(&self, _entries: Entries) -> Result<()> {
        Self::reject("put_all")
    }

    fn remove(&self, _key: &str) -> Result<Option<Vec<String>>> {
        Self::reject("remove")
    }

    fn clear(&self) -> Result<()> {
        Self::reject("clear")
    }
}
