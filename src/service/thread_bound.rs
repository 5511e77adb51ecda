// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-bound decorator.
//!
//! Only threads bound to the decorator may use it. The thread that wraps the chain is bound
//! automatically; other threads bind explicitly, or inherit the binding by being started
//! through [`ThreadBound::spawn`].

use crate::domain::chain::{self, DecoratorKind};
use crate::domain::{ConfigError, Entries, Result, Settings, Value, ValueType};
use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle, ThreadId};

/// Restricts every operation to bound threads.
///
/// # Examples
///
/// ```rust
/// use hexsettings::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> Result<()> {
/// let settings = ThreadBound::wrap(Arc::new(ValueStore::new()))?;
/// settings.put("k", vec!["v".to_string()])?;
///
/// let handle = {
///     let settings = Arc::clone(&settings);
///     std::thread::spawn(move || settings.get("k"))
/// };
/// assert!(handle.join().unwrap().is_err());
/// # Ok(())
/// # }
/// ```
pub struct ThreadBound {
    inner: Arc<dyn Settings>,
    bound: RwLock<HashSet<ThreadId>>,
}

impl ThreadBound {
    /// Wraps `inner` and binds the calling thread.
    pub fn wrap(inner: Arc<dyn Settings>) -> Result<Arc<Self>> {
        chain::wrap(inner, DecoratorKind::ThreadBound, |inner| Self {
            inner,
            bound: RwLock::new(HashSet::from([thread::current().id()])),
        })
    }

    /// Binds the calling thread.
    pub fn bind(&self) {
        self.bound
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(thread::current().id());
    }

    /// Unbinds the calling thread, returning `true` if it was bound.
    pub fn unbind(&self) -> bool {
        self.bound
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&thread::current().id())
    }

    /// Returns `true` if the calling thread is bound.
    pub fn is_bound(&self) -> bool {
        self.bound
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&thread::current().id())
    }

    /// Starts a thread that inherits the calling thread's binding for its lifetime.
    ///
    /// Fails with [`ConfigError::ThreadAccessViolation`] if the calling thread is not bound.
    pub fn spawn<F, R>(self: &Arc<Self>, f: F) -> Result<JoinHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.check("spawn")?;
        let this = Arc::clone(self);
        Ok(thread::spawn(move || {
            this.bind();
            let result = f();
            this.unbind();
            result
        }))
    }

    fn check(&self, operation: &str) -> Result<&dyn Settings> {
        if self.is_bound() {
            return Ok(self.inner.as_ref());
        }
        let current = thread::current();
        let name = current
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?}", current.id()));
        tracing::warn!("Unbound thread '{}' attempted '{}'", name, operation);
        Err(ConfigError::ThreadAccessViolation {
            thread: name,
            operation: operation.to_string(),
        })
    }
}

impl Settings for ThreadBound {
    fn kind(&self) -> Option<DecoratorKind> {
        Some(DecoratorKind::ThreadBound)
    }

    fn inner(&self) -> Option<&dyn Settings> {
        Some(self.inner.as_ref())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.check("get")?.get(key)
    }

    fn peek(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.check("peek")?.peek(key)
    }

    fn put(&self, key: &str, values: Vec<String>) -> Result<Option<Vec<String>>> {
        self.check("put")?.put(key, values)
    }

    fn put_all(&self, entries: Entries) -> Result<()> {
        self.check("put_all")?.put_all(entries)
    }

    fn remove(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.check("remove")?.remove(key)
    }

    fn clear(&self) -> Result<()> {
        self.check("clear")?.clear()
    }

    fn contains_key(&self, key: &str) -> Result<bool> {
        self.check("contains_key")?.contains_key(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.check("keys")?.keys()
    }

    fn size(&self) -> Result<usize> {
        self.check("size")?.size()
    }

    fn snapshot(&self) -> Result<Entries> {
        self.check("snapshot")?.snapshot()
    }

    fn resolve_key(&self, candidates: &[&str]) -> Result<Option<String>> {
        self.check("resolve_key")?.resolve_key(candidates)
    }

    fn unused_keys(&self) -> Result<BTreeSet<String>> {
        self.check("unused_keys")?.unused_keys()
    }

    fn not_present_keys(&self) -> Result<BTreeSet<String>> {
        self.check("not_present_keys")?.not_present_keys()
    }

    fn lookup(&self, candidates: &[&str], target: ValueType, default: Option<Value>) -> Result<Value> {
        self.check("lookup")?.lookup(candidates, target, default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SettingsExt;
    use crate::service::ValueStore;

    fn bound_store() -> Arc<ThreadBound> {
        let settings = ThreadBound::wrap(Arc::new(ValueStore::new())).unwrap();
        settings.put("n", vec!["1".to_string()]).unwrap();
        settings
    }

    #[test]
    fn test_creating_thread_is_bound() {
        let settings = bound_store();
        assert!(settings.is_bound());
        assert_eq!(settings.get_i32(None, &["n"]).unwrap(), 1);
    }

    #[test]
    fn test_foreign_thread_rejected() {
        let settings = bound_store();
        let other = Arc::clone(&settings);
        let result = thread::Builder::new()
            .name("intruder".to_string())
            .spawn(move || other.get_i32(Some(0), &["n"]))
            .unwrap()
            .join()
            .unwrap();
        match result {
            Err(ConfigError::ThreadAccessViolation { thread, .. }) => {
                assert_eq!(thread, "intruder")
            }
            other => panic!("expected thread access violation, got {other:?}"),
        }
    }

    #[test]
    fn test_spawned_thread_inherits_binding() {
        let settings = bound_store();
        let child = Arc::clone(&settings);
        let value = settings
            .spawn(move || child.get_i32(None, &["n"]))
            .unwrap()
            .join()
            .unwrap()
            .unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn test_explicit_bind_and_unbind() {
        let settings = bound_store();
        let other = Arc::clone(&settings);
        thread::spawn(move || {
            assert!(other.size().is_err());
            other.bind();
            assert_eq!(other.size().unwrap(), 1);
            assert!(other.unbind());
            assert!(other.size().is_err());
        })
        .join()
        .unwrap();
    }
}
