// SPDX-License-Identifier: MIT OR Apache-2.0

//! The settings contract shared by the base store and every decorator.
//!
//! [`Settings`] is the single interface of the crate: a key → multi-value string map with audit
//! views and typed lookups. A base store implements every primitive operation. A decorator only
//! implements [`Settings::kind`] and [`Settings::inner`] plus the operations it intercepts;
//! every other primitive falls back to the provided implementation, which forwards unchanged to
//! the inner node.
//!
//! Typed access is layered on top: [`Settings::lookup`] resolves candidate keys, applies the
//! default and converts, and [`SettingsExt`] adds generic sugar such as
//! [`get_or`](SettingsExt::get_or) for any `Settings` implementation.

use crate::domain::audit::AuditReport;
use crate::domain::chain::{ChainRegistry, DecoratorKind};
use crate::domain::conversion;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::value::{Setting, Value, ValueType};
use std::collections::{BTreeMap, BTreeSet};

/// An ordered set of entries: key → raw values.
pub type Entries = BTreeMap<String, Vec<String>>;

/// Returns the inner node a forwarding operation is delegated to.
fn delegate<'a, S: Settings + ?Sized>(node: &'a S, operation: &str) -> Result<&'a dyn Settings> {
    node.inner().ok_or_else(|| ConfigError::InvalidArgument {
        message: format!("settings node has no implementation of '{operation}' and no inner node"),
    })
}

/// Applies the default-value policy once no candidate key resolved.
pub(crate) fn fallback<T>(candidates: &[&str], default: Option<T>) -> Result<T> {
    match default {
        Some(value) => {
            tracing::debug!("No value for [{}], using default", candidates.join(", "));
            Ok(value)
        }
        None => Err(ConfigError::NoValue {
            keys: candidates.iter().map(|k| k.to_string()).collect(),
        }),
    }
}

/// A multi-valued settings store.
///
/// Operations take `&self`; implementations use interior locking so a chain can be shared as
/// `Arc<dyn Settings>`. Locking makes each operation memory-safe but does not make sequences of
/// operations atomic.
///
/// # Examples
///
/// ```rust
/// use hexsettings::prelude::*;
///
/// # fn main() -> Result<()> {
/// let store = ValueStore::new();
/// store.put("alpha", vec!["200".to_string()])?;
///
/// assert_eq!(store.get_i32(Some(100), &["alpha"])?, 200);
/// assert_eq!(store.get_i32(Some(100), &["missing"])?, 100);
/// assert!(store.not_present_keys()?.contains("missing"));
/// # Ok(())
/// # }
/// ```
pub trait Settings: Send + Sync {
    /// The decorator kind of this node, or `None` for a plain base store.
    fn kind(&self) -> Option<DecoratorKind> {
        None
    }

    /// The wrapped node, or `None` at the base of the chain.
    fn inner(&self) -> Option<&dyn Settings> {
        None
    }

    /// The kind registry kept at the base of the chain.
    fn registry(&self) -> Option<&ChainRegistry> {
        self.inner().and_then(|inner| inner.registry())
    }

    /// The identifier of the underlying store, if it has one.
    fn id(&self) -> Option<String> {
        self.inner().and_then(|inner| inner.id())
    }

    /// Returns the raw values of `key` and marks the key as used.
    fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        delegate(self, "get")?.get(key)
    }

    /// Returns the raw values of `key` without recording any usage.
    fn peek(&self, key: &str) -> Result<Option<Vec<String>>> {
        delegate(self, "peek")?.peek(key)
    }

    /// Stores `values` under `key`, returning the previous values.
    fn put(&self, key: &str, values: Vec<String>) -> Result<Option<Vec<String>>> {
        delegate(self, "put")?.put(key, values)
    }

    /// Stores every entry, overwriting existing keys.
    fn put_all(&self, entries: Entries) -> Result<()> {
        delegate(self, "put_all")?.put_all(entries)
    }

    /// Removes `key`, returning its previous values.
    fn remove(&self, key: &str) -> Result<Option<Vec<String>>> {
        delegate(self, "remove")?.remove(key)
    }

    /// Removes every entry.
    fn clear(&self) -> Result<()> {
        delegate(self, "clear")?.clear()
    }

    /// Returns `true` if `key` is present. Does not record usage.
    fn contains_key(&self, key: &str) -> Result<bool> {
        delegate(self, "contains_key")?.contains_key(key)
    }

    /// All present keys in order.
    fn keys(&self) -> Result<Vec<String>> {
        delegate(self, "keys")?.keys()
    }

    /// The number of present keys.
    fn size(&self) -> Result<usize> {
        delegate(self, "size")?.size()
    }

    /// A copy of every entry. Does not record usage.
    fn snapshot(&self) -> Result<Entries> {
        delegate(self, "snapshot")?.snapshot()
    }

    /// Returns the first candidate key that is present.
    ///
    /// Every candidate tested and found absent is recorded as not present. Fails with
    /// [`ConfigError::InvalidArgument`] when no candidate is given.
    fn resolve_key(&self, candidates: &[&str]) -> Result<Option<String>> {
        delegate(self, "resolve_key")?.resolve_key(candidates)
    }

    /// Keys that are present but were never read.
    fn unused_keys(&self) -> Result<BTreeSet<String>> {
        delegate(self, "unused_keys")?.unused_keys()
    }

    /// Keys that were looked up through [`resolve_key`](Settings::resolve_key) and were absent.
    fn not_present_keys(&self) -> Result<BTreeSet<String>> {
        delegate(self, "not_present_keys")?.not_present_keys()
    }

    /// Returns `true` if no key is present.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// Resolves the candidates and returns the raw values, or `default` when none is present.
    ///
    /// A present key with zero values counts as absent. Fails with [`ConfigError::NoValue`]
    /// when nothing resolves and no default is given.
    fn require_or_default(
        &self,
        candidates: &[&str],
        default: Option<Vec<String>>,
    ) -> Result<Vec<String>> {
        if let Some(key) = self.resolve_key(candidates)? {
            if let Some(values) = self.get(&key)?.filter(|v| !v.is_empty()) {
                return Ok(values);
            }
        }
        fallback(candidates, default)
    }

    /// Resolves the candidates and converts the raw values to `target`.
    ///
    /// Decorators forward to the inner node, and the base converts with [`convert_lookup`].
    /// A decorator that changes how reads behave overrides this method as well as `get`.
    fn lookup(&self, candidates: &[&str], target: ValueType, default: Option<Value>) -> Result<Value> {
        match self.inner() {
            Some(inner) => inner.lookup(candidates, target, default),
            None => convert_lookup(self, candidates, target, default),
        }
    }
}

/// Resolves `candidates` on `settings` and converts the first present entry to `target`.
///
/// The default is returned as-is when nothing resolves. An entry with no values is an empty
/// array for array targets and counts as absent for scalar targets. Scalar targets fail with
/// [`ConfigError::TooManyValues`] on multi-valued entries.
pub fn convert_lookup<S: Settings + ?Sized>(
    settings: &S,
    candidates: &[&str],
    target: ValueType,
    default: Option<Value>,
) -> Result<Value> {
    let Some(key) = settings.resolve_key(candidates)? else {
        return fallback(candidates, default);
    };
    match settings.get(&key)? {
        Some(raw) if !raw.is_empty() || target.is_array() => {
            conversion::convert(&key, &raw, target)
        }
        _ => fallback(candidates, default),
    }
}

/// Typed convenience accessors for every [`Settings`] implementation.
pub trait SettingsExt: Settings {
    /// Returns the value of the first present key, failing with [`ConfigError::NoValue`] when
    /// none is present.
    fn get_as<T: Setting>(&self, candidates: &[&str]) -> Result<T> {
        self.lookup(candidates, T::value_type(), None)?.into_setting()
    }

    /// Returns the value of the first present key, or `default`.
    fn get_or<T: Setting>(&self, default: T, candidates: &[&str]) -> Result<T> {
        self.lookup(candidates, T::value_type(), Some(default.into_value()))?
            .into_setting()
    }

    /// Returns the value of the first present key, or `None`.
    fn get_opt<T: Setting>(&self, candidates: &[&str]) -> Result<Option<T>> {
        match self.get_as(candidates) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::NoValue { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// String accessor; `None` as default makes the key required.
    fn get_string(&self, default: Option<&str>, candidates: &[&str]) -> Result<String> {
        match default {
            Some(d) => self.get_or(d.to_string(), candidates),
            None => self.get_as(candidates),
        }
    }

    /// Boolean accessor; `None` as default makes the key required.
    fn get_bool(&self, default: Option<bool>, candidates: &[&str]) -> Result<bool> {
        typed(self, default, candidates)
    }

    /// 32-bit integer accessor; `None` as default makes the key required.
    fn get_i32(&self, default: Option<i32>, candidates: &[&str]) -> Result<i32> {
        typed(self, default, candidates)
    }

    /// 64-bit integer accessor; `None` as default makes the key required.
    fn get_i64(&self, default: Option<i64>, candidates: &[&str]) -> Result<i64> {
        typed(self, default, candidates)
    }

    /// Double-precision accessor; `None` as default makes the key required.
    fn get_f64(&self, default: Option<f64>, candidates: &[&str]) -> Result<f64> {
        typed(self, default, candidates)
    }

    /// Serializes `value` and stores it under `key`.
    fn put_value<T: Setting>(&self, key: &str, value: T) -> Result<Option<Vec<String>>> {
        self.put(key, conversion::to_raw(&value.into_value()))
    }

    /// Collects the audit sets and logs them.
    fn report_unused(&self) -> Result<AuditReport> {
        let report = AuditReport::collect(self)?;
        report.log();
        Ok(report)
    }
}

impl<S: Settings + ?Sized> SettingsExt for S {}

fn typed<S, T>(settings: &S, default: Option<T>, candidates: &[&str]) -> Result<T>
where
    S: Settings + ?Sized,
    T: Setting,
{
    settings
        .lookup(candidates, T::value_type(), default.map(T::into_value))?
        .into_setting()
}
