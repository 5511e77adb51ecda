// SPDX-License-Identifier: MIT OR Apache-2.0

//! The base settings store.
//!
//! [`ValueStore`] keeps the entries of a chain together with the two audit sets: keys that
//! were read, and candidate keys that were looked up and absent. Every decorator chain ends in
//! a `ValueStore` (or a [`MultiStore`](crate::service::MultiStore) fanning out over several).

use crate::domain::{ChainRegistry, ConfigError, Entries, Result, Settings};
use crate::ports::SettingsSource;
use crate::service::builder::SettingsBuilder;
use std::collections::{BTreeSet, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct StoreState {
    entries: Entries,
    touched: HashSet<String>,
    not_present: HashSet<String>,
}

/// An in-memory multi-valued settings store with usage auditing.
///
/// # Examples
///
/// ```rust
/// use hexsettings::prelude::*;
///
/// # fn main() -> Result<()> {
/// let store = ValueStore::with_id("app");
/// store.put("greeting", vec!["hello".to_string()])?;
/// store.put("unused", vec!["x".to_string()])?;
///
/// assert_eq!(store.get_string(None, &["greeting"])?, "hello");
/// assert!(store.unused_keys()?.contains("unused"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ValueStore {
    id: Option<String>,
    state: RwLock<StoreState>,
    registry: ChainRegistry,
}

impl ValueStore {
    /// Creates an empty, anonymous store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with an identifier used in audit reports and logs.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Creates a store holding `entries`, with fresh audit sets.
    pub fn from_entries(id: Option<String>, entries: Entries) -> Self {
        Self {
            id,
            state: RwLock::new(StoreState {
                entries,
                ..StoreState::default()
            }),
            registry: ChainRegistry::new(),
        }
    }

    /// Creates a builder that decorates a new anonymous store.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hexsettings::prelude::*;
    ///
    /// # fn main() -> Result<()> {
    /// let settings = ValueStore::builder().caching().read_only().build()?;
    /// assert!(settings.has_decorator(DecoratorKind::Caching));
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new(Self::new())
    }

    /// Creates a store populated from the default properties file of an application.
    ///
    /// The file is looked up in the OS-specific configuration directory. A missing file
    /// yields an empty store.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use hexsettings::prelude::*;
    ///
    /// # fn main() -> Result<()> {
    /// let store = ValueStore::with_defaults("myapp", "com.example")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_defaults(app_name: &str, qualifier: &str) -> Result<Self> {
        use crate::adapters::FileSource;

        let store = Self::with_id(app_name);
        match FileSource::from_default_location(app_name, qualifier, "settings.properties") {
            Ok(source) => {
                store.load(&source)?;
            }
            Err(e) => {
                tracing::debug!("No default settings file for '{}': {}", app_name, e);
            }
        }
        Ok(store)
    }

    /// Loads every entry of `source` into the store, overwriting existing keys.
    ///
    /// Returns the number of entries loaded.
    pub fn load(&self, source: &dyn SettingsSource) -> Result<usize> {
        load_into(self, source)
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Loads every entry of `source` into `target` through its `put_all`.
pub fn load_into(target: &dyn Settings, source: &dyn SettingsSource) -> Result<usize> {
    let entries = source.load()?.to_entries();
    let count = entries.len();
    target.put_all(entries)?;
    tracing::info!("Loaded {} entries from source '{}'", count, source.name());
    Ok(count)
}

impl Settings for ValueStore {
    fn registry(&self) -> Option<&ChainRegistry> {
        Some(&self.registry)
    }

    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        let mut state = self.write();
        let values = state.entries.get(key).cloned();
        if values.is_some() {
            state.touched.insert(key.to_string());
        }
        Ok(values)
    }

    fn peek(&self, key: &str) -> Result<Option<Vec<String>>> {
        Ok(self.read().entries.get(key).cloned())
    }

    fn put(&self, key: &str, values: Vec<String>) -> Result<Option<Vec<String>>> {
        let mut state = self.write();
        state.not_present.remove(key);
        Ok(state.entries.insert(key.to_string(), values))
    }

    fn put_all(&self, entries: Entries) -> Result<()> {
        let mut state = self.write();
        for (key, values) in entries {
            state.not_present.remove(&key);
            state.entries.insert(key, values);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<Vec<String>>> {
        let mut state = self.write();
        state.touched.remove(key);
        Ok(state.entries.remove(key))
    }

    fn clear(&self) -> Result<()> {
        let mut state = self.write();
        state.entries.clear();
        state.touched.clear();
        Ok(())
    }

    fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.read().entries.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read().entries.keys().cloned().collect())
    }

    fn size(&self) -> Result<usize> {
        Ok(self.read().entries.len())
    }

    fn snapshot(&self) -> Result<Entries> {
        Ok(self.read().entries.clone())
    }

    fn resolve_key(&self, candidates: &[&str]) -> Result<Option<String>> {
        if candidates.is_empty() {
            return Err(ConfigError::InvalidArgument {
                message: "at least one candidate key is required".to_string(),
            });
        }
        let mut state = self.write();
        for candidate in candidates {
            if state.entries.contains_key(*candidate) {
                return Ok(Some(candidate.to_string()));
            }
            state.not_present.insert(candidate.to_string());
        }
        Ok(None)
    }

    fn unused_keys(&self) -> Result<BTreeSet<String>> {
        let state = self.read();
        Ok(state
            .entries
            .keys()
            .filter(|key| !state.touched.contains(*key))
            .cloned()
            .collect())
    }

    fn not_present_keys(&self) -> Result<BTreeSet<String>> {
        Ok(self.read().not_present.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SettingsExt;

    fn values(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_put_get_remove() {
        let store = ValueStore::new();
        assert_eq!(store.put("k", values(&["1"])).unwrap(), None);
        assert_eq!(store.put("k", values(&["2"])).unwrap(), Some(values(&["1"])));
        assert_eq!(store.get("k").unwrap(), Some(values(&["2"])));
        assert_eq!(store.remove("k").unwrap(), Some(values(&["2"])));
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_get_marks_used_but_peek_does_not() {
        let store = ValueStore::new();
        store.put("a", values(&["1"])).unwrap();
        store.put("b", values(&["2"])).unwrap();
        store.peek("a").unwrap();
        store.contains_key("a").unwrap();
        store.snapshot().unwrap();
        store.get("b").unwrap();
        assert_eq!(store.unused_keys().unwrap(), BTreeSet::from(["a".to_string()]));
    }

    #[test]
    fn test_removed_key_is_not_audited() {
        let store = ValueStore::new();
        store.put("a", values(&["1"])).unwrap();
        store.get("a").unwrap();
        store.remove("a").unwrap();
        store.put("a", values(&["1"])).unwrap();
        assert!(store.unused_keys().unwrap().contains("a"));
    }

    #[test]
    fn test_clear_resets_usage() {
        let store = ValueStore::new();
        store.put("a", values(&["1"])).unwrap();
        store.get("a").unwrap();
        store.clear().unwrap();
        assert_eq!(store.size().unwrap(), 0);
        store.put("a", values(&["1"])).unwrap();
        assert!(store.unused_keys().unwrap().contains("a"));
    }

    #[test]
    fn test_not_present_tracking() {
        let store = ValueStore::new();
        store.put("b", values(&["1"])).unwrap();
        assert_eq!(store.resolve_key(&["a", "b", "c"]).unwrap(), Some("b".to_string()));
        assert_eq!(store.not_present_keys().unwrap(), BTreeSet::from(["a".to_string()]));

        store.put("a", values(&["2"])).unwrap();
        assert!(store.not_present_keys().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_key_requires_candidates() {
        let store = ValueStore::new();
        assert!(matches!(
            store.resolve_key(&[]).unwrap_err(),
            ConfigError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_put_all_clears_not_present() {
        let store = ValueStore::new();
        store.resolve_key(&["x"]).unwrap();
        let mut entries = Entries::new();
        entries.insert("x".to_string(), values(&["1"]));
        store.put_all(entries).unwrap();
        assert!(store.not_present_keys().unwrap().is_empty());
        assert_eq!(store.get_i32(None, &["x"]).unwrap(), 1);
    }

    #[test]
    fn test_default_not_cached_in_store() {
        let store = ValueStore::new();
        assert_eq!(store.get_i32(Some(7), &["missing"]).unwrap(), 7);
        assert!(!store.contains_key("missing").unwrap());
    }

    #[test]
    fn test_from_entries_has_fresh_audit() {
        let mut entries = Entries::new();
        entries.insert("a".to_string(), values(&["1"]));
        let store = ValueStore::from_entries(Some("copy".to_string()), entries);
        assert_eq!(store.id().as_deref(), Some("copy"));
        assert!(store.unused_keys().unwrap().contains("a"));
        assert!(store.registry().is_some());
    }
}
