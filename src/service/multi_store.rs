// SPDX-License-Identifier: MIT OR Apache-2.0

//! A composite base fanning operations out over several member chains.

use crate::domain::{ChainRegistry, ConfigError, DecoratorKind, Entries, Result, Settings};
use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Presents several member chains as one store.
///
/// Reads return the first member holding the key, so earlier members take precedence. Writes
/// update every member holding the key, or the first member when none does. Removal applies
/// to every holder and `clear` to all members.
///
/// # Examples
///
/// ```rust
/// use hexsettings::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> Result<()> {
/// let overrides = Arc::new(ValueStore::with_id("overrides"));
/// let defaults = Arc::new(ValueStore::with_id("defaults"));
/// overrides.put("port", vec!["9000".to_string()])?;
/// defaults.put("port", vec!["80".to_string()])?;
/// defaults.put("host", vec!["localhost".to_string()])?;
///
/// let settings = MultiStore::new(vec![overrides, defaults])?;
/// assert_eq!(settings.get_i32(None, &["port"])?, 9000);
/// assert_eq!(settings.size()?, 2);
/// # Ok(())
/// # }
/// ```
pub struct MultiStore {
    id: Option<String>,
    members: Vec<Arc<dyn Settings>>,
    not_present: RwLock<HashSet<String>>,
    registry: ChainRegistry,
}

impl MultiStore {
    /// Creates a store over `members`, in precedence order.
    ///
    /// Fails with [`ConfigError::InvalidArgument`] when no member is given.
    pub fn new(members: Vec<Arc<dyn Settings>>) -> Result<Self> {
        if members.is_empty() {
            return Err(ConfigError::InvalidArgument {
                message: "a multi-store needs at least one member".to_string(),
            });
        }
        Ok(Self {
            id: None,
            members,
            not_present: RwLock::new(HashSet::new()),
            registry: ChainRegistry::new(),
        })
    }

    /// Sets the identifier reported in audits.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The members in precedence order.
    pub fn members(&self) -> &[Arc<dyn Settings>] {
        &self.members
    }

    fn holders(&self, key: &str) -> Result<Vec<&Arc<dyn Settings>>> {
        let mut holders = Vec::new();
        for member in &self.members {
            if member.contains_key(key)? {
                holders.push(member);
            }
        }
        Ok(holders)
    }

    fn first_holder(&self, key: &str) -> Result<Option<&Arc<dyn Settings>>> {
        for member in &self.members {
            if member.contains_key(key)? {
                return Ok(Some(member));
            }
        }
        Ok(None)
    }
}

impl Settings for MultiStore {
    fn kind(&self) -> Option<DecoratorKind> {
        Some(DecoratorKind::Multiplicity)
    }

    fn registry(&self) -> Option<&ChainRegistry> {
        Some(&self.registry)
    }

    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.first_holder(key)? {
            Some(member) => member.get(key),
            None => Ok(None),
        }
    }

    fn peek(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.first_holder(key)? {
            Some(member) => member.peek(key),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, values: Vec<String>) -> Result<Option<Vec<String>>> {
        self.not_present
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        let holders = self.holders(key)?;
        if holders.is_empty() {
            return self.members[0].put(key, values);
        }
        let mut first_previous = None;
        for (i, member) in holders.into_iter().enumerate() {
            let previous = member.put(key, values.clone())?;
            if i == 0 {
                first_previous = previous;
            }
        }
        Ok(first_previous)
    }

    fn put_all(&self, entries: Entries) -> Result<()> {
        for (key, values) in entries {
            self.put(&key, values)?;
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<Vec<String>>> {
        let mut first_previous = None;
        for member in self.holders(key)? {
            let previous = member.remove(key)?;
            if first_previous.is_none() {
                first_previous = previous;
            }
        }
        Ok(first_previous)
    }

    fn clear(&self) -> Result<()> {
        for member in &self.members {
            member.clear()?;
        }
        Ok(())
    }

    fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.first_holder(key)?.is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = BTreeSet::new();
        for member in &self.members {
            keys.extend(member.keys()?);
        }
        Ok(keys.into_iter().collect())
    }

    fn size(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    fn snapshot(&self) -> Result<Entries> {
        let mut merged = Entries::new();
        for member in &self.members {
            for (key, values) in member.snapshot()? {
                merged.entry(key).or_insert(values);
            }
        }
        Ok(merged)
    }

    fn resolve_key(&self, candidates: &[&str]) -> Result<Option<String>> {
        if candidates.is_empty() {
            return Err(ConfigError::InvalidArgument {
                message: "at least one candidate key is required".to_string(),
            });
        }
        for candidate in candidates {
            if self.contains_key(candidate)? {
                return Ok(Some(candidate.to_string()));
            }
            self.not_present
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(candidate.to_string());
        }
        Ok(None)
    }

    fn unused_keys(&self) -> Result<BTreeSet<String>> {
        let mut unused = BTreeSet::new();
        for member in &self.members {
            unused.extend(member.unused_keys()?);
        }
        Ok(unused)
    }

    fn not_present_keys(&self) -> Result<BTreeSet<String>> {
        let mut absent: BTreeSet<String> = self
            .not_present
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        for member in &self.members {
            absent.extend(member.not_present_keys()?);
        }
        Ok(absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SettingsExt;
    use crate::service::ValueStore;

    fn pair() -> (Arc<ValueStore>, Arc<ValueStore>, MultiStore) {
        let first = Arc::new(ValueStore::new());
        let second = Arc::new(ValueStore::new());
        first.put("shared", vec!["first".to_string()]).unwrap();
        second.put("shared", vec!["second".to_string()]).unwrap();
        second.put("only_second", vec!["2".to_string()]).unwrap();
        let multi = MultiStore::new(vec![first.clone(), second.clone()]).unwrap();
        (first, second, multi)
    }

    #[test]
    fn test_requires_members() {
        assert!(MultiStore::new(Vec::new()).is_err());
    }

    #[test]
    fn test_first_member_wins_on_read() {
        let (_first, _second, multi) = pair();
        assert_eq!(multi.get_string(None, &["shared"]).unwrap(), "first");
        assert_eq!(multi.get_i32(None, &["only_second"]).unwrap(), 2);
        assert_eq!(multi.size().unwrap(), 2);
        assert_eq!(multi.snapshot().unwrap()["shared"], vec!["first"]);
    }

    #[test]
    fn test_put_updates_holders_or_first() {
        let (first, second, multi) = pair();
        multi.put("shared", vec!["both".to_string()]).unwrap();
        assert_eq!(first.peek("shared").unwrap(), Some(vec!["both".to_string()]));
        assert_eq!(second.peek("shared").unwrap(), Some(vec!["both".to_string()]));

        multi.put("fresh", vec!["x".to_string()]).unwrap();
        assert!(first.contains_key("fresh").unwrap());
        assert!(!second.contains_key("fresh").unwrap());
    }

    #[test]
    fn test_remove_and_clear() {
        let (first, second, multi) = pair();
        assert_eq!(
            multi.remove("shared").unwrap(),
            Some(vec!["first".to_string()])
        );
        assert!(!first.contains_key("shared").unwrap());
        assert!(!second.contains_key("shared").unwrap());

        multi.clear().unwrap();
        assert_eq!(multi.size().unwrap(), 0);
    }

    #[test]
    fn test_audit_is_union() {
        let (_first, _second, multi) = pair();
        multi.get("shared").unwrap();
        assert_eq!(
            multi.unused_keys().unwrap(),
            BTreeSet::from(["only_second".to_string(), "shared".to_string()])
        );
        multi.get_i32(Some(0), &["nowhere"]).unwrap();
        assert!(multi.not_present_keys().unwrap().contains("nowhere"));
    }
}
