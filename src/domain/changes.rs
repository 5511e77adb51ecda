// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change events and their delivery.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::settings::Entries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

/// The keys affected by one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Keys that were absent before
    pub added: BTreeSet<String>,
    /// Keys whose values differ from before
    pub changed: BTreeSet<String>,
    /// Keys that were removed
    pub deleted: BTreeSet<String>,
}

impl ChangeEvent {
    /// Creates an empty event.
    pub fn new() -> Self {
        Self::default()
    }

    /// An event deleting the given keys.
    pub fn deleted<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deleted: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Classifies one write of `key` given its previous values.
    pub fn record(&mut self, key: &str, previous: Option<&Vec<String>>, values: &[String]) {
        match previous {
            None => {
                self.added.insert(key.to_string());
            }
            Some(previous) if previous.as_slice() != values => {
                self.changed.insert(key.to_string());
            }
            Some(_) => {}
        }
    }

    /// The difference between two snapshots.
    pub fn between(before: &Entries, after: &Entries) -> Self {
        let mut event = Self::default();
        for (key, values) in after {
            event.record(key, before.get(key), values);
        }
        event.deleted = before
            .keys()
            .filter(|key| !after.contains_key(*key))
            .cloned()
            .collect();
        event
    }

    /// Returns `true` if no key is affected.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.deleted.is_empty()
    }
}

/// Receives change events.
///
/// Returning an error stops delivery to the observers registered after this one, and the error
/// is returned to the code that made the change. The change itself is not rolled back.
pub trait ChangeObserver: Send + Sync {
    /// Called after a mutation took effect.
    fn settings_changed(&self, event: &ChangeEvent) -> Result<()>;
}

impl<F> ChangeObserver for F
where
    F: Fn(&ChangeEvent) -> Result<()> + Send + Sync,
{
    fn settings_changed(&self, event: &ChangeEvent) -> Result<()> {
        self(event)
    }
}

/// An ordered list of observers.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: RwLock<Vec<Arc<dyn ChangeObserver>>>,
}

impl ChangeNotifier {
    /// Creates a notifier with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an observer. The same observer instance can only be registered once.
    pub fn add_observer(&self, observer: Arc<dyn ChangeObserver>) -> Result<()> {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        if observers.iter().any(|o| Arc::ptr_eq(o, &observer)) {
            return Err(ConfigError::AlreadyRegistered);
        }
        observers.push(observer);
        Ok(())
    }

    /// Removes an observer, returning `true` if it was registered.
    pub fn remove_observer(&self, observer: &Arc<dyn ChangeObserver>) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|o| !Arc::ptr_eq(o, observer));
        observers.len() != before
    }

    /// The number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Delivers `event` to every observer in registration order.
    pub fn notify(&self, event: &ChangeEvent) -> Result<()> {
        // Observers may register further observers, so deliver from a copy
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer.settings_changed(event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn entries(pairs: &[(&str, &str)]) -> Entries {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
            .collect()
    }

    #[test]
    fn test_record() {
        let mut event = ChangeEvent::new();
        event.record("new", None, &["1".to_string()]);
        event.record("same", Some(&vec!["1".to_string()]), &["1".to_string()]);
        event.record("other", Some(&vec!["1".to_string()]), &["2".to_string()]);
        assert!(event.added.contains("new"));
        assert!(event.changed.contains("other"));
        assert!(!event.changed.contains("same"));
        assert!(event.deleted.is_empty());
    }

    #[test]
    fn test_between() {
        let before = entries(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let after = entries(&[("a", "1"), ("b", "20"), ("d", "4")]);
        let event = ChangeEvent::between(&before, &after);
        assert_eq!(event.added, BTreeSet::from(["d".to_string()]));
        assert_eq!(event.changed, BTreeSet::from(["b".to_string()]));
        assert_eq!(event.deleted, BTreeSet::from(["c".to_string()]));
        assert!(ChangeEvent::between(&before, &before).is_empty());
    }

    #[test]
    fn test_duplicate_observer_rejected() {
        let notifier = ChangeNotifier::new();
        let observer: Arc<dyn ChangeObserver> = Arc::new(|_: &ChangeEvent| -> Result<()> { Ok(()) });
        notifier.add_observer(Arc::clone(&observer)).unwrap();
        assert!(matches!(
            notifier.add_observer(Arc::clone(&observer)),
            Err(ConfigError::AlreadyRegistered)
        ));
        assert_eq!(notifier.observer_count(), 1);
        assert!(notifier.remove_observer(&observer));
        assert_eq!(notifier.observer_count(), 0);
    }

    #[test]
    fn test_delivery_order_and_failure() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&calls);
        notifier
            .add_observer(Arc::new(move |_: &ChangeEvent| -> Result<()> {
                first.lock().unwrap().push("first");
                Err(ConfigError::InvalidArgument {
                    message: "rejected".to_string(),
                })
            }))
            .unwrap();
        let second = Arc::clone(&calls);
        notifier
            .add_observer(Arc::new(move |_: &ChangeEvent| -> Result<()> {
                second.lock().unwrap().push("second");
                Ok(())
            }))
            .unwrap();

        assert!(notifier.notify(&ChangeEvent::deleted(["k"])).is_err());
        assert_eq!(*calls.lock().unwrap(), vec!["first"]);
    }
}
