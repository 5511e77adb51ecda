// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change-publishing decorator.
//!
//! Mutations are forwarded first and published afterwards, so observers always see the new
//! state. Delivery is synchronous, on the mutating thread, in registration order.
//!
//! | operation | event                                                         |
//! |-----------|---------------------------------------------------------------|
//! | `put`     | `added` for a new key, `changed` for new values, else nothing |
//! | `put_all` | one event covering the whole batch, nothing if it is empty    |
//! | `remove`  | `deleted` with the key, whether or not it was present         |
//! | `clear`   | `deleted` with every key present before, even if none         |

use crate::domain::chain::{self, DecoratorKind};
use crate::domain::{ChangeEvent, ChangeNotifier, ChangeObserver, Entries, Result, Settings};
use std::sync::Arc;

/// Publishes a [`ChangeEvent`] after each mutation.
///
/// # Examples
///
/// ```rust
/// use hexsettings::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// # fn main() -> Result<()> {
/// let settings = Observable::wrap(Arc::new(ValueStore::new()))?;
/// let events = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&events);
/// settings.add_observer(Arc::new(move |event: &ChangeEvent| -> Result<()> {
///     sink.lock().unwrap().push(event.clone());
///     Ok(())
/// }))?;
///
/// settings.put("a", vec!["1".to_string()])?;
/// assert!(events.lock().unwrap()[0].added.contains("a"));
/// # Ok(())
/// # }
/// ```
pub struct Observable {
    inner: Arc<dyn Settings>,
    notifier: ChangeNotifier,
}

impl Observable {
    /// Wraps `inner`.
    pub fn wrap(inner: Arc<dyn Settings>) -> Result<Arc<Self>> {
        chain::wrap(inner, DecoratorKind::Observable, |inner| Self {
            inner,
            notifier: ChangeNotifier::new(),
        })
    }

    /// Registers an observer. Fails with `AlreadyRegistered` for an instance already present.
    pub fn add_observer(&self, observer: Arc<dyn ChangeObserver>) -> Result<()> {
        self.notifier.add_observer(observer)
    }

    /// Unregisters an observer, returning `true` if it was registered.
    pub fn remove_observer(&self, observer: &Arc<dyn ChangeObserver>) -> bool {
        self.notifier.remove_observer(observer)
    }

    /// The number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.notifier.observer_count()
    }

    fn publish(&self, event: ChangeEvent) -> Result<()> {
        tracing::debug!(
            "Publishing change: {} added, {} changed, {} deleted",
            event.added.len(),
            event.changed.len(),
            event.deleted.len()
        );
        self.notifier.notify(&event)
    }
}

impl Settings for Observable {
    fn kind(&self) -> Option<DecoratorKind> {
        Some(DecoratorKind::Observable)
    }

    fn inner(&self) -> Option<&dyn Settings> {
        Some(self.inner.as_ref())
    }

    fn put(&self, key: &str, values: Vec<String>) -> Result<Option<Vec<String>>> {
        let mut event = ChangeEvent::new();
        event.record(key, self.inner.peek(key)?.as_ref(), &values);
        let previous = self.inner.put(key, values)?;
        if !event.is_empty() {
            self.publish(event)?;
        }
        Ok(previous)
    }

    fn put_all(&self, entries: Entries) -> Result<()> {
        let mut event = ChangeEvent::new();
        for (key, values) in &entries {
            event.record(key, self.inner.peek(key)?.as_ref(), values);
        }
        self.inner.put_all(entries)?;
        if !event.is_empty() {
            self.publish(event)?;
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<Vec<String>>> {
        let previous = self.inner.remove(key)?;
        self.publish(ChangeEvent::deleted([key]))?;
        Ok(previous)
    }

    fn clear(&self) -> Result<()> {
        let keys = self.inner.keys()?;
        self.inner.clear()?;
        self.publish(ChangeEvent::deleted(keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;
    use crate::service::ValueStore;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<ChangeEvent>>>;

    fn observed() -> (Arc<Observable>, Log) {
        let settings = Observable::wrap(Arc::new(ValueStore::new())).unwrap();
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        settings
            .add_observer(Arc::new(move |event: &ChangeEvent| -> Result<()> {
                sink.lock().unwrap().push(event.clone());
                Ok(())
            }))
            .unwrap();
        (settings, log)
    }

    #[test]
    fn test_put_classification() {
        let (settings, log) = observed();
        settings.put("k", vec!["1".to_string()]).unwrap();
        settings.put("k", vec!["1".to_string()]).unwrap();
        settings.put("k", vec!["2".to_string()]).unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log[0].added.contains("k"));
        assert!(log[1].changed.contains("k"));
    }

    #[test]
    fn test_put_all_single_event() {
        let (settings, log) = observed();
        settings.put("old", vec!["1".to_string()]).unwrap();

        let mut batch = Entries::new();
        batch.insert("old".to_string(), vec!["2".to_string()]);
        batch.insert("new".to_string(), vec!["3".to_string()]);
        settings.put_all(batch).unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log[1].added.contains("new"));
        assert!(log[1].changed.contains("old"));
    }

    #[test]
    fn test_remove_and_clear_emit_deleted() {
        let (settings, log) = observed();
        settings.put("a", vec!["1".to_string()]).unwrap();
        settings.put("b", vec!["2".to_string()]).unwrap();
        settings.remove("missing").unwrap();
        settings.clear().unwrap();
        settings.clear().unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 5);
        assert!(log[2].deleted.contains("missing"));
        assert_eq!(log[3].deleted.len(), 2);
        assert!(log[4].is_empty());
    }

    #[test]
    fn test_observer_error_propagates_after_write() {
        let settings = Observable::wrap(Arc::new(ValueStore::new())).unwrap();
        settings
            .add_observer(Arc::new(|_: &ChangeEvent| -> Result<()> {
                Err(ConfigError::InvalidArgument {
                    message: "veto".to_string(),
                })
            }))
            .unwrap();

        assert!(settings.put("k", vec!["v".to_string()]).is_err());
        assert!(settings.contains_key("k").unwrap());
    }
}
