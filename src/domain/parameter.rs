// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed, observable parameters.
//!
//! A [`Parameter`] pairs a key and a help text with a typed value and a default. It can be
//! loaded from and stored into any [`Settings`] chain, and notifies its listeners whenever its
//! value is set or cleared.

use crate::domain::conversion;
use crate::domain::errors::Result;
use crate::domain::settings::{Settings, SettingsExt};
use crate::domain::value::{Setting, ValueType};
use std::fmt;
use std::sync::Arc;

/// Called with the parameter key after its value changed.
pub type ParameterListener = Arc<dyn Fn(&str) + Send + Sync>;

/// A named setting with a typed value, a default and change listeners.
///
/// # Examples
///
/// ```rust
/// use hexsettings::prelude::*;
///
/// # fn main() -> Result<()> {
/// let store = ValueStore::new();
/// store.put("workers", vec!["8".to_string()])?;
///
/// let mut workers = Parameter::new("workers", "Number of worker threads").with_default(4);
/// assert_eq!(workers.get(), Some(&4));
///
/// workers.load_from(&store)?;
/// assert_eq!(workers.get(), Some(&8));
/// # Ok(())
/// # }
/// ```
pub struct Parameter<T> {
    key: String,
    help: String,
    value: Option<T>,
    default: Option<T>,
    listeners: Vec<ParameterListener>,
}

impl<T: Setting + Clone> Parameter<T> {
    /// Creates an unset parameter without default.
    pub fn new(key: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            help: help.into(),
            value: None,
            default: None,
            listeners: Vec::new(),
        }
    }

    /// Sets the default.
    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }

    /// The settings key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The help text.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The conversion used for this parameter.
    pub fn value_type(&self) -> ValueType {
        T::value_type()
    }

    /// The value if set, otherwise the default.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref().or(self.default.as_ref())
    }

    /// The default.
    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Returns `true` if a value was set explicitly.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Sets the value and notifies the listeners.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
        self.notify();
    }

    /// Clears the value so the default applies again, and notifies the listeners.
    pub fn clear(&mut self) {
        if self.value.take().is_some() {
            self.notify();
        }
    }

    /// Adds a listener.
    pub fn observe(&mut self, listener: ParameterListener) {
        self.listeners.push(listener);
    }

    /// Sets the value from `settings` if the key is present.
    ///
    /// Returns `true` if a value was loaded. An absent key leaves the parameter unchanged.
    pub fn load_from<S: Settings + ?Sized>(&mut self, settings: &S) -> Result<bool> {
        match settings.get_opt::<T>(&[self.key.as_str()])? {
            Some(value) => {
                self.set(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Writes the effective value to `settings`. Does nothing when neither value nor default is
    /// available.
    pub fn store_into<S: Settings + ?Sized>(&self, settings: &S) -> Result<()> {
        if let Some(value) = self.get() {
            settings.put_value(&self.key, value.clone())?;
        }
        Ok(())
    }

    /// The raw form of the effective value.
    pub fn to_raw(&self) -> Option<Vec<String>> {
        self.get()
            .map(|value| conversion::to_raw(&value.clone().into_value()))
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.key);
        }
    }
}

impl<T: Clone> Clone for Parameter<T> {
    /// Copies key, help, value and default. Listeners stay with the original.
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            help: self.help.clone(),
            value: self.value.clone(),
            default: self.default.clone(),
            listeners: Vec::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("default", &self.default)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
