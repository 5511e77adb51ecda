// SPDX-License-Identifier: MIT OR Apache-2.0

//! Populating plain structs from settings.
//!
//! A [`Binder`] holds explicit registrations, each naming candidate keys, an optional default
//! and a setter. Applying the binder looks every registration up through the given chain, so
//! caching, auditing and thread checks apply as for any other read.

use crate::domain::errors::Result;
use crate::domain::settings::{Settings, SettingsExt};
use crate::domain::value::Setting;

type ApplyFn<T> = Box<dyn Fn(&mut T, &dyn Settings) -> Result<()> + Send + Sync>;

struct Binding<T> {
    keys: Vec<String>,
    apply: ApplyFn<T>,
}

/// Explicit key → field registrations for a target type.
///
/// # Examples
///
/// ```rust
/// use hexsettings::prelude::*;
///
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     port: i32,
/// }
///
/// # fn main() -> Result<()> {
/// let store = ValueStore::new();
/// store.put("server.host", vec!["example.org".to_string()])?;
///
/// let binder = Binder::new()
///     .bind(&["server.host", "host"], None, |s: &mut Server, v: String| s.host = v)
///     .bind(&["server.port"], Some(8080), |s: &mut Server, v: i32| s.port = v);
///
/// let mut server = Server::default();
/// binder.apply(&mut server, &store)?;
/// assert_eq!(server.host, "example.org");
/// assert_eq!(server.port, 8080);
/// # Ok(())
/// # }
/// ```
pub struct Binder<T> {
    bindings: Vec<Binding<T>>,
}

impl<T: 'static> Binder<T> {
    /// Creates a binder without registrations.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Registers a field. Without a default the field is required.
    pub fn bind<V, F>(mut self, keys: &[&str], default: Option<V>, setter: F) -> Self
    where
        V: Setting + Clone + Send + Sync + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let candidates = keys.clone();
        let apply: ApplyFn<T> = Box::new(move |target: &mut T, settings: &dyn Settings| {
            let candidates: Vec<&str> = candidates.iter().map(String::as_str).collect();
            let value = match &default {
                Some(default) => settings.get_or(default.clone(), &candidates)?,
                None => settings.get_as(&candidates)?,
            };
            setter(target, value);
            Ok(())
        });
        self.bindings.push(Binding { keys, apply });
        self
    }

    /// Looks every registration up in `settings` and assigns the values.
    ///
    /// Stops at the first failing registration; fields assigned before it keep their values.
    pub fn apply(&self, target: &mut T, settings: &dyn Settings) -> Result<()> {
        for binding in &self.bindings {
            (binding.apply)(target, settings)?;
        }
        Ok(())
    }

    /// The candidate keys of every registration, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &[String]> {
        self.bindings.iter().map(|b| b.keys.as_slice())
    }
}

impl<T: 'static> Default for Binder<T> {
    fn default() -> Self {
        Self::new()
    }
}
