// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reloading decorator.
//!
//! Reloading reads the source again and writes its entries through the outermost node of the
//! chain, so decorators stacked above (caching, observation) see the new values exactly as
//! they would see an application write. A `ReadOnly` node above the reloadable one is stepped
//! over: it restricts the application, not the source. Keys that disappeared from the source
//! are kept.

use crate::domain::chain::{self, DecoratorKind};
use crate::domain::{Result, Settings};
use crate::ports::{ConfigWatcher, SettingsSource};
use crate::service::value_store::load_into;
use std::path::Path;
use std::sync::Arc;

/// Refreshes the chain from a [`SettingsSource`].
pub struct Reloadable {
    inner: Arc<dyn Settings>,
    source: Box<dyn SettingsSource>,
}

impl Reloadable {
    /// Wraps `inner` without loading the source.
    pub fn wrap(inner: Arc<dyn Settings>, source: Box<dyn SettingsSource>) -> Result<Arc<Self>> {
        chain::wrap(inner, DecoratorKind::Reloadable, |inner| Self { inner, source })
    }

    /// Wraps `inner` and performs the initial load.
    pub fn wrap_loaded(
        inner: Arc<dyn Settings>,
        source: Box<dyn SettingsSource>,
    ) -> Result<Arc<Self>> {
        let reloadable = Self::wrap(inner, source)?;
        reloadable.reload()?;
        Ok(reloadable)
    }

    /// The name of the source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Loads the source and writes every entry through the chain.
    ///
    /// Returns the number of entries written.
    pub fn reload(&self) -> Result<usize> {
        let outermost = self.registry().and_then(|registry| registry.outermost());
        let target: &dyn Settings = match &outermost {
            Some(top) => self.write_target(top.as_ref()),
            None => self,
        };
        tracing::debug!("Reloading settings from source '{}'", self.source.name());
        load_into(target, self.source.as_ref())
    }

    /// Reloads whenever `watcher` reports a change.
    ///
    /// The watcher holds a weak reference, so dropping the chain ends reloading. Failed reloads
    /// are logged and the previous values stay in effect.
    pub fn reload_on(self: &Arc<Self>, watcher: &mut dyn ConfigWatcher) -> Result<()> {
        let weak = Arc::downgrade(self);
        watcher.watch(Arc::new(move |path: &Path| {
            let Some(this) = weak.upgrade() else {
                return;
            };
            match this.reload() {
                Ok(count) => tracing::info!(
                    "Reloaded {} entries after change to {}",
                    count,
                    path.display()
                ),
                Err(e) => tracing::warn!(
                    "Failed to reload settings after change to {}: {}",
                    path.display(),
                    e
                ),
            }
        }))
    }

    // The outermost node at or above self that is not shadowed by a ReadOnly node
    fn write_target<'a>(&'a self, top: &'a dyn Settings) -> &'a dyn Settings {
        let mut target = top;
        let mut current: Option<&dyn Settings> = Some(top);
        while let Some(node) = current {
            if std::ptr::addr_eq(node as *const _, self as *const Self) {
                return target;
            }
            if node.kind() == Some(DecoratorKind::ReadOnly) {
                if let Some(inner) = node.inner() {
                    target = inner;
                }
            }
            current = node.inner();
        }
        // self is not below the registered outermost node
        self
    }
}

impl Settings for Reloadable {
    fn kind(&self) -> Option<DecoratorKind> {
        Some(DecoratorKind::Reloadable)
    }

    fn inner(&self) -> Option<&dyn Settings> {
        Some(self.inner.as_ref())
    }
}
