// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings watcher trait definition.
//!
//! This module defines the `ConfigWatcher` trait, which provides an interface for
//! watching settings sources for changes and triggering callbacks when changes occur.

use crate::domain::Result;
use std::path::Path;
use std::sync::Arc;

/// Type alias for change notification callbacks.
///
/// This callback is invoked when a watched source changes. It receives the path of the
/// resource that changed.
pub type ChangeCallback = Arc<dyn Fn(&Path) + Send + Sync>;

/// A trait for watching settings sources for changes.
///
/// This trait defines the interface for implementing watchers that can monitor sources
/// and trigger callbacks when changes are detected. A reloadable chain registers a callback
/// that reloads its source.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use hexsettings::ports::{ChangeCallback, ConfigWatcher};
/// use hexsettings::domain::Result;
///
/// struct ManualWatcher {
///     callback: Option<ChangeCallback>,
/// }
///
/// impl ConfigWatcher for ManualWatcher {
///     fn watch(&mut self, callback: ChangeCallback) -> Result<()> {
///         self.callback = Some(callback);
///         Ok(())
///     }
///
///     fn stop(&mut self) -> Result<()> {
///         self.callback = None;
///         Ok(())
///     }
/// }
/// ```
pub trait ConfigWatcher: Send + Sync {
    /// Starts watching for changes.
    ///
    /// When a change is detected, the provided callback is invoked with the path that
    /// changed. The callback runs on the watcher's thread and should return quickly.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The watcher was successfully started
    /// * `Err(ConfigError::WatcherError)` - The watcher could not be started
    fn watch(&mut self, callback: ChangeCallback) -> Result<()>;

    /// Stops watching for changes.
    ///
    /// After calling this method, no more change notifications will be sent.
    fn stop(&mut self) -> Result<()>;
}
