// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings source trait definition.
//!
//! This module defines the `SettingsSource` trait, the port through which entries enter a
//! settings chain. Any origin of settings (files, embedded strings, remote services, etc.)
//! implements this trait; loading and reloading a chain only depends on it.

use crate::domain::{Result, SourceDocument};

/// A trait for settings sources.
///
/// A source produces a fresh [`SourceDocument`] every time it is loaded. It does not hold the
/// settings itself; the chain it is loaded into does.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a reloadable chain can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use hexsettings::ports::SettingsSource;
/// use hexsettings::domain::{Result, SourceDocument};
///
/// struct Defaults;
///
/// impl SettingsSource for Defaults {
///     fn name(&self) -> &str {
///         "defaults"
///     }
///
///     fn load(&self) -> Result<SourceDocument> {
///         let mut document = SourceDocument::new();
///         document.set("server.port", vec!["8080".to_string()]);
///         Ok(document)
///     }
/// }
///
/// let document = Defaults.load().unwrap();
/// assert_eq!(document.len(), 1);
/// ```
pub trait SettingsSource: Send + Sync {
    /// Returns the name of this source.
    ///
    /// This name is used for logging and error messages. It should be a short, descriptive
    /// identifier like "file", "properties" or "memory".
    fn name(&self) -> &str;

    /// Reads the current entries of the source.
    ///
    /// # Returns
    ///
    /// * `Ok(SourceDocument)` - The entries the source holds right now
    /// * `Err(ConfigError)` - The source could not be read or parsed
    fn load(&self) -> Result<SourceDocument>;
}
