// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing settings format and source implementations.
//!
//! This module contains concrete implementations of the traits defined in the ports layer:
//! readers and writers for file formats, a file-backed `SettingsSource` and the file watcher
//! driving reloads.

pub mod file;
pub mod properties;
#[cfg(feature = "yaml")]
pub mod yaml;

pub mod watchers;

// Re-export adapters based on feature flags
pub use file::FileSource;
pub use properties::PropertiesFormat;
#[cfg(feature = "reload")]
pub use watchers::FileWatcher;
#[cfg(feature = "yaml")]
pub use yaml::YamlReader;
