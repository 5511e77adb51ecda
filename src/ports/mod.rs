// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) through which settings enter and leave
//! a chain: reading and writing documents, loading sources and watching them for changes.
//! These traits are implemented by adapters in the adapters layer.

pub mod reader;
pub mod source;
pub mod watcher;
pub mod writer;

// Re-export commonly used types
pub use reader::SourceReader;
pub use source::SettingsSource;
pub use watcher::{ChangeCallback, ConfigWatcher};
pub use writer::SourceWriter;
