// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture settings management crate.
//!
//! Settings are multi-valued string entries held in a base store and accessed through a chain
//! of decorators. Each decorator adds exactly one behavior: read-only protection, thread
//! confinement, per-thread copies, typed-value caching, change notification or reloading from
//! a source. Typed access converts the raw strings on the way out, with defaults and
//! candidate keys, and every store audits which keys were used and which were missing.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The `Settings` contract, value types and conversion, chain
//!   composition rules, change events, audits and errors
//! - **Ports**: Trait definitions for the outside world (`SettingsSource`, `SourceReader`,
//!   `SourceWriter`, `ConfigWatcher`)
//! - **Adapters**: Properties and YAML formats, file sources and the file watcher
//! - **Service**: Base stores, the decorators and the chain builder
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `reload`: Enable file watching for automatic reloads
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use hexsettings::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let settings = ValueStore::builder().caching().read_only().build()?;
//!
//! // Missing keys fall back to the default and are recorded for the audit
//! assert_eq!(settings.get_i32(Some(100), &["alpha"])?, 100);
//! assert!(settings.not_present_keys()?.contains("alpha"));
//!
//! // The read-only layer rejects writes
//! assert!(settings.put("alpha", vec!["200".to_string()]).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! # Decorator Chains
//!
//! ```rust
//! use hexsettings::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let store: Arc<dyn Settings> = Arc::new(ValueStore::with_id("app"));
//! let observable = Observable::wrap(store)?;
//! observable.add_observer(Arc::new(|event: &ChangeEvent| -> Result<()> {
//!     println!("added {:?}", event.added);
//!     Ok(())
//! }))?;
//!
//! // Each kind of decorator may appear once per chain
//! let caching = Caching::wrap(observable.clone())?;
//! assert!(Caching::wrap(caching.clone()).is_err());
//!
//! caching.put("alpha", vec!["200".to_string()])?;
//! assert_eq!(caching.get_i32(Some(100), &["alpha"])?, 200);
//! caching.report_unused()?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        AuditReport, Binder, ChainExt, ChangeEvent, ChangeObserver, Color, ConfigError,
        DecoratorKind, Entries, Parameter, Result, ScalarType, Setting, Settings, SettingsExt,
        SourceDocument, Value, ValueType,
    };
    pub use crate::ports::{ConfigWatcher, SettingsSource, SourceReader, SourceWriter};
    pub use crate::service::{
        Caching, MultiStore, Observable, ReadOnly, Reloadable, SettingsBuilder, ThreadBound,
        ThreadSafe, ValueStore,
    };

    // Re-export adapters based on feature flags
    pub use crate::adapters::{FileSource, PropertiesFormat};
    #[cfg(feature = "reload")]
    pub use crate::adapters::FileWatcher;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlReader;
}
