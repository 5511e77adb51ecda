// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the settings contract and its core types.
//!
//! This module defines what a settings chain is ([`Settings`], [`DecoratorKind`]), the values
//! it converts to ([`Value`], [`Setting`]) and the events and reports it produces. It does not
//! know about files, formats or watchers.

pub mod audit;
pub mod binding;
pub mod chain;
pub mod changes;
pub mod color;
pub mod conversion;
pub mod document;
pub mod errors;
pub mod escape;
pub mod parameter;
pub mod settings;
pub mod type_registry;
pub mod value;

// Re-export commonly used types
pub use audit::AuditReport;
pub use binding::Binder;
pub use chain::{ChainExt, ChainRegistry, DecoratorKind, SettingsVisitor, VisitTarget};
pub use changes::{ChangeEvent, ChangeNotifier, ChangeObserver};
pub use color::Color;
pub use document::{SourceDocument, SourceEntry};
pub use errors::{ConfigError, Result};
pub use escape::Escaper;
pub use parameter::Parameter;
pub use settings::{Entries, Settings, SettingsExt};
pub use type_registry::TypeDescriptor;
pub use value::{ScalarSetting, ScalarType, Setting, Value, ValueType};
