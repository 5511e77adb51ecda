// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the base stores, the decorators and chain assembly.
//!
//! Every type here implements [`Settings`](crate::domain::Settings). Base stores
//! ([`ValueStore`], [`MultiStore`]) hold entries; decorators wrap an `Arc<dyn Settings>` and add
//! one behavior each. Decorators are created through their `wrap` constructors or through
//! [`SettingsBuilder`], both of which validate the composition first.

pub mod builder;
pub mod caching;
pub mod multi_store;
pub mod observable;
pub mod read_only;
pub mod reloadable;
pub mod thread_bound;
pub mod thread_safe;
pub mod value_store;

// Re-export commonly used types
pub use builder::SettingsBuilder;
pub use caching::Caching;
pub use multi_store::MultiStore;
pub use observable::Observable;
pub use read_only::ReadOnly;
pub use reloadable::Reloadable;
pub use thread_bound::ThreadBound;
pub use thread_safe::ThreadSafe;
pub use value_store::{load_into, ValueStore};
