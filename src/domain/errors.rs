// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the settings crate.
//!
//! This module defines the error types that can occur when reading, converting or mutating
//! settings, and when assembling a decorator chain. All errors use `thiserror` for proper error
//! handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// The main error type for settings operations.
///
/// Every failure is surfaced to the immediate caller. Variants fall in three groups:
///
/// - **data errors** (`NoValue`, `ConversionError`, `TooManyValues`, `CacheTypeConflict`) that a
///   caller can recover from by supplying a default or fixing the source,
/// - **usage errors** (`ReadOnlyViolation`, `ThreadAccessViolation`, `AlreadyRegistered`,
///   `InvalidArgument`, `UnsupportedType`, `TypeMismatch`) scoped to the single call,
/// - **assembly errors** (`DuplicateDecorator`, `InvalidComposition`) raised before a chain is
///   usable.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::errors::ConfigError;
///
/// fn lookup() -> Result<String, ConfigError> {
///     Err(ConfigError::NoValue {
///         keys: vec!["database.host".to_string()],
///     })
/// }
///
/// assert!(lookup().unwrap_err().is_recoverable());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// None of the candidate keys is present and no default was supplied.
    #[error("No value for key(s) [{}]", .keys.join(", "))]
    NoValue {
        /// The candidate keys that were tried, in order
        keys: Vec<String>,
    },

    /// A raw string could not be converted to the requested type.
    #[error("Failed to convert value '{raw}' of key '{key}' to type {target_type}: {source}")]
    ConversionError {
        /// The key being converted
        key: String,
        /// The offending raw string
        raw: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A scalar accessor was used on a multi-valued entry.
    #[error("Key '{key}' holds {count} values but a single value was requested")]
    TooManyValues {
        /// The resolved key
        key: String,
        /// The number of values the entry holds
        count: usize,
    },

    /// The requested target type has no registered conversion.
    #[error("Unsupported target type: {type_name}")]
    UnsupportedType {
        /// The name that could not be resolved to a conversion
        type_name: String,
    },

    /// A converted value was extracted as a different Rust type than it holds.
    #[error("Value of type {found} cannot be read as {expected}")]
    TypeMismatch {
        /// The requested type
        expected: String,
        /// The type actually held
        found: String,
    },

    /// A decorator kind was stacked twice in the same chain.
    #[error("Decorator {kind} is already present in the chain")]
    DuplicateDecorator {
        /// The duplicated kind
        kind: String,
    },

    /// A decorator was stacked where the hides relation forbids it.
    #[error("Decorator {outer} cannot wrap a chain containing {inner}: {reason}")]
    InvalidComposition {
        /// The kind being added
        outer: String,
        /// The kind already present that conflicts
        inner: String,
        /// Why the composition is rejected
        reason: String,
    },

    /// A mutating operation was attempted on a read-only chain.
    #[error("Settings are read-only; '{operation}' is not allowed")]
    ReadOnlyViolation {
        /// The rejected operation
        operation: String,
    },

    /// The calling thread is not bound to a thread-bound chain.
    #[error("Thread '{thread}' is not bound to these settings ('{operation}')")]
    ThreadAccessViolation {
        /// Debug rendering of the calling thread
        thread: String,
        /// The rejected operation
        operation: String,
    },

    /// A cached conversion has a different type than requested; the entry has been evicted.
    #[error("Cached value of key '{key}' is a {cached}, not a {requested}; cache entry evicted")]
    CacheTypeConflict {
        /// The key whose cache entry was evicted
        key: String,
        /// The type that was cached
        cached: String,
        /// The type that was requested
        requested: String,
    },

    /// An observer was registered twice.
    #[error("Observer is already registered")]
    AlreadyRegistered,

    /// An argument did not meet the operation's precondition.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument
        message: String,
    },

    /// An error occurred in a settings source.
    #[error("Settings source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a settings document.
    #[error("Failed to parse settings: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred in a settings watcher.
    #[error("Settings watcher error: {message}")]
    WatcherError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading or writing settings.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a ConversionError from any parse error.
    pub fn conversion(
        key: &str,
        raw: &str,
        target_type: &str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConfigError::ConversionError {
            key: key.to_string(),
            raw: raw.to_string(),
            target_type: target_type.to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a ConversionError from a plain message.
    pub fn conversion_msg(key: &str, raw: &str, target_type: &str, message: &str) -> Self {
        ConfigError::ConversionError {
            key: key.to_string(),
            raw: raw.to_string(),
            target_type: target_type.to_string(),
            source: message.to_string().into(),
        }
    }

    /// Creates a ConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: &str, raw: &str, target_type: &str, err: ParseIntError) -> Self {
        Self::conversion(key, raw, target_type, err)
    }

    /// Creates a ConversionError from a ParseFloatError.
    pub fn from_parse_float_error(
        key: &str,
        raw: &str,
        target_type: &str,
        err: ParseFloatError,
    ) -> Self {
        Self::conversion(key, raw, target_type, err)
    }

    /// Returns `true` for errors a caller can reasonably handle and continue.
    ///
    /// Chain assembly errors and unsupported types are programming errors and return `false`.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ConfigError::DuplicateDecorator { .. }
                | ConfigError::InvalidComposition { .. }
                | ConfigError::UnsupportedType { .. }
        )
    }
}

/// A specialized Result type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
