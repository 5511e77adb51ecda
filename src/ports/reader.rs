// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings reader trait definition.
//!
//! This module defines the `SourceReader` trait, which provides an interface for
//! parsing settings documents in different formats (properties, YAML, etc.).

use crate::domain::{Result, SourceDocument};

/// A trait for parsing settings documents.
///
/// A reader turns the text of a settings file into a [`SourceDocument`]: a list of keys with
/// their raw values, in file order, together with any comments the format keeps.
///
/// # Key Format
///
/// Readers should flatten nested structures using dot notation. For example,
/// a YAML structure like:
///
/// ```yaml
/// database:
///   host: localhost
///   ports: [5432, 5433]
/// ```
///
/// Should be read as:
/// - `database.host` -> `["localhost"]`
/// - `database.ports` -> `["5432", "5433"]`
///
/// # Examples
///
/// ```rust
/// use hexsettings::ports::SourceReader;
/// use hexsettings::domain::{Result, SourceDocument};
///
/// struct LineReader;
///
/// impl SourceReader for LineReader {
///     fn read(&self, content: &str) -> Result<SourceDocument> {
///         let mut document = SourceDocument::new();
///         for (i, line) in content.lines().enumerate() {
///             document.set(&format!("line.{i}"), vec![line.to_string()]);
///         }
///         Ok(document)
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["txt"]
///     }
/// }
///
/// let document = LineReader.read("a\nb").unwrap();
/// assert_eq!(document.get("line.1"), Some(&["b".to_string()][..]));
/// ```
pub trait SourceReader: Send + Sync {
    /// Parses the content of a settings document.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw content of the settings file
    ///
    /// # Returns
    ///
    /// * `Ok(SourceDocument)` - The parsed entries
    /// * `Err(ConfigError::ParseError)` - The content is not valid for this format
    fn read(&self, content: &str) -> Result<SourceDocument>;

    /// Returns the file extensions supported by this reader, without the leading dot.
    ///
    /// File sources use this to pick a reader from a file name.
    fn supported_extensions(&self) -> &[&str];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;

    struct KeyOnlyReader;

    impl SourceReader for KeyOnlyReader {
        fn read(&self, content: &str) -> Result<SourceDocument> {
            let mut document = SourceDocument::new();
            for line in content.lines() {
                if line.contains(' ') {
                    return Err(ConfigError::ParseError {
                        message: format!("invalid key '{line}'"),
                        source: None,
                    });
                }
                document.set(line, Vec::new());
            }
            Ok(document)
        }

        fn supported_extensions(&self) -> &[&str] {
            &["keys", "k"]
        }
    }

    #[test]
    fn test_reader_read() {
        let document = KeyOnlyReader.read("a\nb").unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document.get("a"), Some(&[][..]));
    }

    #[test]
    fn test_reader_error() {
        assert!(matches!(
            KeyOnlyReader.read("not a key"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_reader_supported_extensions() {
        assert_eq!(KeyOnlyReader.supported_extensions(), &["keys", "k"]);
    }

    #[test]
    fn test_reader_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn SourceReader>>();
    }
}
