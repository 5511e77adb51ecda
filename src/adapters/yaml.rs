// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML settings reader.
//!
//! Nested mappings are flattened with dot notation. A sequence of scalars becomes one
//! multi-valued entry; a sequence containing mappings or sequences is flattened with the
//! element index as a key segment. YAML comments are not preserved.

use crate::domain::{ConfigError, Result, SourceDocument};
use crate::ports::SourceReader;

/// YAML reader implementation.
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::YamlReader;
/// use hexsettings::ports::SourceReader;
///
/// let reader = YamlReader::new();
/// let document = reader.read("database:\n  host: localhost\n  ports: [5432, 5433]").unwrap();
/// assert_eq!(document.get("database.host"), Some(&["localhost".to_string()][..]));
/// assert_eq!(document.get("database.ports").map(|v| v.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlReader;

impl YamlReader {
    /// Creates a new YAML reader.
    pub fn new() -> Self {
        YamlReader
    }

    fn scalar(value: &serde_yaml::Value) -> Option<String> {
        match value {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            serde_yaml::Value::Tagged(tagged) => Self::scalar(&tagged.value),
            _ => None,
        }
    }

    fn flatten(value: &serde_yaml::Value, prefix: &str, document: &mut SourceDocument) {
        match value {
            serde_yaml::Value::Mapping(map) => {
                for (key, val) in map {
                    let Some(key_str) = Self::scalar(key) else {
                        tracing::debug!("Skipping YAML entry with non-scalar key under '{}'", prefix);
                        continue;
                    };
                    let new_prefix = if prefix.is_empty() {
                        key_str
                    } else {
                        format!("{}.{}", prefix, key_str)
                    };
                    Self::flatten(val, &new_prefix, document);
                }
            }
            serde_yaml::Value::Sequence(seq) => {
                let scalars: Option<Vec<String>> = seq.iter().map(Self::scalar).collect();
                match scalars {
                    Some(values) => document.set(prefix, values),
                    None => {
                        for (i, val) in seq.iter().enumerate() {
                            Self::flatten(val, &format!("{}.{}", prefix, i), document);
                        }
                    }
                }
            }
            serde_yaml::Value::Null => {
                if !prefix.is_empty() {
                    document.set(prefix, Vec::new());
                }
            }
            scalar => {
                if let Some(s) = Self::scalar(scalar) {
                    document.set(prefix, vec![s]);
                }
            }
        }
    }
}

impl SourceReader for YamlReader {
    fn read(&self, content: &str) -> Result<SourceDocument> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        let mut document = SourceDocument::new();
        Self::flatten(&value, "", &mut document);
        Ok(document)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
