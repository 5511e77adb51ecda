// SPDX-License-Identifier: MIT OR Apache-2.0

//! Properties-style settings format.
//!
//! ```text
//! # Comment lines start with '#' or '!' and attach to the next entry
//! server.host = example.org
//! server.ports : 80|443
//! long.list = first|\
//!             second
//! flag.without.value
//! ```
//!
//! Keys and values are separated by the first unescaped `=` or `:`, and both are trimmed.
//! Values are split into elements on the unescaped array separator (`|` by default). A line
//! ending in an odd number of backslashes continues on the next line. A key without separator
//! has no values.

use crate::domain::escape::DEFAULT_SEPARATOR;
use crate::domain::{ConfigError, Escaper, Result, SourceDocument, SourceEntry};
use crate::ports::{SourceReader, SourceWriter};

/// Reads and writes the properties format, keeping comments.
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::PropertiesFormat;
/// use hexsettings::ports::{SourceReader, SourceWriter};
///
/// let format = PropertiesFormat::new();
/// let document = format.read("# the port\nport = 8080\nhosts = a|b\n").unwrap();
/// assert_eq!(document.get("hosts").map(|v| v.len()), Some(2));
/// assert_eq!(document.entries[0].comments, vec!["the port"]);
///
/// let text = format.write(&document).unwrap();
/// assert_eq!(text, "# the port\nport = 8080\nhosts = a|b\n");
/// ```
#[derive(Debug, Clone)]
pub struct PropertiesFormat {
    values: Escaper,
    keys: Escaper,
}

impl PropertiesFormat {
    /// Creates a format using the default array separator.
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    /// Creates a format using a custom array separator.
    pub fn with_separator(separator: char) -> Self {
        Self {
            values: Escaper::new(separator),
            keys: Escaper::new('=').escaping([':', '#', '!']),
        }
    }

    fn is_comment(line: &str) -> bool {
        line.starts_with('#') || line.starts_with('!')
    }

    fn continues(line: &str) -> bool {
        line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
    }

    // Splits at the first unescaped '=' or ':'
    fn split_pair(line: &str) -> (&str, Option<&str>) {
        let mut escaped = false;
        for (i, c) in line.char_indices() {
            match c {
                '\\' if !escaped => escaped = true,
                '=' | ':' if !escaped => return (&line[..i], Some(&line[i + 1..])),
                _ => escaped = false,
            }
        }
        (line, None)
    }
}

impl Default for PropertiesFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceReader for PropertiesFormat {
    fn read(&self, content: &str) -> Result<SourceDocument> {
        let mut document = SourceDocument::new();
        let mut comments = Vec::new();
        let mut lines = content.lines();

        while let Some(line) = lines.next() {
            let line = line.trim_start();
            if line.is_empty() {
                continue;
            }
            if Self::is_comment(line) {
                comments.push(line[1..].trim().to_string());
                continue;
            }

            let mut logical = line.to_string();
            while Self::continues(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = Self::split_pair(&logical);
            let key = self.keys.unescape(key.trim());
            if key.is_empty() {
                return Err(ConfigError::ParseError {
                    message: format!("Entry without key: '{}'", logical),
                    source: None,
                });
            }
            let values = match value {
                Some(value) => self.values.split(value.trim()),
                None => Vec::new(),
            };

            match document.entries.iter_mut().find(|e| e.key == key) {
                Some(existing) => {
                    tracing::debug!("Duplicate properties key '{}', keeping the last", key);
                    existing.values = values;
                    existing.comments.append(&mut comments);
                }
                None => document.entries.push(SourceEntry {
                    key,
                    values,
                    comments: std::mem::take(&mut comments),
                }),
            }
        }

        document.trailing_comments = comments;
        Ok(document)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["properties"]
    }
}

impl SourceWriter for PropertiesFormat {
    fn write(&self, document: &SourceDocument) -> Result<String> {
        let mut out = String::new();
        let write_comment = |out: &mut String, comment: &str| {
            if comment.is_empty() {
                out.push_str("#\n");
            } else {
                out.push_str("# ");
                out.push_str(comment);
                out.push('\n');
            }
        };

        for entry in &document.entries {
            if let Some(bad) = entry.values.iter().find(|v| v.contains(['\n', '\r'])) {
                return Err(ConfigError::InvalidArgument {
                    message: format!(
                        "Value {:?} of key '{}' spans several lines",
                        bad, entry.key
                    ),
                });
            }
            for comment in &entry.comments {
                write_comment(&mut out, comment);
            }
            out.push_str(&self.keys.escape(&entry.key));
            if !entry.values.is_empty() {
                out.push_str(" = ");
                out.push_str(&self.values.join(&entry.values));
            }
            out.push('\n');
        }

        if !document.trailing_comments.is_empty() {
            out.push('\n');
            for comment in &document.trailing_comments {
                write_comment(&mut out, comment);
            }
        }
        Ok(out)
    }
}
