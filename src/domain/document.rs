// SPDX-License-Identifier: MIT OR Apache-2.0

//! The parsed form of a settings file.
//!
//! Readers produce a [`SourceDocument`]: entries in file order, each with the comment lines
//! that preceded it. Keeping the comments lets a writer save changed settings back without
//! discarding the documentation around them.

use crate::domain::settings::Entries;

/// One entry of a settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceEntry {
    /// The setting key
    pub key: String,
    /// The raw values
    pub values: Vec<String>,
    /// Comment lines directly above the entry, without comment markers
    pub comments: Vec<String>,
}

impl SourceEntry {
    /// Creates an entry without comments.
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
            comments: Vec::new(),
        }
    }
}

/// Entries and comments of a settings file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    /// The entries in file order
    pub entries: Vec<SourceEntry>,
    /// Comment lines after the last entry
    pub trailing_comments: Vec<String>,
}

impl SourceDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the values of `key`, replacing an existing entry in place or appending a new one.
    pub fn set(&mut self, key: &str, values: Vec<String>) {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.values = values,
            None => self.entries.push(SourceEntry::new(key, values)),
        }
    }

    /// The values of `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.values.as_slice())
    }

    /// The entries as a map. A key repeated in the document keeps its last values.
    pub fn to_entries(&self) -> Entries {
        self.entries
            .iter()
            .map(|entry| (entry.key.clone(), entry.values.clone()))
            .collect()
    }

    /// Brings the document in line with `snapshot` while keeping comments and order.
    ///
    /// Entries missing from the snapshot are dropped along with their comments, changed entries
    /// are updated in place and new keys are appended in key order.
    pub fn refresh(&mut self, snapshot: &Entries) {
        self.entries.retain(|entry| snapshot.contains_key(&entry.key));
        for (key, values) in snapshot {
            self.set(key, values.clone());
        }
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Entries> for SourceDocument {
    fn from(entries: Entries) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, values)| SourceEntry::new(key, values))
                .collect(),
            trailing_comments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut document = SourceDocument::new();
        document.set("b", values(&["1"]));
        document.set("a", values(&["2"]));
        document.set("b", values(&["3"]));
        assert_eq!(document.len(), 2);
        assert_eq!(document.entries[0].key, "b");
        assert_eq!(document.get("b"), Some(values(&["3"]).as_slice()));
    }

    #[test]
    fn test_refresh_keeps_comments() {
        let mut document = SourceDocument::new();
        document.entries.push(SourceEntry {
            key: "port".to_string(),
            values: values(&["80"]),
            comments: vec!["listening port".to_string()],
        });
        document.entries.push(SourceEntry::new("stale", values(&["x"])));

        let mut snapshot = Entries::new();
        snapshot.insert("port".to_string(), values(&["8080"]));
        snapshot.insert("host".to_string(), values(&["localhost"]));
        document.refresh(&snapshot);

        assert_eq!(document.len(), 2);
        assert_eq!(document.entries[0].comments, vec!["listening port"]);
        assert_eq!(document.entries[0].values, values(&["8080"]));
        assert_eq!(document.entries[1].key, "host");
        assert!(document.get("stale").is_none());
    }

    #[test]
    fn test_to_entries() {
        let mut document = SourceDocument::new();
        document.set("k", values(&["a", "b"]));
        let entries = document.to_entries();
        assert_eq!(entries.get("k"), Some(&values(&["a", "b"])));
    }
}
