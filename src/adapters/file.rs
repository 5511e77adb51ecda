// SPDX-License-Identifier: MIT OR Apache-2.0

//! File settings source adapter.
//!
//! This module provides a source that reads settings from a file on disk, choosing the format
//! from the file extension. Properties files can also be written back.

use crate::adapters::PropertiesFormat;
use crate::domain::{ConfigError, Result, Settings, SourceDocument};
use crate::ports::{SettingsSource, SourceReader, SourceWriter};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Maximum allowed size for settings files (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "file";

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

fn io_error(message: String, e: std::io::Error) -> ConfigError {
    ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message,
        source: Some(Box::new(e)),
    }
}

/// Settings source backed by a file.
///
/// The file is read again on every [`load`](SettingsSource::load), so a reloadable chain picks up
/// edits. The document of the last load is kept; [`save`](Self::save) uses it to write changed
/// settings back with their comments.
///
/// | Extension             | Reader             | Saving |
/// |-----------------------|--------------------|--------|
/// | `properties`          | [`PropertiesFormat`] | yes  |
/// | `yaml`, `yml`         | `YamlReader` (feature `yaml`) | no |
///
/// # Examples
///
/// ```rust,no_run
/// use hexsettings::adapters::FileSource;
/// use hexsettings::prelude::*;
///
/// # fn main() -> Result<()> {
/// let source = FileSource::from_file("/etc/myapp/settings.properties")?;
/// let store = ValueStore::new();
/// store.load(&source)?;
///
/// store.put("server.port", vec!["9090".to_string()])?;
/// source.save(&store)?;
/// # Ok(())
/// # }
/// ```
pub struct FileSource {
    file_path: PathBuf,
    reader: Box<dyn SourceReader>,
    writer: Option<Box<dyn SourceWriter>>,
    last: RwLock<Option<SourceDocument>>,
}

impl FileSource {
    /// Creates a source for a specific file, choosing the reader from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SourceError`] if the path cannot be resolved or the extension is
    /// not supported.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "properties" => Ok(Self::with_reader(path, Box::new(PropertiesFormat::new()))?
                .with_writer(Box::new(PropertiesFormat::new()))),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Self::with_reader(path, Box::new(crate::adapters::YamlReader::new())),
            _ => Err(ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!("Unsupported settings file type: {}", display_name(path)),
                source: None,
            }),
        }
    }

    /// Creates a read-only source for a file using an explicit reader.
    pub fn with_reader<P: AsRef<Path>>(path: P, reader: Box<dyn SourceReader>) -> Result<Self> {
        let path = path.as_ref();
        // Canonicalize path to prevent directory traversal attacks
        let file_path = path.canonicalize().map_err(|e| {
            io_error(
                format!("Invalid or inaccessible path: {}", display_name(path)),
                e,
            )
        })?;

        Ok(Self {
            file_path,
            reader,
            writer: None,
            last: RwLock::new(None),
        })
    }

    /// Sets the writer used by [`save`](Self::save).
    pub fn with_writer(mut self, writer: Box<dyn SourceWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Creates a source for `filename` in the OS-specific configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `filename` - The file name (e.g., "settings.properties")
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use hexsettings::adapters::FileSource;
    ///
    /// let source =
    ///     FileSource::from_default_location("myapp", "com.example", "settings.properties").unwrap();
    /// ```
    pub fn from_default_location(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Self::from_file(proj_dirs.config_dir().join(filename))
    }

    /// Returns the canonical path of the file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Whether [`save`](Self::save) is supported for this file.
    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    fn read_content(&self) -> Result<String> {
        // Check file size before reading
        let metadata = fs::metadata(&self.file_path).map_err(|e| {
            io_error(
                format!(
                    "Failed to read file metadata: {}",
                    display_name(&self.file_path)
                ),
                e,
            )
        })?;

        if metadata.len() > MAX_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!(
                    "Settings file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_FILE_SIZE
                ),
                source: None,
            });
        }

        fs::read_to_string(&self.file_path).map_err(|e| {
            io_error(
                format!(
                    "Failed to read settings file: {}",
                    display_name(&self.file_path)
                ),
                e,
            )
        })
    }

    /// Writes the current entries of `settings` back to the file.
    ///
    /// The document of the last load (or the file as it is now, if it was never loaded) is
    /// brought in line with the settings snapshot, so comments and entry order are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SourceError`] if the file format cannot be written.
    pub fn save(&self, settings: &dyn Settings) -> Result<()> {
        let writer = self.writer.as_ref().ok_or_else(|| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Saving is not supported for {}",
                display_name(&self.file_path)
            ),
            source: None,
        })?;

        let mut document = match self.last.read().unwrap_or_else(PoisonError::into_inner).clone() {
            Some(document) => document,
            None => self.reader.read(&self.read_content()?)?,
        };
        document.refresh(&settings.snapshot()?);

        let content = writer.write(&document)?;
        fs::write(&self.file_path, content).map_err(|e| {
            io_error(
                format!(
                    "Failed to write settings file: {}",
                    display_name(&self.file_path)
                ),
                e,
            )
        })?;

        tracing::info!(
            "Saved {} settings to {}",
            document.len(),
            self.file_path.display()
        );
        *self.last.write().unwrap_or_else(PoisonError::into_inner) = Some(document);
        Ok(())
    }
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("file_path", &self.file_path)
            .field("writable", &self.is_writable())
            .finish()
    }
}

impl SettingsSource for FileSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn load(&self) -> Result<SourceDocument> {
        let document = self.reader.read(&self.read_content()?)?;
        tracing::debug!(
            "Read {} entries from {}",
            document.len(),
            self.file_path.display()
        );
        *self.last.write().unwrap_or_else(PoisonError::into_inner) = Some(document.clone());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SettingsExt;
    use crate::service::ValueStore;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_from_file_properties() {
        let file = temp_file(".properties", "port = 8080\n");
        let source = FileSource::from_file(file.path()).unwrap();
        assert!(source.is_writable());
        assert_eq!(source.name(), "file");

        let store = ValueStore::new();
        store.load(&source).unwrap();
        assert_eq!(store.get_i32(None, &["port"]).unwrap(), 8080);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_from_file_yaml_is_read_only() {
        let file = temp_file(".yaml", "server:\n  port: 8080\n");
        let source = FileSource::from_file(file.path()).unwrap();
        assert!(!source.is_writable());
        assert_eq!(
            source.load().unwrap().get("server.port"),
            Some(&["8080".to_string()][..])
        );

        let store = ValueStore::new();
        assert!(matches!(
            source.save(&store),
            Err(ConfigError::SourceError { .. })
        ));
    }

    #[test]
    fn test_from_file_errors() {
        assert!(FileSource::from_file("/nonexistent/settings.properties").is_err());

        let file = temp_file(".ini", "a = 1\n");
        assert!(matches!(
            FileSource::from_file(file.path()),
            Err(ConfigError::SourceError { .. })
        ));
    }

    #[test]
    fn test_load_sees_file_edits() {
        let file = temp_file(".properties", "a = 1\n");
        let source = FileSource::from_file(file.path()).unwrap();
        assert_eq!(source.load().unwrap().get("a"), Some(&["1".to_string()][..]));

        fs::write(file.path(), "a = 2\n").unwrap();
        assert_eq!(source.load().unwrap().get("a"), Some(&["2".to_string()][..]));
    }

    #[test]
    fn test_save_keeps_comments() {
        let file = temp_file(
            ".properties",
            "# listening port\nport = 8080\n# old\nlegacy = x\n\n# end of file\n",
        );
        let source = FileSource::from_file(file.path()).unwrap();
        let store = ValueStore::new();
        store.load(&source).unwrap();

        store.put("port", vec!["9090".to_string()]).unwrap();
        store.remove("legacy").unwrap();
        store.put("hosts", vec!["a".to_string(), "b".to_string()]).unwrap();
        source.save(&store).unwrap();

        let written = fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            written,
            "# listening port\nport = 9090\nhosts = a|b\n\n# end of file\n"
        );
    }

    #[test]
    fn test_save_without_prior_load() {
        let file = temp_file(".properties", "# keep me\nkey = old\n");
        let source = FileSource::from_file(file.path()).unwrap();
        let store = ValueStore::new();
        store.put("key", vec!["new".to_string()]).unwrap();
        source.save(&store).unwrap();

        let written = fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "# keep me\nkey = new\n");
    }
}
