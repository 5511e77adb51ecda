// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system watcher for settings file changes.
//!
//! This module provides a watcher that monitors a settings file and triggers a callback once
//! modifications have settled.

use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeCallback, ConfigWatcher};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// File system watcher for settings files.
///
/// Events are debounced: the callback fires once no further event for the file arrived
/// during the debounce delay, so an editor writing a file in several steps triggers a
/// single reload of the final content.
///
/// # Examples
///
/// ```rust,no_run
/// use hexsettings::adapters::FileWatcher;
/// use hexsettings::ports::ConfigWatcher;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # fn main() -> hexsettings::domain::Result<()> {
/// let mut watcher = FileWatcher::new("/path/to/settings.properties", None)?;
///
/// watcher.watch(Arc::new(|path: &Path| {
///     println!("Settings changed: {}", path.display());
/// }))?;
///
/// // Later, stop watching
/// watcher.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileWatcher {
    /// Canonical path of the watched file
    file_path: PathBuf,
    /// Debounce delay (default 500ms)
    debounce_delay: Duration,
    watcher: Option<RecommendedWatcher>,
    watch_thread: Option<JoinHandle<()>>,
    stop_tx: Option<Sender<()>>,
}

impl FileWatcher {
    /// Creates a new file watcher for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file to watch
    /// * `debounce_delay` - Optional debounce delay (default 500ms)
    pub fn new(path: impl AsRef<Path>, debounce_delay: Option<Duration>) -> Result<Self> {
        let path = path.as_ref();
        let file_path = path.canonicalize().map_err(|e| ConfigError::WatcherError {
            message: format!("File does not exist: {}", path.display()),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            file_path,
            debounce_delay: debounce_delay.unwrap_or(DEFAULT_DEBOUNCE),
            watcher: None,
            watch_thread: None,
            stop_tx: None,
        })
    }

    /// Returns the canonical path of the watched file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Whether the watcher is running.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }
}

impl ConfigWatcher for FileWatcher {
    fn watch(&mut self, callback: ChangeCallback) -> Result<()> {
        if self.watcher.is_some() {
            return Err(ConfigError::WatcherError {
                message: "Watcher is already running".to_string(),
                source: None,
            });
        }

        let (event_tx, event_rx) = channel::<notify::Result<Event>>();
        let (stop_tx, stop_rx) = channel::<()>();

        let mut watcher =
            RecommendedWatcher::new(event_tx, notify::Config::default()).map_err(|e| {
                ConfigError::WatcherError {
                    message: format!("Failed to create file watcher: {}", e),
                    source: Some(Box::new(e)),
                }
            })?;

        // Watch the parent directory so replace-by-rename saves are seen
        let watch_path = self
            .file_path
            .parent()
            .ok_or_else(|| ConfigError::WatcherError {
                message: "Failed to get parent directory".to_string(),
                source: None,
            })?
            .to_path_buf();

        watcher
            .watch(&watch_path, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Failed to start watching: {}", e),
                source: Some(Box::new(e)),
            })?;

        let file_path = self.file_path.clone();
        let debounce_delay = self.debounce_delay;

        let watch_thread = thread::spawn(move || {
            let mut pending: Option<Instant> = None;

            loop {
                if stop_rx.try_recv().is_ok() {
                    break;
                }

                match event_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(Ok(event)) => {
                        let ours = event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == file_path.file_name());
                        if ours {
                            pending = Some(Instant::now());
                        }
                    }
                    Ok(Err(e)) => tracing::warn!("File watcher error: {}", e),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }

                if let Some(last) = pending {
                    if last.elapsed() >= debounce_delay {
                        pending = None;
                        tracing::debug!("Settings file changed: {}", file_path.display());
                        callback(&file_path);
                    }
                }
            }
        });

        tracing::debug!("Watching {}", self.file_path.display());
        self.watcher = Some(watcher);
        self.stop_tx = Some(stop_tx);
        self.watch_thread = Some(watch_thread);

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(handle) = self.watch_thread.take() {
            handle.join().map_err(|_| ConfigError::WatcherError {
                message: "Failed to join watcher thread".to_string(),
                source: None,
            })?;
        }

        self.watcher = None;

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
