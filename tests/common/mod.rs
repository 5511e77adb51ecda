// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use hexsettings::prelude::*;
use std::sync::{Arc, Mutex, RwLock};

/// Converts string literals into owned raw values.
pub fn raw(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// A source whose document can be swapped between loads.
#[derive(Clone, Default)]
pub struct MemorySource {
    document: Arc<RwLock<SourceDocument>>,
}

impl MemorySource {
    pub fn with(entries: &[(&str, &[&str])]) -> Self {
        let source = Self::default();
        source.replace(entries);
        source
    }

    pub fn replace(&self, entries: &[(&str, &[&str])]) {
        let mut document = SourceDocument::new();
        for (key, values) in entries {
            document.set(key, raw(values));
        }
        *self.document.write().unwrap() = document;
    }
}

impl SettingsSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self) -> Result<SourceDocument> {
        Ok(self.document.read().unwrap().clone())
    }
}

/// Records every change event it receives.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ChangeEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<ChangeEvent> {
        self.events.lock().unwrap().last().cloned()
    }
}

impl ChangeObserver for RecordingObserver {
    fn settings_changed(&self, event: &ChangeEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Routes log output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
