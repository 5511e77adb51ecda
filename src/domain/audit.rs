// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage audit of a settings chain.

use crate::domain::errors::Result;
use crate::domain::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The keys a program never read, and the keys it asked for but did not find.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Identifier of the audited store
    pub id: Option<String>,
    /// Present keys that were never read
    pub unused: BTreeSet<String>,
    /// Candidate keys that were looked up and absent
    pub not_present: BTreeSet<String>,
}

impl AuditReport {
    /// Collects both audit sets through the given node.
    pub fn collect<S: Settings + ?Sized>(settings: &S) -> Result<Self> {
        Ok(Self {
            id: settings.id(),
            unused: settings.unused_keys()?,
            not_present: settings.not_present_keys()?,
        })
    }

    /// Returns `true` if every key was read and every lookup found its key.
    pub fn is_clean(&self) -> bool {
        self.unused.is_empty() && self.not_present.is_empty()
    }

    /// Logs the report at info level.
    pub fn log(&self) {
        let id = self.id.as_deref().unwrap_or("settings");
        if self.is_clean() {
            tracing::info!("{}: all keys used", id);
            return;
        }
        for key in &self.unused {
            tracing::info!("{}: unused key '{}'", id, key);
        }
        for key in &self.not_present {
            tracing::info!("{}: key '{}' was requested but not present", id, key);
        }
    }
}
