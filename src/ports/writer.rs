// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings writer trait definition.

use crate::domain::{Result, SourceDocument};

/// A trait for rendering settings documents back to text.
///
/// Writers are the inverse of [`SourceReader`](crate::ports::SourceReader): reading the output
/// of `write` with the matching reader yields the same keys and values. Comments are written
/// where the format can represent them.
pub trait SourceWriter: Send + Sync {
    /// Renders the document.
    fn write(&self, document: &SourceDocument) -> Result<String>;
}
