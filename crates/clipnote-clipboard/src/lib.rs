//! Clipboard access for clipnote.
//!
//! This crate wraps the system clipboard behind a small point-in-time read
//! interface. Change tracking and the poll loop live in the core crate; this
//! layer only answers "what text does the clipboard hold right now".

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clipboard_rs::{Clipboard, ClipboardContext};
use thiserror::Error;
use tracing::trace;

/// Errors that can occur while reading the clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Failed to access the clipboard.
    #[error("clipboard access failed: {0}")]
    AccessFailed(String),
}

/// Result type for clipboard operations.
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// A point-in-time reader for the system clipboard.
///
/// A fresh clipboard context is opened per read, so the type itself holds no
/// platform handles and reads always observe the current owner's content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipboardSource;

impl ClipboardSource {
    /// Create a new clipboard source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Read the current clipboard text.
    ///
    /// Returns `Ok(None)` when the clipboard is empty or holds non-text
    /// content.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard context cannot be opened.
    pub fn read_text(&self) -> Result<Option<String>> {
        let ctx =
            ClipboardContext::new().map_err(|e| ClipboardError::AccessFailed(e.to_string()))?;

        match ctx.get_text() {
            Ok(text) if !text.is_empty() => Ok(Some(text)),
            // No text content or non-text clipboard is not an error
            Ok(_) | Err(_) => {
                trace!("clipboard holds no text content");
                Ok(None)
            }
        }
    }
}
