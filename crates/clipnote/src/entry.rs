//! Core entry types for clipnote.
//!
//! This module defines the classified entry produced from captured clipboard
//! text and the wire units posted to the remote document endpoint.

use serde::Serialize;

/// A tagged clipboard line resolved to its destination section.
///
/// Produced by the classifier for each accepted clipboard change and
/// discarded once the delivery attempt for that cycle completes. The
/// `section` always resolves from the tag map and `text` is always non-empty
/// and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    /// Resolved lowercase tag (a key of the tag map).
    pub tag: String,
    /// Destination section title the tag maps to.
    pub section: String,
    /// The entry text with surrounding whitespace removed.
    pub text: String,
}

impl ClassifiedEntry {
    /// Attach a sender identity, producing the wire payload.
    #[must_use]
    pub fn into_payload(self, sender: impl Into<String>) -> DeliveryPayload {
        DeliveryPayload {
            tag: self.tag,
            section: self.section,
            text: self.text,
            who: sender.into(),
        }
    }
}

/// The JSON body posted to the endpoint for a normal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryPayload {
    /// Resolved tag; the endpoint expects it under the `type` key.
    #[serde(rename = "type")]
    pub tag: String,
    /// Destination section title.
    pub section: String,
    /// The entry text.
    pub text: String,
    /// Sender identity from the configuration.
    pub who: String,
}

/// The JSON body posted to the endpoint to create missing section headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnsureSectionsRequest {
    action: &'static str,
    sections: Vec<String>,
}

impl EnsureSectionsRequest {
    /// Create an `ensure_sections` request for the given section titles.
    #[must_use]
    pub fn new(sections: Vec<String>) -> Self {
        Self {
            action: "ensure_sections",
            sections,
        }
    }
}
