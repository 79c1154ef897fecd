//! Tagged-text classification.
//!
//! This module turns raw captured text into a [`ClassifiedEntry`] by
//! matching a `tag:` prefix on the first non-empty line and resolving the
//! tag through the configured tag map.

use std::collections::BTreeMap;

use regex::Regex;

use crate::config::UnknownTagPolicy;
use crate::entry::ClassifiedEntry;

/// Pattern for a tagged line: alphanumeric prefix, colon, remainder.
const TAG_PATTERN: &str = "^([A-Za-z0-9]+):(.*)$";

/// Tag substituted under [`UnknownTagPolicy::MapToMisc`].
const FALLBACK_TAG: &str = "misc";

/// Classifies raw clipboard text against a tag map.
///
/// Classification is a pure function of the input text and the policy/map
/// captured at construction; it performs no I/O and reads no global state.
#[derive(Debug, Clone)]
pub struct Classifier {
    pattern: Regex,
    policy: UnknownTagPolicy,
    tags: BTreeMap<String, String>,
}

impl Classifier {
    /// Create a classifier for the given policy and normalized tag map.
    #[must_use]
    pub fn new(policy: UnknownTagPolicy, tags: BTreeMap<String, String>) -> Self {
        let pattern = Regex::new(TAG_PATTERN).expect("tag pattern is a valid regex");
        Self {
            pattern,
            policy,
            tags,
        }
    }

    /// Classify raw text into an entry, or `None` when there is nothing to
    /// deliver.
    ///
    /// Only the first line with non-whitespace content is considered. That
    /// line must carry an alphanumeric `tag:` prefix followed by non-empty
    /// text. A tag absent from the map is handled per the configured policy:
    /// rewritten to `misc` (absent result if `misc` itself is unmapped) or
    /// dropped.
    #[must_use]
    pub fn classify(&self, raw_text: &str) -> Option<ClassifiedEntry> {
        let line = raw_text.lines().map(str::trim).find(|l| !l.is_empty())?;

        let captures = self.pattern.captures(line)?;
        let text = captures[2].trim();
        if text.is_empty() {
            return None;
        }

        let mut tag = captures[1].to_lowercase();
        if !self.tags.contains_key(&tag) {
            match self.policy {
                UnknownTagPolicy::MapToMisc => tag = FALLBACK_TAG.to_string(),
                UnknownTagPolicy::Ignore => return None,
            }
        }

        let section = self.tags.get(&tag)?.trim();
        if section.is_empty() {
            return None;
        }

        Some(ClassifiedEntry {
            tag,
            section: section.to_string(),
            text: text.to_string(),
        })
    }
}
