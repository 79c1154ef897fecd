//! Section heading preparation.
//!
//! Collects the distinct section titles from the tag map so the endpoint can
//! create any missing document headings before first use. The actual
//! `ensure_sections` request lives on [`crate::delivery::DeliveryClient`].

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};

/// Marker in a rejection body identifying an endpoint deployment that
/// predates the `ensure_sections` action.
pub const OUTDATED_DEPLOYMENT_MARKER: &str = "Missing required field: type";

/// Collect the distinct, non-empty section titles from a tag map.
///
/// Titles keep their first-seen order; duplicates and blank titles are
/// skipped.
///
/// # Errors
///
/// Returns an error when the map yields no usable titles.
pub fn section_titles(tag_map: &BTreeMap<String, String>) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut titles = Vec::new();

    for value in tag_map.values() {
        let title = value.trim();
        if title.is_empty() || !seen.insert(title.to_string()) {
            continue;
        }
        titles.push(title.to_string());
    }

    if titles.is_empty() {
        return Err(Error::config_validation(
            "tag_map contains no section titles",
        ));
    }
    Ok(titles)
}
