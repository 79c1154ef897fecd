//! Configuration management for clipnote.
//!
//! This module provides configuration loading, normalization, and validation
//! using figment, supporting a TOML config file, environment variables, and
//! defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "clipnote";

/// Scheme/host prefix the endpoint URL must carry.
const ENDPOINT_PREFIX: &str = "https://script.google.com/";

/// Sender identity used when none is configured.
const DEFAULT_SENDER: &str = "ME";

/// Fallback poll interval in seconds.
const DEFAULT_POLL_INTERVAL_SECONDS: f64 = 0.5;

/// Default delivery timeout in seconds.
const DEFAULT_DELIVERY_TIMEOUT_SECONDS: u64 = 10;

/// Behavior applied when a tagged line's tag is not in the tag map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTagPolicy {
    /// Rewrite the tag to `misc` and deliver into its section.
    #[default]
    MapToMisc,
    /// Drop the entry.
    Ignore,
}

impl std::fmt::Display for UnknownTagPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapToMisc => write!(f, "map_to_misc"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CLIPNOTE_`)
/// 2. TOML config file at `~/.config/clipnote/config.toml`
/// 3. Default values
///
/// Loading normalizes the tag map (built-in defaults overlaid with
/// case-folded user entries); the result is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the remote web app endpoint. Required.
    pub endpoint_url: String,

    /// Link to the target document, logged at startup. Informational only.
    pub doc_url: Option<String>,

    /// Sender identity attached to every delivered entry.
    pub sender: String,

    /// Seconds between clipboard samples.
    pub poll_interval_seconds: f64,

    /// Total timeout for one delivery attempt, in seconds.
    pub delivery_timeout_seconds: u64,

    /// What to do with tags missing from the tag map.
    pub unknown_tag_policy: UnknownTagPolicy,

    /// Mapping from lowercase tag to destination section title.
    ///
    /// Holds the raw user entries until [`Config::normalize`] merges them
    /// over the built-in defaults.
    pub tag_map: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            doc_url: None,
            sender: DEFAULT_SENDER.to_string(),
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            delivery_timeout_seconds: DEFAULT_DELIVERY_TIMEOUT_SECONDS,
            unknown_tag_policy: UnknownTagPolicy::default(),
            tag_map: BTreeMap::new(),
        }
    }
}

/// Built-in tag map entries.
///
/// Always present in a normalized configuration unless overridden by the
/// same case-folded key.
#[must_use]
pub fn default_tag_map() -> BTreeMap<String, String> {
    [
        ("todo", "TODO"),
        ("next", "Next Actions"),
        ("idea", "Ideas"),
        ("misc", "Miscellany"),
    ]
    .into_iter()
    .map(|(tag, section)| (tag.to_string(), section.to_string()))
    .collect()
}

impl Config {
    /// Load configuration from the default sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is missing, fails to parse, or
    /// lacks the required `endpoint_url` field.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// The returned configuration is already normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is missing, fails to parse, or
    /// lacks the required `endpoint_url` field.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        if !config_file.exists() {
            return Err(Error::ConfigMissing { path: config_file });
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CLIPNOTE_").split("__"));

        let mut config: Config = figment.extract()?;
        config.normalize();

        if config.endpoint_url.is_empty() {
            return Err(Error::config_validation(
                "missing required field: endpoint_url",
            ));
        }

        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Normalize the configuration in place.
    ///
    /// Overlays the user-supplied tag entries on the built-in defaults,
    /// case-folding and trimming keys, and restores the default sender when
    /// the configured one is blank. A default entry survives unless the same
    /// folded key overrides it; entries whose folded key is empty are
    /// dropped. Normalization is a pure function of the defaults and the
    /// loaded values.
    pub fn normalize(&mut self) {
        self.endpoint_url = self.endpoint_url.trim().to_string();

        let sender = self.sender.trim();
        self.sender = if sender.is_empty() {
            DEFAULT_SENDER.to_string()
        } else {
            sender.to_string()
        };

        self.doc_url = self
            .doc_url
            .take()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let mut merged = default_tag_map();
        for (key, section) in &self.tag_map {
            let folded = key.trim().to_lowercase();
            if !folded.is_empty() {
                merged.insert(folded, section.clone());
            }
        }
        self.tag_map = merged;
    }

    /// Validate the configuration.
    ///
    /// Collects every problem found rather than stopping at the first; an
    /// empty list means the configuration is valid. Validation never loads
    /// or mutates anything, so it can be run on raw or normalized values
    /// alike.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut diagnostics = Vec::new();

        let url = self.endpoint_url.trim();
        if url.is_empty() {
            diagnostics.push("endpoint_url is missing".to_string());
        } else if url.contains('<') || url.contains('>') {
            diagnostics.push("endpoint_url still contains placeholder text".to_string());
        } else if !url.starts_with(ENDPOINT_PREFIX) {
            diagnostics.push(format!("endpoint_url should start with {ENDPOINT_PREFIX}"));
        }

        if self.tag_map.is_empty() {
            diagnostics.push("tag_map must be a non-empty table".to_string());
        }
        for (key, section) in &self.tag_map {
            let tag = key.trim();
            if tag.is_empty() {
                diagnostics.push("tag_map contains an empty key".to_string());
            }
            if tag.contains(':') {
                diagnostics.push(format!("tag_map key '{tag}' must not include ':'"));
            }
            if section.trim().is_empty() {
                diagnostics.push(format!("tag_map value for '{tag}' is empty"));
            }
        }

        if !(self.poll_interval_seconds.is_finite() && self.poll_interval_seconds > 0.0) {
            diagnostics.push("poll_interval_seconds must be a positive number".to_string());
        }

        diagnostics
    }

    /// Get the poll interval as a Duration.
    ///
    /// Falls back to the default interval when the configured value is not a
    /// positive finite number; `validate` reports such values.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        if self.poll_interval_seconds.is_finite() && self.poll_interval_seconds > 0.0 {
            Duration::from_secs_f64(self.poll_interval_seconds)
        } else {
            Duration::from_secs_f64(DEFAULT_POLL_INTERVAL_SECONDS)
        }
    }

    /// Get the delivery timeout as a Duration.
    #[must_use]
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.endpoint_url.is_empty());
        assert_eq!(config.sender, "ME");
        assert!((config.poll_interval_seconds - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.delivery_timeout_seconds, 10);
        assert_eq!(config.unknown_tag_policy, UnknownTagPolicy::MapToMisc);
        assert!(config.tag_map.is_empty());
    }

    #[test]
    fn test_default_tag_map_entries() {
        let map = default_tag_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get("todo").map(String::as_str), Some("TODO"));
        assert_eq!(map.get("next").map(String::as_str), Some("Next Actions"));
        assert_eq!(map.get("idea").map(String::as_str), Some("Ideas"));
        assert_eq!(map.get("misc").map(String::as_str), Some("Miscellany"));
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let mut config = Config {
            endpoint_url: "https://script.google.com/macros/s/abc/exec".to_string(),
            ..Config::default()
        };
        config.normalize();

        assert_eq!(config.sender, "ME");
        assert_eq!(config.unknown_tag_policy, UnknownTagPolicy::MapToMisc);
        assert_eq!(config.tag_map, default_tag_map());
    }

    #[test]
    fn test_normalize_merges_user_entries_over_defaults() {
        let mut config = Config::default();
        config
            .tag_map
            .insert("book".to_string(), "Reading List".to_string());
        config.normalize();

        assert_eq!(config.tag_map.len(), 5);
        assert_eq!(
            config.tag_map.get("book").map(String::as_str),
            Some("Reading List")
        );
        assert_eq!(config.tag_map.get("todo").map(String::as_str), Some("TODO"));
    }

    #[test]
    fn test_normalize_case_folds_keys() {
        let mut config = Config::default();
        config
            .tag_map
            .insert("TODO".to_string(), "Tasks".to_string());
        config.normalize();

        assert_eq!(config.tag_map.get("todo").map(String::as_str), Some("Tasks"));
        assert!(!config.tag_map.contains_key("TODO"));
    }

    #[test]
    fn test_normalize_drops_blank_keys() {
        let mut config = Config::default();
        config.tag_map.insert("   ".to_string(), "Lost".to_string());
        config.normalize();

        assert_eq!(config.tag_map, default_tag_map());
    }

    #[test]
    fn test_normalize_restores_blank_sender() {
        let mut config = Config {
            sender: "   ".to_string(),
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.sender, "ME");
    }

    #[test]
    fn test_normalize_trims_and_drops_empty_doc_url() {
        let mut config = Config {
            doc_url: Some("  https://docs.google.com/document/d/x/edit  ".to_string()),
            ..Config::default()
        };
        config.normalize();
        assert_eq!(
            config.doc_url.as_deref(),
            Some("https://docs.google.com/document/d/x/edit")
        );

        config.doc_url = Some("   ".to_string());
        config.normalize();
        assert!(config.doc_url.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let mut config = Config {
            endpoint_url: "https://script.google.com/macros/s/abc/exec".to_string(),
            ..Config::default()
        };
        config.normalize();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_missing_endpoint() {
        let mut config = Config::default();
        config.normalize();

        let diagnostics = config.validate();
        assert!(diagnostics.iter().any(|d| d.contains("endpoint_url is missing")));
    }

    #[test]
    fn test_validate_placeholder_endpoint() {
        let config = Config {
            endpoint_url: "https://script.google.com/macros/s/<YOUR_DEPLOYMENT_ID>/exec"
                .to_string(),
            tag_map: default_tag_map(),
            ..Config::default()
        };

        let diagnostics = config.validate();
        assert!(diagnostics.iter().any(|d| d.contains("placeholder")));
    }

    #[test]
    fn test_validate_wrong_endpoint_prefix() {
        let config = Config {
            endpoint_url: "https://example.com/webhook".to_string(),
            tag_map: default_tag_map(),
            ..Config::default()
        };

        let diagnostics = config.validate();
        assert!(diagnostics
            .iter()
            .any(|d| d.contains("https://script.google.com/")));
    }

    #[test]
    fn test_validate_empty_tag_map() {
        let config = Config {
            endpoint_url: "https://script.google.com/macros/s/abc/exec".to_string(),
            ..Config::default()
        };

        let diagnostics = config.validate();
        assert!(diagnostics.iter().any(|d| d.contains("non-empty")));
    }

    #[test]
    fn test_validate_collects_all_tag_map_problems() {
        let mut config = Config {
            endpoint_url: "https://script.google.com/macros/s/abc/exec".to_string(),
            ..Config::default()
        };
        config.tag_map.insert(String::new(), "Somewhere".to_string());
        config
            .tag_map
            .insert("a:b".to_string(), "Elsewhere".to_string());
        config.tag_map.insert("empty".to_string(), "  ".to_string());

        let diagnostics = config.validate();
        assert!(diagnostics.len() >= 3);
        assert!(diagnostics.iter().any(|d| d.contains("empty key")));
        assert!(diagnostics.iter().any(|d| d.contains("must not include ':'")));
        assert!(diagnostics.iter().any(|d| d.contains("value for 'empty' is empty")));
    }

    #[test]
    fn test_validate_non_positive_interval() {
        let config = Config {
            endpoint_url: "https://script.google.com/macros/s/abc/exec".to_string(),
            poll_interval_seconds: 0.0,
            tag_map: default_tag_map(),
            ..Config::default()
        };

        let diagnostics = config.validate();
        assert!(diagnostics.iter().any(|d| d.contains("positive")));
    }

    #[test]
    fn test_validate_nan_interval() {
        let config = Config {
            endpoint_url: "https://script.google.com/macros/s/abc/exec".to_string(),
            poll_interval_seconds: f64::NAN,
            tag_map: default_tag_map(),
            ..Config::default()
        };

        let diagnostics = config.validate();
        assert!(diagnostics.iter().any(|d| d.contains("positive")));
    }

    #[test]
    fn test_poll_interval() {
        let config = Config {
            poll_interval_seconds: 2.0,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_poll_interval_falls_back_on_invalid_values() {
        let config = Config {
            poll_interval_seconds: -1.0,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(500));

        let config = Config {
            poll_interval_seconds: f64::NAN,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_delivery_timeout() {
        let config = Config::default();
        assert_eq!(config.delivery_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("clipnote"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(matches!(result, Err(Error::ConfigMissing { .. })));
    }

    #[test]
    fn test_load_minimal_file_round_trip() {
        let path = write_temp_config(
            "clipnote-test-minimal.toml",
            r#"endpoint_url = "https://script.google.com/macros/s/abc/exec""#,
        );

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.sender, "ME");
        assert_eq!(config.unknown_tag_policy, UnknownTagPolicy::MapToMisc);
        assert_eq!(config.tag_map, default_tag_map());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_load_full_file() {
        let path = write_temp_config(
            "clipnote-test-full.toml",
            r#"
endpoint_url = "https://script.google.com/macros/s/abc/exec"
doc_url = "https://docs.google.com/document/d/x/edit"
sender = "alex"
poll_interval_seconds = 1.5
delivery_timeout_seconds = 8
unknown_tag_policy = "ignore"

[tag_map]
BOOK = "Reading List"
"#,
        );

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.sender, "alex");
        assert_eq!(config.unknown_tag_policy, UnknownTagPolicy::Ignore);
        assert_eq!(config.delivery_timeout(), Duration::from_secs(8));
        assert_eq!(
            config.tag_map.get("book").map(String::as_str),
            Some("Reading List")
        );
        assert_eq!(config.tag_map.get("todo").map(String::as_str), Some("TODO"));
    }

    #[test]
    fn test_load_missing_endpoint_is_fatal() {
        let path = write_temp_config("clipnote-test-noendpoint.toml", r#"sender = "alex""#);

        let result = Config::load_from(Some(path));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_load_invalid_policy_is_fatal() {
        let path = write_temp_config(
            "clipnote-test-badpolicy.toml",
            r#"
endpoint_url = "https://script.google.com/macros/s/abc/exec"
unknown_tag_policy = "shrug"
"#,
        );

        let result = Config::load_from(Some(path));
        assert!(matches!(result, Err(Error::ConfigLoad(_))));
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(UnknownTagPolicy::MapToMisc.to_string(), "map_to_misc");
        assert_eq!(UnknownTagPolicy::Ignore.to_string(), "ignore");
    }

    #[test]
    fn test_config_clone_and_eq() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
