//! Health checks for a clipnote setup.
//!
//! Validation itself lives in [`crate::config`]; this module builds the
//! synthetic probe entry and performs the optional end-to-end delivery that
//! verifies endpoint and document access.

use chrono::Local;

use crate::config::Config;
use crate::delivery::{Deliver, DeliveryClient};
use crate::entry::DeliveryPayload;
use crate::error::{Error, Result};

/// Tag preferred for the probe entry when present in the map.
const PROBE_TAG: &str = "misc";

/// Build the synthetic probe payload for `healthcheck --probe`.
///
/// Prefers the `misc` tag; otherwise falls back to the first entry of the
/// tag map. Returns `None` when the tag map is empty.
#[must_use]
pub fn probe_payload(config: &Config) -> Option<DeliveryPayload> {
    let (tag, section) = match config.tag_map.get_key_value(PROBE_TAG) {
        Some((tag, section)) => (tag.clone(), section.clone()),
        None => {
            let (tag, section) = config.tag_map.iter().next()?;
            (tag.clone(), section.clone())
        }
    };

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    Some(DeliveryPayload {
        tag,
        section: section.trim().to_string(),
        text: format!("[healthcheck] {timestamp}"),
        who: config.sender.clone(),
    })
}

/// Send the probe entry through one real delivery attempt.
///
/// Returns the payload that was sent so the caller can report its section.
///
/// # Errors
///
/// Returns an error when the configuration has no usable tag entry or the
/// delivery attempt fails.
pub async fn probe(config: &Config) -> Result<DeliveryPayload> {
    let payload = probe_payload(config)
        .ok_or_else(|| Error::config_validation("tag_map has no entry to probe with"))?;

    let client = DeliveryClient::new(&config.endpoint_url, config.delivery_timeout())?;
    client.deliver(&payload).await?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tag_map;

    fn config_with_defaults() -> Config {
        let mut config = Config {
            endpoint_url: "https://script.google.com/macros/s/abc/exec".to_string(),
            ..Config::default()
        };
        config.normalize();
        config
    }

    #[test]
    fn test_probe_prefers_misc() {
        let payload = probe_payload(&config_with_defaults()).unwrap();
        assert_eq!(payload.tag, "misc");
        assert_eq!(payload.section, "Miscellany");
    }

    #[test]
    fn test_probe_falls_back_to_first_entry() {
        let mut config = config_with_defaults();
        config.tag_map.remove("misc");

        let payload = probe_payload(&config).unwrap();
        assert!(config.tag_map.contains_key(&payload.tag));
        assert!(!payload.section.is_empty());
    }

    #[test]
    fn test_probe_text_is_timestamped() {
        let payload = probe_payload(&config_with_defaults()).unwrap();
        assert!(payload.text.starts_with("[healthcheck] "));
        // "[healthcheck] " plus "YYYY-MM-DD HH:MM:SS"
        assert_eq!(payload.text.len(), "[healthcheck] ".len() + 19);
    }

    #[test]
    fn test_probe_carries_sender() {
        let mut config = config_with_defaults();
        config.sender = "alex".to_string();

        let payload = probe_payload(&config).unwrap();
        assert_eq!(payload.who, "alex");
    }

    #[test]
    fn test_probe_none_on_empty_map() {
        let mut config = config_with_defaults();
        config.tag_map.clear();

        assert!(probe_payload(&config).is_none());
    }

    #[tokio::test]
    async fn test_probe_fails_on_empty_map() {
        let mut config = config_with_defaults();
        config.tag_map.clear();

        let err = probe(&config).await.unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }
}
