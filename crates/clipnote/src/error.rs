//! Error types for clipnote.
//!
//! This module defines the crate-wide error type covering configuration and
//! delivery failures. Components with their own failure taxonomy keep a local
//! error enum next to their implementation ([`crate::delivery::DeliveryError`],
//! [`crate::watcher::SampleError`]).

use std::path::PathBuf;
use thiserror::Error;

use crate::delivery::DeliveryError;

/// The main error type for clipnote operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// The configuration file does not exist.
    #[error("config file not found at {path}: copy config.example.toml there and update values")]
    ConfigMissing {
        /// Path that was checked.
        path: PathBuf,
    },

    /// Failed to load or parse configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Delivery Errors ===
    /// A delivery attempt failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// A specialized Result type for clipnote operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is a configuration problem (fatal at startup).
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing { .. } | Self::ConfigLoad(_) | Self::ConfigValidation { .. }
        )
    }
}
