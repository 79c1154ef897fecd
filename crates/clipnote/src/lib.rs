//! `clipnote` - forward tagged clipboard lines to a remote document
//!
//! This library provides the tag-classification and delivery pipeline:
//! configuration normalization, clipboard-change detection, tagged-text
//! parsing with an unknown-tag policy, and single-attempt delivery to a
//! remote document endpoint.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod entry;
pub mod error;
pub mod headings;
pub mod healthcheck;
pub mod logging;
pub mod watcher;

pub use classify::Classifier;
pub use config::{Config, UnknownTagPolicy};
pub use delivery::{Deliver, DeliveryClient, DeliveryError};
pub use entry::{ClassifiedEntry, DeliveryPayload};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use watcher::{Sample, SampleError, Watcher};
