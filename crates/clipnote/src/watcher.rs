//! Change-triggered clipboard watching.
//!
//! This module samples an external text source at a fixed cadence, detects
//! changes by content-hash equality, and hands each changed sample to the
//! classifier exactly once. Delivery is awaited within the cycle, so at most
//! one delivery is ever in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::classify::Classifier;
use crate::delivery::Deliver;
use crate::entry::ClassifiedEntry;

/// A transient failure while reading the sampled source.
#[derive(Debug, Error)]
#[error("sample read failed: {0}")]
pub struct SampleError(pub String);

/// A readable source of the externally mutated text value.
///
/// `Ok(None)` means the source currently holds no text content; the cycle is
/// skipped without touching change-detection state.
pub trait Sample {
    /// Read the current value of the source.
    ///
    /// # Errors
    ///
    /// Returns a [`SampleError`] when the source is transiently unreadable.
    fn sample(&mut self) -> std::result::Result<Option<String>, SampleError>;
}

/// Watcher lifecycle state.
///
/// The first successful sample only primes the change-detection baseline, so
/// whatever the source held at startup is never delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchState {
    Priming,
    Watching,
}

/// Drives sampling, change detection, classification, and delivery.
///
/// Change detection compares BLAKE3 hashes of the sampled text. Two distinct
/// changes that collapse into identical text within one interval are
/// delivered once, and a change reverted before the next sample is
/// invisible; both follow from content-equality detection and are accepted.
#[derive(Debug)]
pub struct Watcher<S> {
    sampler: S,
    classifier: Classifier,
    poll_interval: Duration,
    state: WatchState,
    last_hash: Option<String>,
    running: Arc<AtomicBool>,
}

/// A handle to stop a running watcher from another task.
#[derive(Debug, Clone)]
pub struct WatcherHandle {
    running: Arc<AtomicBool>,
}

impl WatcherHandle {
    /// Signal the watcher to stop after its current cycle.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the watcher loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl<S: Sample> Watcher<S> {
    /// Create a watcher over the given sampler and classifier.
    #[must_use]
    pub fn new(sampler: S, classifier: Classifier, poll_interval: Duration) -> Self {
        Self {
            sampler,
            classifier,
            poll_interval,
            state: WatchState::Priming,
            last_hash: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a handle that can stop the watcher from another task.
    #[must_use]
    pub fn stop_handle(&self) -> WatcherHandle {
        WatcherHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Feed one sampled value through priming and change detection.
    ///
    /// Returns the entry to deliver this cycle, or `None` when there is
    /// nothing to deliver (priming, unchanged content, or classification
    /// miss).
    fn observe(&mut self, text: &str) -> Option<ClassifiedEntry> {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();

        match self.state {
            WatchState::Priming => {
                debug!("baseline primed, startup content will not be delivered");
                self.last_hash = Some(hash);
                self.state = WatchState::Watching;
                None
            }
            WatchState::Watching => {
                if self.last_hash.as_deref() == Some(hash.as_str()) {
                    return None;
                }
                self.last_hash = Some(hash);
                self.classifier.classify(text)
            }
        }
    }

    /// Run the watch loop until the stop handle fires.
    ///
    /// Each cycle samples the source, classifies at most one changed value,
    /// and awaits the delivery attempt before the next tick. Sample and
    /// delivery failures are logged and the loop continues; nothing here
    /// terminates the process.
    pub async fn run<D: Deliver>(&mut self, deliverer: &D, sender: &str) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("watcher already running");
            return;
        }

        debug!(
            interval_ms = self.poll_interval.as_millis(),
            "starting watch loop"
        );

        let mut ticker = interval(self.poll_interval);

        while self.running.load(Ordering::SeqCst) {
            ticker.tick().await;

            let sampled = match self.sampler.sample() {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, "clipboard read failed");
                    continue;
                }
            };

            let Some(entry) = self.observe(&sampled) else {
                continue;
            };

            let payload = entry.into_payload(sender);
            match deliverer.deliver(&payload).await {
                Ok(()) => info!(tag = %payload.tag, text = %payload.text, "sent"),
                Err(e) => warn!(error = %e, "delivery failed, entry dropped"),
            }
        }

        self.running.store(false, Ordering::SeqCst);
        debug!("watch loop stopped");
    }
}
