//! Notification sinks.
//!
//! Delivery is fire and forget: a sink logs its own failures and never
//! returns them, so a broken sink cannot abort an ingestion run.

use std::sync::{Mutex, PoisonError};

use tracing::info;

/// Accepts one text message per significant event.
pub trait Notifier {
    /// Deliver a message.
    fn notify(&self, message: &str);
}

/// Writes messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        info!(target: "yeouido::notify", "{message}");
    }
}

/// Keeps every message in memory, for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
