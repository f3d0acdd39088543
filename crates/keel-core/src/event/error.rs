//! # Keel Core Event Errors
//!
//! Listener failures are collected, not propagated: delivery of an event
//! always reaches every subscribed listener, and the orchestrator decides
//! afterwards what a non-empty failure set means for the surrounding phase.
use thiserror::Error;

use crate::event::ListenerId;

/// Record of one listener failing during delivery of one event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listener {listener} failed during '{event}': {detail}")]
pub struct ListenerFailure {
    pub listener: ListenerId,
    /// Dotted name of the event being delivered
    pub event: String,
    /// Rendered error from the listener
    pub detail: String,
}

impl ListenerFailure {
    pub fn new(listener: ListenerId, event: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            listener,
            event: event.into(),
            detail: detail.into(),
        }
    }
}
