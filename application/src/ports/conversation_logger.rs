//! Port for structured transcript logging.
//!
//! Defines the [`ConversationLogger`] trait for recording council events
//! (phase starts, drafts, failures, triage, verdict, final artifact) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! run transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured council event for logging.
///
/// Each event has a type string and a JSON payload containing event-specific
/// fields. Timestamps are added by the logger implementation.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "phase_start", "participant_draft", "verdict").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging council events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// `log` is synchronous and non-fallible; logging failures never abort a run.
pub trait ConversationLogger: Send + Sync {
    /// Record a council event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
