//! Logging infrastructure: structured run transcripts.
//!
//! Provides [`JsonlTranscriptLogger`], a JSONL file writer that implements
//! the [`ConversationLogger`](council_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlTranscriptLogger;
