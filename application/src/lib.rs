//! Application layer for agent-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CouncilConfig, CouncilRoster, ProviderChain};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::dispatcher::{Dispatcher, ParticipantRequest};
pub use use_cases::run_council::{CouncilInput, RunCouncilError, RunCouncilUseCase};
