//! Port definitions (interfaces for external adapters)

pub mod conversation_logger;
pub mod llm_gateway;
pub mod progress;
