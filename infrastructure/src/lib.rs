//! Infrastructure layer for agent-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileChainConfig, FileConfig, FileCouncilConfig,
    FileLoggingConfig, FileOutputConfig, FileProviderConfig,
};
pub use logging::JsonlTranscriptLogger;
pub use providers::{
    ProviderAdapter, ProviderKind, command::CommandProvider, openai::OpenAiProvider,
    routing::RoutingGateway,
};
