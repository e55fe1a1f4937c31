//! LLM Gateway port
//!
//! Defines the interface for communicating with capability providers.
//! Providers are opaque: the council only ever sends a system prompt and a
//! user prompt and receives text back.

use async_trait::async_trait;
use council_domain::ProviderId;
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Provider not available: {0}")]
    ProviderUnavailable(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for provider communication
///
/// This port defines how the application layer talks to providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new session with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        provider: &ProviderId,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Providers this gateway can reach
    fn available_providers(&self) -> Vec<ProviderId>;

    /// One-shot call: open a session and send a single prompt
    async fn invoke(
        &self,
        provider: &ProviderId,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<String, GatewayError> {
        let session = self
            .create_session_with_system_prompt(provider, system_prompt)
            .await?;
        session.send(prompt).await
    }
}

/// An active provider session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the provider behind this session
    fn provider(&self) -> &ProviderId;

    /// Send a message and get a response
    async fn send(&self, content: &str) -> Result<String, GatewayError>;
}
