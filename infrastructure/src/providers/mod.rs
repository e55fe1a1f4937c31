//! Provider adapters
//!
//! Each configured `[providers.<id>]` entry becomes one [`ProviderAdapter`].
//! The [`routing::RoutingGateway`] maps provider ids to adapters and exposes
//! them through the application's `LlmGateway` port.

pub mod command;
pub mod openai;
pub mod routing;

use async_trait::async_trait;
use council_application::ports::llm_gateway::{GatewayError, LlmSession};
use council_domain::ProviderId;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Local CLI fed through stdin
    Command,
    /// OpenAI-compatible HTTP endpoint
    OpenAi,
}

/// A backend that turns a system prompt and a user prompt into text
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether the backend looks usable right now (binary on PATH, key present)
    fn is_available(&self) -> bool;

    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError>;
}

/// Session over a stateless adapter: every send is one completion
pub struct AdapterSession {
    provider: ProviderId,
    system_prompt: String,
    adapter: Arc<dyn ProviderAdapter>,
}

impl AdapterSession {
    pub fn new(
        provider: ProviderId,
        system_prompt: impl Into<String>,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
            adapter,
        }
    }
}

#[async_trait]
impl LlmSession for AdapterSession {
    fn provider(&self) -> &ProviderId {
        &self.provider
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let text = self.adapter.complete(&self.system_prompt, content).await?;
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}
