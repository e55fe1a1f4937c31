//! Scripted gateway shared by the use case tests.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use async_trait::async_trait;
use council_domain::ProviderId;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted provider does with one call
pub(crate) enum Behavior {
    Reply(String),
    Delay(Duration, String),
    Fail(GatewayError),
    /// Never answers; only a timeout or abort ends the call
    Hang,
}

type Script = dyn Fn(&ProviderId, &str, &str) -> Behavior + Send + Sync;

/// A recorded call: provider, system prompt, user prompt
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub provider: ProviderId,
    pub system: String,
    pub prompt: String,
}

pub(crate) struct ScriptedGateway {
    script: Arc<Script>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedGateway {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&ProviderId, &str, &str) -> Behavior + Send + Sync + 'static,
    {
        Self {
            script: Arc::new(script),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, provider: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.provider.as_str() == provider)
            .count()
    }
}

struct ScriptedSession {
    provider: ProviderId,
    system: String,
    script: Arc<Script>,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn provider(&self) -> &ProviderId {
        &self.provider
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(Call {
            provider: self.provider.clone(),
            system: self.system.clone(),
            prompt: content.to_string(),
        });

        match (self.script)(&self.provider, &self.system, content) {
            Behavior::Reply(text) => Ok(text),
            Behavior::Delay(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Behavior::Fail(e) => Err(e),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session_with_system_prompt(
        &self,
        provider: &ProviderId,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(ScriptedSession {
            provider: provider.clone(),
            system: system_prompt.to_string(),
            script: Arc::clone(&self.script),
            calls: Arc::clone(&self.calls),
        }))
    }

    fn available_providers(&self) -> Vec<ProviderId> {
        Vec::new()
    }
}
