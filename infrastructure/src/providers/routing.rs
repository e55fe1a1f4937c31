use super::command::CommandProvider;
use super::openai::OpenAiProvider;
use super::{AdapterSession, ProviderAdapter};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use council_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use council_domain::ProviderId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Gateway that routes each call to the adapter registered under its provider id
#[derive(Default)]
pub struct RoutingGateway {
    adapters: BTreeMap<ProviderId, Arc<dyn ProviderAdapter>>,
}

impl RoutingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, id: impl Into<ProviderId>, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(id.into(), adapter);
        self
    }

    /// Build one adapter per `[providers.<id>]` entry
    pub fn from_config(providers: &BTreeMap<String, FileProviderConfig>) -> Self {
        providers
            .iter()
            .fold(Self::new(), |gateway, (id, config)| {
                let adapter: Arc<dyn ProviderAdapter> = match config {
                    FileProviderConfig::Command { program, args } => {
                        Arc::new(CommandProvider::new(program.clone(), args.clone()))
                    }
                    FileProviderConfig::OpenAi {
                        base_url,
                        model,
                        api_key_env,
                        max_tokens,
                    } => Arc::new(OpenAiProvider::new(
                        base_url.clone(),
                        model.clone(),
                        api_key_env.clone(),
                        *max_tokens,
                    )),
                };
                if !adapter.is_available() {
                    warn!(provider = %id, kind = config.kind(), "Provider is not available; calls will fall back");
                }
                debug!(provider = %id, kind = config.kind(), "Registered provider");
                gateway.with_provider(id.as_str(), adapter)
            })
    }

    fn resolve(&self, provider: &ProviderId) -> Result<Arc<dyn ProviderAdapter>, GatewayError> {
        self.adapters
            .get(provider)
            .cloned()
            .ok_or_else(|| {
                GatewayError::ProviderUnavailable(format!("unknown provider '{}'", provider))
            })
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn create_session_with_system_prompt(
        &self,
        provider: &ProviderId,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let adapter = self.resolve(provider)?;
        Ok(Box::new(AdapterSession::new(
            provider.clone(),
            system_prompt,
            adapter,
        )))
    }

    fn available_providers(&self) -> Vec<ProviderId> {
        self.adapters
            .iter()
            .filter(|(_, adapter)| adapter.is_available())
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderKind;

    // -- Mock ProviderAdapter --------------------------------------------------

    struct MockProvider {
        reply: Result<String, GatewayError>,
        available: bool,
    }

    impl MockProvider {
        fn replying(text: &str) -> Arc<dyn ProviderAdapter> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                available: true,
            })
        }

        fn offline() -> Arc<dyn ProviderAdapter> {
            Arc::new(Self {
                reply: Err(GatewayError::ConnectionError("down".to_string())),
                available: false,
            })
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Command
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
            self.reply
                .clone()
                .map(|text| format!("{} [{}|{}]", text, system_prompt, prompt))
        }
    }

    #[tokio::test]
    async fn test_routes_by_provider_id() {
        let gateway = RoutingGateway::new()
            .with_provider("a", MockProvider::replying("from a"))
            .with_provider("b", MockProvider::replying("from b"));

        let text = gateway
            .invoke(&ProviderId::new("b"), "sys", "hello")
            .await
            .unwrap();
        assert_eq!(text, "from b [sys|hello]");
    }

    #[tokio::test]
    async fn test_unknown_provider_is_unavailable() {
        let gateway = RoutingGateway::new().with_provider("a", MockProvider::replying("x"));
        let err = gateway
            .invoke(&ProviderId::new("zzz"), "sys", "hello")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::ProviderUnavailable("unknown provider 'zzz'".to_string())
        );
    }

    #[tokio::test]
    async fn test_adapter_errors_pass_through() {
        let gateway = RoutingGateway::new().with_provider("down", MockProvider::offline());
        let err = gateway
            .invoke(&ProviderId::new("down"), "", "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_blank_reply_is_empty_response() {
        let gateway = RoutingGateway::new().with_provider("blank", Arc::new(BlankProvider));
        let err = gateway
            .invoke(&ProviderId::new("blank"), "", "hello")
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::EmptyResponse);
    }

    struct BlankProvider;

    #[async_trait]
    impl ProviderAdapter for BlankProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn complete(&self, _system_prompt: &str, _prompt: &str) -> Result<String, GatewayError> {
            Ok(" \n".to_string())
        }
    }

    #[test]
    fn test_available_providers_skips_offline() {
        let gateway = RoutingGateway::new()
            .with_provider("up", MockProvider::replying("x"))
            .with_provider("down", MockProvider::offline());
        assert_eq!(gateway.available_providers(), vec![ProviderId::new("up")]);
    }

    #[test]
    fn test_from_config_registers_every_entry() {
        let providers: BTreeMap<String, FileProviderConfig> = toml::from_str(
            r#"
[local]
kind = "command"
program = "agent-council-no-such-binary"

[gpt]
kind = "openai"
model = "gpt-4o"
"#,
        )
        .unwrap();

        let gateway = RoutingGateway::from_config(&providers);
        assert_eq!(gateway.adapters.len(), 2);
        assert_eq!(gateway.available_providers(), vec![ProviderId::new("gpt")]);
    }
}
