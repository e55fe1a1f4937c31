//! OpenAI-compatible chat completions provider.
//!
//! Works against any server that speaks `POST {base_url}/chat/completions`
//! (OpenAI, vLLM, llama.cpp, Ollama's compatibility endpoint).

use super::{ProviderAdapter, ProviderKind};
use async_trait::async_trait;
use council_application::ports::llm_gateway::GatewayError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<serde_json::Value>,
}

pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key_env: String,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key_env: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key_env: api_key_env.into(),
            max_tokens,
        }
    }

    /// Replace the HTTP client (proxy or TLS settings)
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    fn request_body<'a>(&'a self, system_prompt: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !system_prompt.trim().is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });
        ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        }
    }
}

/// Pull the answer text out of the first choice.
///
/// `content` is either a plain string or an array of `{type, text}` blocks.
fn extract_content(response: ChatResponse) -> Option<String> {
    let content = response.choices.into_iter().next()?.message.content?;

    let text = match content {
        serde_json::Value::String(s) => s,
        serde_json::Value::Array(blocks) => blocks
            .iter()
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => return None,
    };

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn is_available(&self) -> bool {
        // Local servers often run without a key
        true
    }

    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
        let body = self.request_body(system_prompt, prompt);
        debug!(endpoint = %self.endpoint(), model = %self.model, "Sending chat completion");

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = self.api_key() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                GatewayError::ConnectionError(e.to_string())
            } else if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(model = %self.model, %status, "Chat completion rejected");
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                text.trim()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("invalid response body: {}", e)))?;

        extract_content(parsed).ok_or(GatewayError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn local(base: String, key_env: &str) -> OpenAiProvider {
        OpenAiProvider::new(base, "m", key_env, 64)
            .with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    fn parse(json: &str) -> ChatResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let provider = OpenAiProvider::new("http://x/v1/", "gpt-4o", "NONE", 512);
        let body = serde_json::to_value(provider.request_body("Be a skeptic.", "Task")).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Task");
        assert_eq!(provider.endpoint(), "http://x/v1/chat/completions");
    }

    #[test]
    fn test_empty_system_prompt_is_omitted() {
        let provider = OpenAiProvider::new("http://x", "m", "NONE", 1);
        let body = serde_json::to_value(provider.request_body("", "Task")).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_extract_content_variants() {
        let plain = parse(r#"{"choices":[{"message":{"content":"  Ship it. "}}]}"#);
        assert_eq!(extract_content(plain).as_deref(), Some("Ship it."));

        let blocks = parse(
            r#"{"choices":[{"message":{"content":[{"type":"text","text":"a"},{"type":"text","text":"b"}]}}]}"#,
        );
        assert_eq!(extract_content(blocks).as_deref(), Some("a\nb"));

        assert!(extract_content(parse(r#"{"choices":[]}"#)).is_none());
        assert!(extract_content(parse(r#"{"choices":[{"message":{"content":null}}]}"#)).is_none());
        assert!(extract_content(parse(r#"{"choices":[{"message":{"content":"   "}}]}"#)).is_none());
    }

    /// Consume headers and a content-length body
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    /// Serve exactly one canned HTTP response and return the base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    #[tokio::test]
    async fn test_complete_against_local_server() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"Use gRPC."}}]}"#,
        )
        .await;
        let provider = local(base, "AGENT_COUNCIL_TEST_UNSET_KEY");
        assert_eq!(provider.complete("sys", "REST or gRPC?").await.unwrap(), "Use gRPC.");
    }

    #[tokio::test]
    async fn test_http_error_is_request_failed() {
        let base = serve_once(
            "HTTP/1.1 429 Too Many Requests",
            r#"{"error":"rate limited"}"#,
        )
        .await;
        let provider = local(base, "AGENT_COUNCIL_TEST_UNSET_KEY");
        match provider.complete("", "hi").await {
            Err(GatewayError::RequestFailed(msg)) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("rate limited"));
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = local(format!("http://{}", addr), "UNSET");
        assert!(matches!(
            provider.complete("", "hi").await,
            Err(GatewayError::ConnectionError(_))
        ));
    }
}
