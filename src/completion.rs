//! Outbound chat-completion client.
//!
//! Speaks the OpenAI-compatible Chat Completions wire format: one POST to
//! `{base_url}/chat/completions` with a bearer credential, two conversational
//! turns, and bounded sampling parameters. The upstream is opaque; anything
//! that serves this shape (OpenAI, Azure deployments behind a compatible
//! gateway, vLLM, Ollama) works unchanged.

use async_trait::async_trait;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Faults a completion call can produce. All of them are absorbed by the
/// orchestrator; none cross the conversion boundary.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion endpoint returned {status}: {detail}")]
    Status {
        status: StatusCode,
        detail: String,
    },

    #[error("could not decode completion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("completion endpoint returned no choices")]
    NoChoices,
}

/// One chat-style completion: a fixed system turn, a user turn, and sampling
/// options. Implementors encapsulate transport and vendor details so the
/// orchestrator stays decoupled from any particular provider.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: GenerationOptions,
    ) -> Result<String, CompletionError>;
}

/// Connection settings for the upstream: endpoint, credential, and the
/// deployment/model identifier. All three are opaque strings; presence is the
/// only validation performed.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl CompletionConfig {
    /// Read the three required settings from the environment.
    ///
    /// Fails with a descriptive error when any is missing so startup aborts
    /// instead of deferring the fault to the first conversion.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            base_url: required_var("OPENAI_BASE_URL")?,
            api_key: required_var("OPENAI_API_KEY")?,
            model: required_var("MODEL")?,
        })
    }
}

fn required_var(key: &str) -> anyhow::Result<String> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => anyhow::bail!("{key} must be set"),
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Upstream error bodies can be arbitrarily large; keep only enough to
/// identify the fault.
const MAX_DETAIL_CHARS: usize = 200;

fn detail_snippet(body: &str) -> String {
    body.trim().chars().take(MAX_DETAIL_CHARS).collect()
}

/// reqwest-backed [`CompletionBackend`]. Built once at startup and shared
/// across workers; the inner client pools connections.
#[derive(Clone)]
pub struct ChatCompletionClient {
    http: reqwest::Client,
    config: CompletionConfig,
}

impl ChatCompletionClient {
    pub fn new(http: reqwest::Client, config: CompletionConfig) -> Self {
        Self { http, config }
    }

    /// Extract the first choice's text. Zero choices is a fault, never an
    /// empty success; a null content field decodes as an empty string.
    fn first_choice(response: ChatCompletionResponse) -> Result<String, CompletionError> {
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(CompletionError::NoChoices)
    }
}

#[async_trait]
impl CompletionBackend for ChatCompletionClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: GenerationOptions,
    ) -> Result<String, CompletionError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status,
                detail: detail_snippet(&detail),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)?;
        Self::first_choice(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ChatCompletionResponse {
        serde_json::from_value(value).expect("valid completion response")
    }

    #[test]
    fn first_choice_returns_message_content() {
        let response = parse(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "fn main() {}"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }));
        assert_eq!(
            ChatCompletionClient::first_choice(response).unwrap(),
            "fn main() {}"
        );
    }

    #[test]
    fn zero_choices_is_a_fault() {
        let response = parse(json!({ "choices": [] }));
        assert!(matches!(
            ChatCompletionClient::first_choice(response),
            Err(CompletionError::NoChoices)
        ));
    }

    #[test]
    fn null_content_decodes_as_empty_string() {
        let response = parse(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }));
        assert_eq!(ChatCompletionClient::first_choice(response).unwrap(), "");
    }

    #[test]
    fn request_body_carries_both_turns_and_sampling_params() {
        let body = ChatCompletionRequest {
            model: "gpt-test",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "be precise",
                },
                ChatMessage {
                    role: "user",
                    content: "convert this",
                },
            ],
            max_tokens: 2000,
            temperature: 0.3,
        };

        let value = serde_json::to_value(&body).expect("serializable");
        assert_eq!(value["model"], "gpt-test");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "convert this");
        assert_eq!(value["max_tokens"], 2000);
        assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn detail_snippet_bounds_long_bodies() {
        let long = "x".repeat(1000);
        assert_eq!(detail_snippet(&long).chars().count(), MAX_DETAIL_CHARS);
        assert_eq!(detail_snippet("  short  "), "short");
    }
}
