//! OpenAI-compatible chat-completion client.
//!
//! One request per call: a `system` and a `user` message go to
//! `{base_url}/chat/completions` and the first choice's text comes back.
//! No retries, no streaming, and no timeout beyond reqwest's defaults.

use crate::config::LlmConfig;
use crate::error::{IntroError, OptionExt, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Token usage reported by the endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// OpenAI-compatible request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI-compatible API response structures
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

/// Chat-completion endpoint for `base_url`, rejecting malformed URLs early.
pub fn completions_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    url::Url::parse(trimmed)
        .map_err(|e| IntroError::Config(format!("Invalid base_url '{}': {}", base_url, e)))?;
    Ok(format!("{}/chat/completions", trimmed))
}

/// Thin wrapper over a reusable `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct LlmClient {
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Send one system + user exchange and return the assistant's reply.
    pub async fn complete(&self, config: &LlmConfig, system: &str, user: &str) -> Result<String> {
        let (content, usage) = self.complete_with_usage(config, system, user).await?;
        info!(
            model = %config.model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "LLM request complete"
        );
        Ok(content)
    }

    /// Same as [`LlmClient::complete`], also returning reported token usage.
    pub async fn complete_with_usage(
        &self,
        config: &LlmConfig,
        system: &str,
        user: &str,
    ) -> Result<(String, TokenUsage)> {
        if !config.has_api_key() {
            return Err(IntroError::MissingApiKey);
        }
        let api_url = completions_url(&config.base_url)?;

        let request_body = ChatCompletionRequest {
            model: &config.model,
            messages: [
                RequestMessage {
                    role: "system",
                    content: system,
                },
                RequestMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        debug!(url = %api_url, model = %config.model, chars = user.len(), "Sending LLM request");

        let response = self
            .http
            .post(&api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(config.api_key.trim())
            .json(&request_body)
            .send()
            .await
            .map_err(IntroError::Network)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(IntroError::Api {
                code: status.as_u16(),
                message: format!("LLM API error: {} - {}", status, error_text),
            });
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| IntroError::Parse(format!("Failed to parse LLM response: {}", e)))?;

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        let content = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_parse("LLM response contained no choices")?
            .message
            .content
            .ok_or_parse("LLM response choice has no content")?;

        Ok((content, usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".to_string(),
            base_url: format!("{}/v1/", server.uri()),
            model: "test-model".to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_completions_url() -> Result<()> {
        assert_eq!(
            completions_url("https://api.deepinfra.com/v1/openai/")?,
            "https://api.deepinfra.com/v1/openai/chat/completions"
        );
        assert!(matches!(completions_url("not a url"), Err(IntroError::Config(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_success() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "usr"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Deep learning has..."}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new();
        let (text, usage) = client
            .complete_with_usage(&config_for(&server), "sys", "usr")
            .await?;
        assert_eq!(text, "Deep learning has...");
        assert_eq!(usage.total_tokens, 16);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = LlmClient::new()
            .complete(&config_for(&server), "sys", "usr")
            .await
            .unwrap_err();
        match err {
            IntroError::Api { code, message } => {
                assert_eq!(code, 401);
                assert!(message.contains("bad key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = LlmClient::new()
            .complete(&config_for(&server), "sys", "usr")
            .await
            .unwrap_err();
        assert!(matches!(err, IntroError::Parse(_)));
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = LlmClient::new()
            .complete(&config_for(&server), "sys", "usr")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn test_missing_api_key_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = LlmConfig {
            api_key: "  ".to_string(),
            ..config_for(&server)
        };
        let err = LlmClient::new()
            .complete(&config, "sys", "usr")
            .await
            .unwrap_err();
        assert!(matches!(err, IntroError::MissingApiKey));
    }
}
