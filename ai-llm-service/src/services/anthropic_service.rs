//! Anthropic Messages API client.
//!
//! One non-streaming call per [`AnthropicService::generate`]:
//! - POST {endpoint}/v1/messages
//! - headers: `x-api-key` (per call), `anthropic-version`, `content-type`
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::Anthropic`
//! - `cfg.endpoint` must start with http:// or https://
//!
//! No retries. The client timeout is the only bound on the call.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{
        default_config::DEFAULT_ANTHROPIC_VERSION, llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    credential::ApiKey,
    error_handler::{
        AiLlmError, ProviderError, ProviderErrorKind, Result, classify_status, is_http_endpoint,
    },
};

#[derive(Debug)]
pub struct AnthropicService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_messages: String,
    timeout: Duration,
}

impl AnthropicService {
    /// Validates the config and builds the HTTP client.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::InvalidProvider`] if `cfg.provider` is not Anthropic
    /// - [`ProviderErrorKind::InvalidEndpoint`] if `cfg.endpoint` is not http(s)
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Anthropic {
            return Err(
                ProviderError::new(LlmProvider::Anthropic, ProviderErrorKind::InvalidProvider)
                    .into(),
            );
        }
        if !is_http_endpoint(&cfg.endpoint) {
            return Err(ProviderError::new(
                LlmProvider::Anthropic,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs_or_default());
        let version = cfg
            .api_version
            .clone()
            .unwrap_or_else(|| DEFAULT_ANTHROPIC_VERSION.to_string());

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_str(&version).map_err(|e| {
                ProviderError::new(
                    LlmProvider::Anthropic,
                    ProviderErrorKind::Decode(format!("invalid anthropic-version header: {e}")),
                )
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_messages = format!("{}/v1/messages", cfg.endpoint.trim().trim_end_matches('/'));

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "AnthropicService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_messages,
            timeout,
        })
    }

    /// Sends one user message (plus optional system prompt) and returns the
    /// concatenated text blocks of the reply.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::Unauthorized`] on 401/403
    /// - [`ProviderErrorKind::HttpStatus`] on any other non-2xx
    /// - [`AiLlmError::HttpTransport`] / [`AiLlmError::Timeout`] for network failures
    /// - [`ProviderErrorKind::Decode`] / [`ProviderErrorKind::EmptyContent`] for bad bodies
    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_len = prompt.len()))]
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        api_key: &ApiKey,
    ) -> Result<String> {
        let started = Instant::now();
        let body = MessagesRequest::from_cfg(&self.cfg, prompt, system);

        debug!("POST {}", self.url_messages);
        let resp = self
            .client
            .post(&self.url_messages)
            .header("x-api-key", api_key.header_value(LlmProvider::Anthropic, "")?)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_send(e, self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let err = classify_status(
                LlmProvider::Anthropic,
                status,
                self.url_messages.clone(),
                &text,
            );
            error!(
                %status,
                latency_ms = started.elapsed().as_millis(),
                error = %err,
                "/v1/messages returned non-success status"
            );
            return Err(err);
        }

        let out: MessagesResponse = resp.json().await.map_err(|e| {
            error!(error = %e, "failed to decode /v1/messages response");
            ProviderError::new(
                LlmProvider::Anthropic,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `content[].text`")),
            )
        })?;

        let text = out.into_text().ok_or_else(|| {
            ProviderError::new(LlmProvider::Anthropic, ProviderErrorKind::EmptyContent)
        })?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            response_len = text.len(),
            "message completed"
        );
        Ok(text)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl<'a> MessagesRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        Self {
            model: &cfg.model,
            max_tokens: cfg.max_tokens_or_default(),
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            system,
            temperature: cfg.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Joins every `text` block in order; `None` if there is no text at all.
    fn into_text(self) -> Option<String> {
        let parts: Vec<String> = self
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Anthropic,
            model: "claude-3-5-sonnet-20240620".into(),
            endpoint: "https://api.anthropic.com/".into(),
            max_tokens: Some(4000),
            temperature: None,
            timeout_secs: Some(30),
            api_version: None,
        }
    }

    #[test]
    fn request_body_matches_messages_api() {
        let cfg = cfg();
        let body = serde_json::to_value(MessagesRequest::from_cfg(&cfg, "compare", None)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "claude-3-5-sonnet-20240620",
                "max_tokens": 4000,
                "messages": [{"role": "user", "content": "compare"}]
            })
        );
    }

    #[test]
    fn text_blocks_are_joined_in_order() {
        let resp: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "content": [
                {"type": "text", "text": "{\"summary\":"},
                {"type": "tool_use", "id": "t", "name": "x", "input": {}},
                {"type": "text", "text": "{}}"}
            ],
            "stop_reason": "end_turn"
        }))
        .unwrap();
        assert_eq!(resp.into_text().as_deref(), Some("{\"summary\":{}}"));
    }

    #[test]
    fn no_text_blocks_is_none() {
        let resp: MessagesResponse = serde_json::from_value(json!({"content": []})).unwrap();
        assert!(resp.into_text().is_none());
    }

    #[test]
    fn constructor_validates_provider_and_endpoint() {
        let svc = AnthropicService::new(cfg()).unwrap();
        assert_eq!(svc.url_messages, "https://api.anthropic.com/v1/messages");

        let wrong = LlmModelConfig {
            provider: LlmProvider::OpenAI,
            ..cfg()
        };
        assert!(AnthropicService::new(wrong).is_err());

        let bad = LlmModelConfig {
            endpoint: "api.anthropic.com".into(),
            ..cfg()
        };
        assert!(AnthropicService::new(bad).is_err());
    }
}
