use crate::config::llm_provider::LlmProvider;

/// Parameters of a single model invocation.
///
/// Holds no credential; the API key is supplied per call
/// (see [`crate::credential::ApiKey`]).
///
/// # Fields
///
/// - `provider`: which backend to talk to.
/// - `model`: model identifier (e.g. `"claude-3-5-sonnet-20240620"`).
/// - `endpoint`: API base URL, without the `/v1/...` suffix.
/// - `max_tokens`: output budget sent with every request.
/// - `temperature`: optional sampling temperature.
/// - `timeout_secs`: request timeout; the remote call is otherwise unbounded.
/// - `api_version`: `anthropic-version` header value (Anthropic only).
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Anthropic,
///     model: "claude-3-5-sonnet-20240620".to_string(),
///     endpoint: "https://api.anthropic.com".to_string(),
///     max_tokens: Some(4000),
///     temperature: None,
///     timeout_secs: Some(120),
///     api_version: None,
/// };
/// assert_eq!(cfg.max_tokens_or_default(), 4000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub api_version: Option<String>,
}

/// Output budget used when the config leaves `max_tokens` unset.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Request timeout used when the config leaves `timeout_secs` unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

impl LlmModelConfig {
    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn timeout_secs_or_default(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}
