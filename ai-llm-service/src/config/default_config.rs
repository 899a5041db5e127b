//! LLM config loaded from environment variables.
//!
//! One analysis profile is supported; the provider is picked with `LLM_KIND`
//! and everything else has a sensible default so a bare `.env` works.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = `anthropic` (default) or `openai`
//! - `ANALYSIS_MODEL`   = model identifier (provider-specific default)
//! - `LLM_MAX_TOKENS`   = output budget (u32, default 4000)
//! - `LLM_TEMPERATURE`  = optional, `0.0..=1.0`
//! - `LLM_TIMEOUT_SECS` = request timeout (u64, default 120)
//!
//! Anthropic:
//! - `ANTHROPIC_URL`     = base URL (default `https://api.anthropic.com`)
//! - `ANTHROPIC_VERSION` = `anthropic-version` header (default `2023-06-01`)
//!
//! OpenAI:
//! - `OPENAI_URL` = base URL (default `https://api.openai.com`)
//!
//! The API key is never read here; it arrives with each analysis request.

use crate::{
    config::{
        llm_model_config::{DEFAULT_MAX_TOKENS, DEFAULT_TIMEOUT_SECS, LlmModelConfig},
        llm_provider::LlmProvider,
    },
    error_handler::{
        Result, env_opt_f32, env_opt_u32, env_opt_u64, env_or, validate_http_endpoint,
        validate_range_f32,
    },
};

pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20240620";

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Builds the analysis config for whichever provider `LLM_KIND` names.
///
/// # Errors
/// - [`crate::error_handler::ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - [`crate::error_handler::ConfigError::InvalidNumber`] for malformed numeric vars
/// - [`crate::error_handler::ConfigError::InvalidFormat`] for a non-http(s) URL
/// - [`crate::error_handler::ConfigError::OutOfRange`] for a bad temperature
pub fn config_from_env() -> Result<LlmModelConfig> {
    let provider: LlmProvider = env_or("LLM_KIND", "anthropic").parse()?;
    match provider {
        LlmProvider::Anthropic => config_anthropic(),
        LlmProvider::OpenAI => config_openai(),
    }
}

/// Anthropic Messages API profile.
pub fn config_anthropic() -> Result<LlmModelConfig> {
    let endpoint = env_or("ANTHROPIC_URL", DEFAULT_ANTHROPIC_URL);
    validate_http_endpoint("ANTHROPIC_URL", &endpoint)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Anthropic,
        model: env_or("ANALYSIS_MODEL", DEFAULT_ANTHROPIC_MODEL),
        endpoint,
        max_tokens: Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS)),
        temperature: temperature_from_env()?,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        api_version: Some(env_or("ANTHROPIC_VERSION", DEFAULT_ANTHROPIC_VERSION)),
    })
}

/// OpenAI-compatible chat completions profile.
pub fn config_openai() -> Result<LlmModelConfig> {
    let endpoint = env_or("OPENAI_URL", DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", &endpoint)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: env_or("ANALYSIS_MODEL", DEFAULT_OPENAI_MODEL),
        endpoint,
        max_tokens: Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS)),
        temperature: temperature_from_env()?,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        api_version: None,
    })
}

fn temperature_from_env() -> Result<Option<f32>> {
    let temperature = env_opt_f32("LLM_TEMPERATURE")?;
    if let Some(t) = temperature {
        validate_range_f32("LLM_TEMPERATURE", t, 0.0, 1.0)?;
    }
    Ok(temperature)
}
