//! Provider-agnostic entry point used by the analysis pipeline.
//!
//! - Construct once at startup, wrap in `Arc`, share between handlers.
//! - Holds one preconfigured client for the provider named by the config.
//! - The API key is an argument of every call; the service never keeps it.
//!
//! # Example
//! ```no_run
//! use ai_llm_service::{credential::ApiKey, llm_service::LlmService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = LlmService::from_env()?;
//! let key = ApiKey::new("sk-ant-...").expect("non-empty key");
//! let text = svc.generate("Say hello", None, &key).await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use crate::{
    config::{
        default_config::config_from_env, llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    credential::ApiKey,
    error_handler::Result,
    services::{anthropic_service::AnthropicService, open_ai_service::OpenAiService},
};

#[derive(Debug)]
enum Backend {
    Anthropic(AnthropicService),
    OpenAI(OpenAiService),
}

#[derive(Debug)]
pub struct LlmService {
    cfg: LlmModelConfig,
    backend: Backend,
}

impl LlmService {
    /// Builds the client matching `cfg.provider`.
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        let backend = match cfg.provider {
            LlmProvider::Anthropic => Backend::Anthropic(AnthropicService::new(cfg.clone())?),
            LlmProvider::OpenAI => Backend::OpenAI(OpenAiService::new(cfg.clone())?),
        };
        Ok(Self { cfg, backend })
    }

    /// Same as [`LlmService::new`] with [`config_from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(config_from_env()?)
    }

    /// One remote call, complete response text. No retry.
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        api_key: &ApiKey,
    ) -> Result<String> {
        match &self.backend {
            Backend::Anthropic(cli) => cli.generate(prompt, system, api_key).await,
            Backend::OpenAI(cli) => cli.generate(prompt, system, api_key).await,
        }
    }

    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }
}
