use std::{sync::Arc, time::Duration};

use ai_llm_service::{
    AiLlmError, LlmService,
    error_handler::{env_opt_u64, env_or},
};
use contract_review::Analyzer;
use thiserror::Error;

use crate::core::session_registry::SessionRegistry;

pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error("MAX_UPLOAD_BYTES must be a positive number of bytes")]
    UploadLimit,

    #[error("SESSION_IDLE_SECS must be a positive number of seconds")]
    SessionIdle,
}

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen address, e.g. `127.0.0.1:8080`.
    pub address: String,
    /// Largest accepted request body (document uploads).
    pub max_upload_bytes: usize,
    /// Sessions untouched for this long are dropped from the registry.
    pub session_idle: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_upload_bytes = match env_opt_u64("MAX_UPLOAD_BYTES")? {
            None => DEFAULT_MAX_UPLOAD_BYTES,
            Some(0) => return Err(ConfigError::UploadLimit),
            Some(n) => usize::try_from(n).map_err(|_| ConfigError::UploadLimit)?,
        };
        let session_idle = match env_opt_u64("SESSION_IDLE_SECS")? {
            None => Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            Some(0) => return Err(ConfigError::SessionIdle),
            Some(n) => Duration::from_secs(n),
        };
        Ok(Self {
            address: env_or("API_ADDRESS", DEFAULT_API_ADDRESS),
            max_upload_bytes,
            session_idle,
        })
    }
}

/// Shared state for all HTTP handlers.
///
/// Holds no credential: the API key travels with each analyze request.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    /// Shared with spawned analysis tasks.
    pub analyzer: Arc<Analyzer<LlmService>>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: AppConfig, llm: LlmService) -> Self {
        Self {
            config,
            analyzer: Arc::new(Analyzer::new(llm)),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let config = AppConfig::from_env()?;
        let llm = LlmService::from_env()?;
        Ok(Self::new(config, llm))
    }
}
