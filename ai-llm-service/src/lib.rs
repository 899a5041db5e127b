//! LLM chat clients for the contract analyzer.
//!
//! - [`config`]: provider/model configuration loaded from the environment
//! - [`credential`]: the per-call API key
//! - [`llm_service`]: the single entry point used by the pipeline
//! - [`error_handler`]: unified errors with auth/transport classification
//! - [`telemetry`]: library-scoped tracing layer

pub mod config;
pub mod credential;
pub mod error_handler;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use credential::ApiKey;
pub use error_handler::{AiLlmError, Result};
pub use llm_service::LlmService;
