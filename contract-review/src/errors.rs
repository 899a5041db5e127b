//! Error taxonomy of the analysis pipeline.
//!
//! Every stage converts its own failures into one of these before returning:
//! - [`PreconditionError`]: nothing was sent; the operator must fix input
//! - [`ClientError`]: the single remote call failed (auth / transport / other)
//! - [`MalformedResponse`]: the model answered, but not with a usable report
//!
//! Extraction problems are not errors at all; see [`doc_extract::ExtractionWarning`].

use ai_llm_service::AiLlmError;
use thiserror::Error;

use crate::session::Slot;

/// Convenient alias for pipeline results.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("an API key is required to run the analysis")]
    MissingCredential,

    #[error("the standard contract has no text; upload or paste it first")]
    MissingStandardText,

    #[error("the third-party contract has no text; upload or paste it first")]
    MissingCandidateText,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("the model did not return a valid finding report ({reason}); please run the analysis again")]
pub struct MalformedResponse {
    pub reason: String,
}

impl MalformedResponse {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure of the remote comparison call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("remote service error: {0}")]
    Transport(String),

    #[error("unexpected error: {0}")]
    Other(String),
}

impl From<AiLlmError> for ClientError {
    fn from(e: AiLlmError) -> Self {
        if e.is_authentication() {
            ClientError::Authentication(e.to_string())
        } else if e.is_transport() {
            ClientError::Transport(e.to_string())
        } else {
            ClientError::Other(e.to_string())
        }
    }
}

/// Root error of [`crate::pipeline::Analyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("remote service error: {0}")]
    Transport(String),

    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponse),

    /// Another analysis for the same session is still running.
    #[error("an analysis is already running for this session")]
    Busy,

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<ClientError> for AnalysisError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Authentication(m) => AnalysisError::Authentication(m),
            ClientError::Transport(m) => AnalysisError::Transport(m),
            ClientError::Other(m) => AnalysisError::Unexpected(m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("slot `{slot}` holds {expected}")]
    SlotMismatch { slot: Slot, expected: &'static str },
}
