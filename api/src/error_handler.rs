use axum::{
    extract::rejection::{BytesRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contract_review::{AnalysisError, PreconditionError};
use thiserror::Error;

use crate::core::{
    app_state::ConfigError,
    http::response_envelope::{ApiErrorDetail, ApiResponse},
};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error("request body rejected: {message}")]
    Body { status: StatusCode, message: String },

    // --- Pipeline ---
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Body { status, .. } => *status,
            AppError::Analysis(e) => match e {
                AnalysisError::Precondition(_) => StatusCode::BAD_REQUEST,
                AnalysisError::Authentication(_) => StatusCode::UNAUTHORIZED,
                AnalysisError::Transport(_) | AnalysisError::MalformedResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
                AnalysisError::Busy => StatusCode::CONFLICT,
                AnalysisError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            AppError::Body { .. } => "BODY_REJECTED",
            AppError::Analysis(e) => match e {
                AnalysisError::Precondition(PreconditionError::MissingCredential) => {
                    "MISSING_API_KEY"
                }
                AnalysisError::Precondition(PreconditionError::MissingStandardText) => {
                    "MISSING_STANDARD_TEXT"
                }
                AnalysisError::Precondition(PreconditionError::MissingCandidateText) => {
                    "MISSING_CANDIDATE_TEXT"
                }
                AnalysisError::Authentication(_) => "AUTHENTICATION_FAILED",
                AnalysisError::Transport(_) => "UPSTREAM_ERROR",
                AnalysisError::MalformedResponse(_) => "MALFORMED_RESPONSE",
                AnalysisError::Busy => "ANALYSIS_IN_PROGRESS",
                AnalysisError::Unexpected(_) => "ANALYSIS_FAILED",
            },
        }
    }

    fn details(&self) -> Vec<ApiErrorDetail> {
        match self {
            AppError::Analysis(AnalysisError::Precondition(PreconditionError::MissingCredential)) => {
                vec![ApiErrorDetail::at("x-api-key", "Send the provider API key in this header.")]
            }
            AppError::Analysis(AnalysisError::Precondition(
                PreconditionError::MissingStandardText,
            )) => vec![ApiErrorDetail::at(
                "standard",
                "Upload a document or set the text for this slot.",
            )],
            AppError::Analysis(AnalysisError::Precondition(
                PreconditionError::MissingCandidateText,
            )) => vec![ApiErrorDetail::at(
                "candidate",
                "Upload a document or set the text for this slot.",
            )],
            AppError::Analysis(AnalysisError::MalformedResponse(_)) => {
                vec![ApiErrorDetail::hint("Run the analysis again.")]
            }
            AppError::Analysis(AnalysisError::Busy) => vec![ApiErrorDetail::hint(
                "Wait for the running analysis to finish.",
            )],
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::error(self.error_code(), self.to_string(), self.details())
            .into_response_with_status(self.status_code())
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(err: BytesRejection) -> Self {
        AppError::Body {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_review::MalformedResponse;

    fn status_and_code(err: AnalysisError) -> (StatusCode, &'static str) {
        let app = AppError::from(err);
        (app.status_code(), app.error_code())
    }

    #[test]
    fn analysis_errors_map_to_distinct_statuses() {
        assert_eq!(
            status_and_code(PreconditionError::MissingCredential.into()),
            (StatusCode::BAD_REQUEST, "MISSING_API_KEY")
        );
        assert_eq!(
            status_and_code(AnalysisError::Authentication("401".into())),
            (StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED")
        );
        assert_eq!(
            status_and_code(AnalysisError::Transport("timeout".into())),
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
        );
        assert_eq!(
            status_and_code(AnalysisError::Busy),
            (StatusCode::CONFLICT, "ANALYSIS_IN_PROGRESS")
        );
        assert_eq!(
            status_and_code(AnalysisError::Unexpected("x".into())),
            (StatusCode::INTERNAL_SERVER_ERROR, "ANALYSIS_FAILED")
        );
    }

    #[test]
    fn malformed_response_carries_retry_hint() {
        let err = AppError::from(AnalysisError::from(MalformedResponse {
            reason: "missing `violations`".into(),
        }));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.details().len(), 1);
        assert!(err.to_string().contains("run the analysis again"));
    }
}
