use std::sync::Arc;

use ai_llm_service::ApiKey;
use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::HeaderMap,
    response::Response,
};
use contract_review::AnalysisError;
use tracing::{Instrument, Span, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{analyze::analyze_response::AnalyzeResponse, find_session},
};

/// Header carrying the provider credential for this one request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Runs one comparison for the session and returns the new report.
///
/// The comparison runs on its own task: if the client goes away the remote
/// call still completes and its report is stored in the session. The key is
/// moved into that task and dropped when it ends. It is never stored in the
/// session or logged.
#[instrument(name = "analyze_route", skip_all)]
pub async fn analyze_route(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let Path(session_id) = path?;
    let session = find_session(&state, &session_id).await?;

    let credential = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(ApiKey::new);

    let analyzer = Arc::clone(&state.analyzer);
    let analysis = tokio::spawn(
        async move { analyzer.analyze(&session, credential.as_ref()).await }
            .instrument(Span::current()),
    );
    let outcome = analysis.await.unwrap_or_else(|e| {
        Err(AnalysisError::Unexpected(format!("analysis task did not complete: {e}")))
    });

    match outcome {
        Ok(report) => {
            info!(
                %session_id,
                violations = report.violations.len(),
                overall_risk = report.summary.overall_risk.label(),
                "analysis stored"
            );
            Ok(ApiResponse::success(AnalyzeResponse {
                session_id,
                clean: report.is_clean(),
                report,
            })
            .ok())
        }
        Err(err) => {
            if matches!(err, AnalysisError::Unexpected(_) | AnalysisError::Transport(_)) {
                error!(%session_id, error = %err, "analysis failed");
            } else {
                warn!(%session_id, error = %err, "analysis rejected");
            }
            Err(err.into())
        }
    }
}
