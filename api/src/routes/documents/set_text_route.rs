use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::Response,
};
use contract_review::TextSlot;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{
        documents::{document_request::SetTextRequest, document_response::DocumentResponse},
        find_session,
    },
};

/// Manual edit of one contract text; no extraction involved.
#[instrument(name = "set_text_route", skip_all)]
pub async fn set_text_route(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(Uuid, TextSlot)>, PathRejection>,
    body: Result<Json<SetTextRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Path((session_id, slot)) = path?;
    let Json(body) = body?;
    let session = find_session(&state, &session_id).await?;

    let outcome = session.set_text(slot, body.text).await;
    debug!(%session_id, %slot, chars = outcome.chars, "text set");

    Ok(ApiResponse::success(DocumentResponse::new(slot, None, outcome)).ok())
}
