use std::sync::Arc;

use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::Response,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::{
        find_session,
        sessions::session_response::{
            CreateSessionResponse, DeleteSessionResponse, SessionResponse,
        },
    },
};

#[instrument(name = "create_session_route", skip_all)]
pub async fn create_session_route(State(state): State<Arc<AppState>>) -> Response {
    let (session_id, _) = state.sessions.create().await;
    info!(%session_id, "session created");
    ApiResponse::success(CreateSessionResponse { session_id })
        .into_response_with_status(StatusCode::CREATED)
}

#[instrument(name = "get_session_route", skip_all)]
pub async fn get_session_route(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(session_id) = path?;
    let session = find_session(&state, &session_id).await?;

    Ok(ApiResponse::success(SessionResponse {
        session_id,
        analyzing: session.is_analyzing(),
        snapshot: session.snapshot().await,
    })
    .ok())
}

#[instrument(name = "delete_session_route", skip_all)]
pub async fn delete_session_route(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(session_id) = path?;
    if !state.sessions.remove(&session_id).await {
        return Err(AppError::SessionNotFound(session_id.to_string()));
    }
    info!(%session_id, "session discarded");

    Ok(ApiResponse::success(DeleteSessionResponse {
        session_id,
        deleted: true,
    })
    .ok())
}
