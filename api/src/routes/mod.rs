pub mod analyze;
pub mod documents;
pub mod health_route;
pub mod sessions;

use std::sync::Arc;

use contract_review::Session;
use uuid::Uuid;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

/// Looks up a live session or fails with `404 SESSION_NOT_FOUND`.
pub(crate) async fn find_session(state: &AppState, id: &Uuid) -> AppResult<Arc<Session>> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
}
