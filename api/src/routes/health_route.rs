use std::sync::Arc;

use axum::{extract::State, response::Response};
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub model: String,
    pub sessions: usize,
}

pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    let llm = state.analyzer.client().config();
    ApiResponse::success(HealthResponse {
        status: "ok",
        provider: llm.provider.to_string(),
        model: llm.model.clone(),
        sessions: state.sessions.len().await,
    })
    .ok()
}
