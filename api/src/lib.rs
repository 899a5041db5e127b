//! HTTP surface of the contract analyzer.
//!
//! | Method & path                          | Handler                  |
//! |----------------------------------------|--------------------------|
//! | `GET /health`                          | [`health_route`]         |
//! | `POST /sessions`                       | [`create_session_route`] |
//! | `GET /sessions/{id}`                   | [`get_session_route`]    |
//! | `DELETE /sessions/{id}`                | [`delete_session_route`] |
//! | `PUT /sessions/{id}/documents/{slot}`  | [`upload_document_route`]|
//! | `PUT /sessions/{id}/texts/{slot}`      | [`set_text_route`]       |
//! | `POST /sessions/{id}/analyze`          | [`analyze_route`]        |

pub mod core;
pub mod error_handler;
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use tokio::{
    signal,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    routes::{
        analyze::analyze_route::analyze_route,
        documents::{set_text_route::set_text_route, upload_document_route::upload_document_route},
        health_route::health_route,
        sessions::session_routes::{
            create_session_route, delete_session_route, get_session_route,
        },
    },
};

/// Builds the router over shared state. Separate from [`start`] so tests can
/// drive it without a socket.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health_route))
        .route("/sessions", post(create_session_route))
        .route(
            "/sessions/{id}",
            get(get_session_route).delete(delete_session_route),
        )
        .route("/sessions/{id}/documents/{slot}", put(upload_document_route))
        .route("/sessions/{id}/texts/{slot}", put(set_text_route))
        .route("/sessions/{id}/analyze", post(analyze_route))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env()?);
    let address = state.config.address.clone();
    let sweeper = spawn_session_sweeper(Arc::clone(&state));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "contract analyzer API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    sweeper.abort();
    info!("server stopped");
    Ok(())
}

/// Periodically drops sessions idle for longer than
/// [`AppConfig::session_idle`](core::app_state::AppConfig::session_idle).
fn spawn_session_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    let max_idle = state.config.session_idle;
    tokio::spawn(async move {
        let mut ticks = interval((max_idle / 4).max(Duration::from_secs(1)));
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            let evicted = state.sessions.evict_idle(max_idle).await;
            if evicted > 0 {
                info!(evicted, "idle sessions dropped");
            }
        }
    })
}

/// Resolves on Ctrl+C. If the handler cannot be installed the server keeps
/// running until killed.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use ai_llm_service::{
        LlmService,
        config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    };
    use axum::{
        Json,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::core::app_state::AppConfig;

    // Nothing listens on the discard port.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn test_state(endpoint: &str) -> Arc<AppState> {
        let llm = LlmService::new(LlmModelConfig {
            provider: LlmProvider::Anthropic,
            model: "claude-test".into(),
            endpoint: endpoint.into(),
            max_tokens: Some(64),
            temperature: None,
            timeout_secs: Some(5),
            api_version: None,
        })
        .unwrap();
        let config = AppConfig {
            address: "127.0.0.1:0".into(),
            max_upload_bytes: 1024,
            session_idle: Duration::from_secs(3600),
        };
        Arc::new(AppState::new(config, llm))
    }

    fn test_app() -> Router {
        router(test_state(UNREACHABLE))
    }

    /// Stands in for the Anthropic Messages API: answers every call with a
    /// clean report after `delay` and counts the calls it received.
    async fn slow_upstream(delay: Duration) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let upstream = Router::new().route(
            "/v1/messages",
            post(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(delay).await;
                    Json(json!({
                        "content": [{"type": "text", "text": CLEAN_REPORT}]
                    }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });
        (format!("http://{address}"), hits)
    }

    const CLEAN_REPORT: &str = r#"{"summary":{"totalIssues":0,"criticalViolations":0,"moderateDeviations":0,"minorConcerns":0,"overallRisk":"LOW"},"violations":[]}"#;

    async fn fill_texts(app: &Router, id: &str) {
        for (slot, text) in [("standard", "Payment due within 30 days."), ("candidate", "Payment due within 30 days.")] {
            let (status, _) = call(
                app,
                Method::PUT,
                &format!("/sessions/{id}/texts/{slot}"),
                &[("content-type", "application/json")],
                Body::from(json!({ "text": text }).to_string()),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    fn analyze_request(id: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(format!("/sessions/{id}/analyze"))
            .header("x-api-key", "sk-test")
            .body(Body::empty())
            .unwrap()
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Body,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        for (k, v) in headers {
            req = req.header(*k, *v);
        }
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn new_session(app: &Router) -> String {
        let (status, body) = call(app, Method::POST, "/sessions", &[], Body::empty()).await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["session_id"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn health_reports_provider() {
        let app = test_app();
        let (status, body) = call(&app, Method::GET, "/health", &[], Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["provider"], "anthropic");
    }

    #[tokio::test]
    async fn new_session_is_empty() {
        let app = test_app();
        let id = new_session(&app).await;
        let (status, body) = call(&app, Method::GET, &format!("/sessions/{id}"), &[], Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["standard_text"], "");
        assert_eq!(body["data"]["candidate_chars"], 0);
        assert_eq!(body["data"]["last_report"], Value::Null);
        assert_eq!(body["data"]["analyzing"], false);
    }

    #[tokio::test]
    async fn text_upload_is_stored_and_deduplicated() {
        let app = test_app();
        let id = new_session(&app).await;
        let uri = format!("/sessions/{id}/documents/standard");
        let headers = [("content-type", "text/plain; charset=utf-8")];

        let (status, body) = call(&app, Method::PUT, &uri, &headers, Body::from("Payment due within 30 days.")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!({"slot": "standard", "kind": "text", "chars": 27, "changed": true})
        );

        let (_, body) = call(&app, Method::PUT, &uri, &headers, Body::from("Payment due within 30 days.")).await;
        assert_eq!(body["data"]["changed"], false);

        let (_, body) = call(&app, Method::GET, &format!("/sessions/{id}"), &[], Body::empty()).await;
        assert_eq!(body["data"]["standard_text"], "Payment due within 30 days.");
    }

    #[tokio::test]
    async fn broken_pdf_is_a_warning_not_an_error() {
        let app = test_app();
        let id = new_session(&app).await;
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/documents/candidate"),
            &[("content-type", "application/pdf")],
            Body::from("definitely not a pdf"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["chars"], 0);
        assert!(body["data"]["warning"].is_string());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let app = test_app();
        let id = new_session(&app).await;
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/documents/standard"),
            &[("content-type", "text/plain")],
            Body::from(vec![b'a'; 4096]),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "BODY_REJECTED");
    }

    #[tokio::test]
    async fn manual_text_edit() {
        let app = test_app();
        let id = new_session(&app).await;
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/texts/candidate"),
            &[("content-type", "application/json")],
            Body::from(r#"{"text":"Payment due within 90 days."}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["chars"], 27);
        assert_eq!(body["data"].get("kind"), None);
    }

    #[tokio::test]
    async fn analyze_without_key_fails_before_any_call() {
        let app = test_app();
        let id = new_session(&app).await;
        let (status, body) = call(&app, Method::POST, &format!("/sessions/{id}/analyze"), &[], Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "MISSING_API_KEY");
        assert_eq!(body["error"]["details"][0]["path"], "x-api-key");
    }

    #[tokio::test]
    async fn analyze_without_texts_fails_before_any_call() {
        let app = test_app();
        let id = new_session(&app).await;
        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/sessions/{id}/analyze"),
            &[("x-api-key", "sk-test")],
            Body::empty(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MISSING_STANDARD_TEXT");
        assert!(!body.to_string().contains("sk-test"));
    }

    #[tokio::test]
    async fn unknown_session_and_bad_slot() {
        let app = test_app();
        let missing = uuid::Uuid::new_v4();
        let (status, body) = call(&app, Method::GET, &format!("/sessions/{missing}"), &[], Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");

        let id = new_session(&app).await;
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/sessions/{id}/texts/appendix"),
            &[("content-type", "application/json")],
            Body::from(r#"{"text":"x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let (status, _) = call(&app, Method::GET, "/sessions/not-a-uuid", &[], Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deleted_session_is_gone() {
        let app = test_app();
        let id = new_session(&app).await;
        let uri = format!("/sessions/{id}");
        let (status, body) = call(&app, Method::DELETE, &uri, &[], Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["deleted"], true);

        let (status, _) = call(&app, Method::GET, &uri, &[], Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, Method::DELETE, &uri, &[], Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn analysis_completes_through_the_api() {
        let (endpoint, hits) = slow_upstream(Duration::from_millis(10)).await;
        let app = router(test_state(&endpoint));
        let id = new_session(&app).await;
        fill_texts(&app, &id).await;

        let resp = app.clone().oneshot(analyze_request(&id)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["clean"], true);
        assert_eq!(body["data"]["report"]["summary"]["overallRisk"], "LOW");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn abandoned_request_still_stores_the_report() {
        let (endpoint, hits) = slow_upstream(Duration::from_millis(300)).await;
        let app = router(test_state(&endpoint));
        let id = new_session(&app).await;
        fill_texts(&app, &id).await;

        // The caller gives up long before the upstream answers.
        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            app.clone().oneshot(analyze_request(&id)),
        )
        .await;
        assert!(abandoned.is_err());

        let mut stored = Value::Null;
        for _ in 0..40 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let (_, body) = call(&app, Method::GET, &format!("/sessions/{id}"), &[], Body::empty()).await;
            if !body["data"]["last_report"].is_null() {
                stored = body["data"].clone();
                break;
            }
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(stored["last_report"]["summary"]["overallRisk"], "LOW");
        assert_eq!(stored["analyzing"], false);
    }

    #[tokio::test]
    async fn eviction_spares_a_session_being_analyzed() {
        let (endpoint, _) = slow_upstream(Duration::from_millis(300)).await;
        let state = test_state(&endpoint);
        let app = router(Arc::clone(&state));
        let busy = new_session(&app).await;
        let idle = new_session(&app).await;
        fill_texts(&app, &busy).await;

        let running = tokio::spawn(app.clone().oneshot(analyze_request(&busy)));
        let mut analyzing = false;
        for _ in 0..40 {
            let (_, body) = call(&app, Method::GET, &format!("/sessions/{busy}"), &[], Body::empty()).await;
            if body["data"]["analyzing"] == true {
                analyzing = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(analyzing);

        assert_eq!(state.sessions.evict_idle(Duration::ZERO).await, 1);
        let (status, _) = call(&app, Method::GET, &format!("/sessions/{idle}"), &[], Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let resp = running.await.unwrap().unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let (status, _) = call(&app, Method::GET, &format!("/sessions/{busy}"), &[], Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
    }
}
