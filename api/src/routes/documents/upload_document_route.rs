use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        Path, State,
        rejection::{BytesRejection, PathRejection},
    },
    http::{HeaderMap, header},
    response::Response,
};
use contract_review::TextSlot;
use doc_extract::MediaKind;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{documents::document_response::DocumentResponse, find_session},
};

/// Optional original file name, used when `Content-Type` says nothing useful.
pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Raw file upload into one slot.
///
/// The declared kind comes from `Content-Type`; `application/octet-stream`
/// or a missing type falls back to the extension in `x-file-name`, then to
/// plain text. A failed extraction still answers `200` with a `warning`.
#[instrument(name = "upload_document_route", skip_all)]
pub async fn upload_document_route(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(Uuid, TextSlot)>, PathRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Response> {
    let Path((session_id, slot)) = path?;
    let body = body?;
    let session = find_session(&state, &session_id).await?;

    let kind = declared_kind(&headers);
    let outcome = session.ingest_document(slot, body.to_vec(), kind).await;

    match &outcome.warning {
        Some(w) => warn!(%session_id, %slot, %kind, warning = %w, "upload produced no text"),
        None => info!(%session_id, %slot, %kind, chars = outcome.chars, changed = outcome.changed, "upload stored"),
    }

    Ok(ApiResponse::success(DocumentResponse::new(slot, Some(kind), outcome)).ok())
}

fn declared_kind(headers: &HeaderMap) -> MediaKind {
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|m| !m.is_empty() && !m.starts_with("application/octet-stream"));
    if let Some(mime) = mime {
        return MediaKind::from_mime(mime);
    }

    headers
        .get(FILE_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|name| MediaKind::from_path(std::path::Path::new(name)))
        .unwrap_or(MediaKind::Text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(*k, HeaderValue::from_static(v));
        }
        h
    }

    #[test]
    fn content_type_decides_kind() {
        assert_eq!(declared_kind(&headers(&[("content-type", "application/pdf")])), MediaKind::Pdf);
        assert_eq!(
            declared_kind(&headers(&[("content-type", doc_extract::media_kind::MIME_DOCX)])),
            MediaKind::Docx
        );
        assert_eq!(
            declared_kind(&headers(&[("content-type", "application/rtf"), ("x-file-name", "a.pdf")])),
            MediaKind::Text
        );
    }

    #[test]
    fn file_name_is_the_fallback() {
        assert_eq!(
            declared_kind(&headers(&[
                ("content-type", "application/octet-stream"),
                ("x-file-name", "Contract.DOCX")
            ])),
            MediaKind::Docx
        );
        assert_eq!(declared_kind(&headers(&[("x-file-name", "notes")])), MediaKind::Text);
        assert_eq!(declared_kind(&HeaderMap::new()), MediaKind::Text);
    }
}
