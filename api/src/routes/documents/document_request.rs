use serde::Deserialize;

/// Body of `PUT /sessions/{id}/texts/{slot}`.
#[derive(Debug, Deserialize)]
pub struct SetTextRequest {
    pub text: String,
}
