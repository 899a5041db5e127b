use std::sync::Arc;

use contract_review::FindingReport;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub session_id: Uuid,
    /// `true` when no violations were found.
    pub clean: bool,
    pub report: Arc<FindingReport>,
}
