use contract_review::{IngestOutcome, TextSlot};
use doc_extract::MediaKind;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub slot: TextSlot,
    /// Declared kind the upload was read as; absent for manual edits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    pub chars: usize,
    pub changed: bool,
    /// A newer write to the slot won; this upload's text was not stored.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub superseded: bool,
    /// Non-fatal extraction notice; the slot is empty when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl DocumentResponse {
    pub fn new(slot: TextSlot, kind: Option<MediaKind>, outcome: IngestOutcome) -> Self {
        Self {
            slot,
            kind,
            chars: outcome.chars,
            changed: outcome.changed,
            superseded: outcome.superseded,
            warning: outcome.warning.map(|w| w.to_string()),
        }
    }
}
