//! Session State Store: the two contract texts and the last accepted report.
//!
//! Reads never see an uninitialized slot: texts default to `""` and the
//! report to `None`. The report is held as `Arc<FindingReport>` and is
//! only ever swapped as a whole.

use std::{collections::HashMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{errors::SessionError, report::FindingReport};

/// One of the two contract texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSlot {
    Standard,
    Candidate,
}

impl TextSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            TextSlot::Standard => "standard",
            TextSlot::Candidate => "candidate",
        }
    }
}

impl fmt::Display for TextSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every logical slot of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    StandardText,
    CandidateText,
    LastReport,
}

impl From<TextSlot> for Slot {
    fn from(s: TextSlot) -> Self {
        match s {
            TextSlot::Standard => Slot::StandardText,
            TextSlot::Candidate => Slot::CandidateText,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::StandardText => "standardText",
            Slot::CandidateText => "candidateText",
            Slot::LastReport => "lastReport",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    Text(String),
    /// `None` is the "no report yet" sentinel.
    Report(Option<Arc<FindingReport>>),
}

/// Partial update for [`SessionState::merge`]. `None` leaves a slot as is.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub standard_text: Option<String>,
    pub candidate_text: Option<String>,
    pub last_report: Option<Arc<FindingReport>>,
}

pub(crate) type Fingerprint = [u8; 32];

pub(crate) fn fingerprint(bytes: &[u8]) -> Fingerprint {
    Sha256::digest(bytes).into()
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    standard_text: String,
    candidate_text: String,
    last_report: Option<Arc<FindingReport>>,
    /// Digest of the last upload that produced each text.
    uploads: HashMap<TextSlot, Fingerprint>,
    /// Bumped by every write to a text and every upload that starts.
    revisions: HashMap<TextSlot, u64>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> SlotValue {
        match slot {
            Slot::StandardText => SlotValue::Text(self.standard_text.clone()),
            Slot::CandidateText => SlotValue::Text(self.candidate_text.clone()),
            Slot::LastReport => SlotValue::Report(self.last_report.clone()),
        }
    }

    /// # Errors
    /// [`SessionError::SlotMismatch`] when the value kind does not fit the slot.
    pub fn set(&mut self, slot: Slot, value: SlotValue) -> Result<(), SessionError> {
        match (slot, value) {
            (Slot::StandardText, SlotValue::Text(t)) => {
                self.set_text(TextSlot::Standard, t);
            }
            (Slot::CandidateText, SlotValue::Text(t)) => {
                self.set_text(TextSlot::Candidate, t);
            }
            (Slot::LastReport, SlotValue::Report(r)) => self.last_report = r,
            (slot, _) => {
                return Err(SessionError::SlotMismatch {
                    slot,
                    expected: match slot {
                        Slot::LastReport => "a report",
                        Slot::StandardText | Slot::CandidateText => "text",
                    },
                });
            }
        }
        Ok(())
    }

    pub fn merge(&mut self, patch: SessionPatch) {
        if let Some(t) = patch.standard_text {
            self.set_text(TextSlot::Standard, t);
        }
        if let Some(t) = patch.candidate_text {
            self.set_text(TextSlot::Candidate, t);
        }
        if let Some(r) = patch.last_report {
            self.last_report = Some(r);
        }
    }

    pub fn text(&self, slot: TextSlot) -> &str {
        match slot {
            TextSlot::Standard => &self.standard_text,
            TextSlot::Candidate => &self.candidate_text,
        }
    }

    /// Replaces a text. Returns `true` if the content changed.
    ///
    /// A manual write forgets the upload fingerprint, so uploading the
    /// same file again re-extracts it.
    pub fn set_text(&mut self, slot: TextSlot, text: String) -> bool {
        self.begin_write(slot);
        self.uploads.remove(&slot);
        let current = match slot {
            TextSlot::Standard => &mut self.standard_text,
            TextSlot::Candidate => &mut self.candidate_text,
        };
        if *current == text {
            return false;
        }
        *current = text;
        true
    }

    pub fn last_report(&self) -> Option<Arc<FindingReport>> {
        self.last_report.clone()
    }

    /// Swaps in a new report and returns the shared handle to it.
    pub fn replace_report(&mut self, report: FindingReport) -> Arc<FindingReport> {
        let report = Arc::new(report);
        self.last_report = Some(Arc::clone(&report));
        report
    }

    pub(crate) fn upload_matches(&self, slot: TextSlot, fp: &Fingerprint) -> bool {
        self.uploads.get(&slot) == Some(fp)
    }

    pub(crate) fn record_upload(&mut self, slot: TextSlot, fp: Fingerprint) {
        self.uploads.insert(slot, fp);
    }

    /// Claims the next revision of `slot`. Any later write supersedes it.
    pub(crate) fn begin_write(&mut self, slot: TextSlot) -> u64 {
        let rev = self.revisions.entry(slot).or_default();
        *rev += 1;
        *rev
    }

    /// `true` while nothing has written to `slot` since `rev` was claimed.
    pub(crate) fn is_current(&self, slot: TextSlot, rev: u64) -> bool {
        self.revisions.get(&slot).copied().unwrap_or_default() == rev
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            standard_chars: self.standard_text.chars().count(),
            candidate_chars: self.candidate_text.chars().count(),
            standard_text: self.standard_text.clone(),
            candidate_text: self.candidate_text.clone(),
            last_report: self.last_report.clone(),
        }
    }
}

/// Read-only copy of a session, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub standard_text: String,
    pub candidate_text: String,
    pub standard_chars: usize,
    pub candidate_chars: usize,
    pub last_report: Option<Arc<FindingReport>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Summary;
    use pretty_assertions::assert_eq;

    fn report(total: u32) -> FindingReport {
        FindingReport {
            summary: Summary {
                total_issues: total,
                ..Summary::default()
            },
            violations: Vec::new(),
        }
    }

    #[test]
    fn fresh_state_reads_empty_defaults() {
        let state = SessionState::new();
        assert_eq!(state.get(Slot::StandardText), SlotValue::Text(String::new()));
        assert_eq!(state.get(Slot::CandidateText), SlotValue::Text(String::new()));
        assert_eq!(state.get(Slot::LastReport), SlotValue::Report(None));
    }

    #[test]
    fn set_then_get_returns_last_write() {
        let mut state = SessionState::new();
        state
            .set(Slot::StandardText, SlotValue::Text("a".into()))
            .unwrap();
        state
            .set(Slot::StandardText, SlotValue::Text("b".into()))
            .unwrap();
        assert_eq!(state.get(Slot::StandardText), SlotValue::Text("b".into()));
        assert_eq!(state.text(TextSlot::Candidate), "");
    }

    #[test]
    fn mismatched_value_is_rejected() {
        let mut state = SessionState::new();
        let err = state
            .set(Slot::LastReport, SlotValue::Text("x".into()))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::SlotMismatch {
                slot: Slot::LastReport,
                expected: "a report"
            }
        );
        assert!(state.set(Slot::CandidateText, SlotValue::Report(None)).is_err());
    }

    #[test]
    fn report_is_replaced_whole() {
        let mut state = SessionState::new();
        let first = state.replace_report(report(1));
        let second = state.replace_report(report(2));
        assert_eq!(first.summary.total_issues, 1);
        assert!(Arc::ptr_eq(&state.last_report().unwrap(), &second));
    }

    #[test]
    fn merge_touches_only_present_fields() {
        let mut state = SessionState::new();
        state.set_text(TextSlot::Standard, "keep".into());
        state.merge(SessionPatch {
            candidate_text: Some("new".into()),
            last_report: Some(Arc::new(report(3))),
            ..SessionPatch::default()
        });
        assert_eq!(state.text(TextSlot::Standard), "keep");
        assert_eq!(state.text(TextSlot::Candidate), "new");
        assert_eq!(state.last_report().unwrap().summary.total_issues, 3);
    }

    #[test]
    fn manual_edit_forgets_upload_fingerprint() {
        let mut state = SessionState::new();
        let fp = fingerprint(b"file");
        state.record_upload(TextSlot::Standard, fp);
        assert!(state.upload_matches(TextSlot::Standard, &fp));
        assert!(!state.upload_matches(TextSlot::Candidate, &fp));

        assert!(state.set_text(TextSlot::Standard, "edited".into()));
        assert!(!state.upload_matches(TextSlot::Standard, &fp));
        assert!(!state.set_text(TextSlot::Standard, "edited".into()));
    }

    #[test]
    fn later_writes_supersede_a_claimed_revision() {
        let mut state = SessionState::new();
        let first = state.begin_write(TextSlot::Standard);
        assert!(state.is_current(TextSlot::Standard, first));

        let second = state.begin_write(TextSlot::Standard);
        assert!(!state.is_current(TextSlot::Standard, first));
        assert!(state.is_current(TextSlot::Standard, second));

        state.set_text(TextSlot::Standard, "edited".into());
        assert!(!state.is_current(TextSlot::Standard, second));

        let other = state.begin_write(TextSlot::Candidate);
        assert!(state.is_current(TextSlot::Candidate, other));
    }

    #[test]
    fn snapshot_counts_characters() {
        let mut state = SessionState::new();
        state.set_text(TextSlot::Candidate, "Zahlung fällig".into());
        let snap = state.snapshot();
        assert_eq!(snap.candidate_chars, 14);
        assert_eq!(snap.standard_chars, 0);
        assert!(snap.last_report.is_none());
    }
}
