//! Analysis pipeline over one session.
//!
//! ```text
//! upload ─► extract ─► session text ┐
//! manual edit ─────────► session text ┼─► prompt ─► client ─► parser ─► last report
//! ```
//!
//! - Preconditions (credential, both texts) are checked before any call.
//! - At most one analysis runs per [`Session`]; a second one gets
//!   [`AnalysisError::Busy`] instead of queueing.
//! - A failed analysis leaves the previous report in place.

use std::sync::Arc;

use ai_llm_service::ApiKey;
use doc_extract::{Extraction, ExtractionWarning, MediaKind};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::{
    client::AnalysisClient,
    errors::{AnalysisError, AnalysisResult, PreconditionError},
    parser::parse_finding_report,
    prompt::build_comparison_prompt,
    report::FindingReport,
    session::{
        Fingerprint, SessionPatch, SessionSnapshot, SessionState, Slot, SlotValue, TextSlot, fingerprint,
    },
};

/// What an upload or edit did to its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Characters now stored in the slot.
    pub chars: usize,
    /// `false` when the stored text was already identical.
    pub changed: bool,
    /// A newer upload or edit of the same slot landed while this one was
    /// being extracted; its text was discarded.
    pub superseded: bool,
    /// Set when extraction failed; the slot then holds `""`.
    pub warning: Option<ExtractionWarning>,
}

/// One operator session: its state plus the single-flight analysis gate.
#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<SessionState>,
    analysis_gate: Mutex<()>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn get(&self, slot: Slot) -> SlotValue {
        self.state.read().await.get(slot)
    }

    pub async fn merge(&self, patch: SessionPatch) {
        self.state.write().await.merge(patch);
    }

    pub async fn last_report(&self) -> Option<Arc<FindingReport>> {
        self.state.read().await.last_report()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis_gate.try_lock().is_err()
    }

    /// Replaces a text with operator-edited content.
    pub async fn set_text(&self, slot: TextSlot, text: String) -> IngestOutcome {
        let chars = text.chars().count();
        let changed = self.state.write().await.set_text(slot, text);
        debug!(%slot, chars, changed, "text edited");
        IngestOutcome {
            chars,
            changed,
            superseded: false,
            warning: None,
        }
    }

    /// Extracts an uploaded document into `slot`.
    ///
    /// Re-sending the bytes that produced the current text does no work. A
    /// failed extraction stores `""` so a stale text is never analyzed in
    /// its place. When uploads or edits of one slot overlap, the one
    /// submitted last wins regardless of which extraction finishes first.
    #[instrument(name = "session.ingest_document", skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn ingest_document(&self, slot: TextSlot, bytes: Vec<u8>, kind: MediaKind) -> IngestOutcome {
        let fp = fingerprint(&bytes);
        let rev = {
            let mut state = self.state.write().await;
            if state.upload_matches(slot, &fp) {
                debug!("same upload as before, extraction skipped");
                return IngestOutcome {
                    chars: state.text(slot).chars().count(),
                    changed: false,
                    superseded: false,
                    warning: None,
                };
            }
            state.begin_write(slot)
        };

        // PDF/DOCX parsing is CPU-bound
        let extraction = tokio::task::spawn_blocking(move || doc_extract::extract(&bytes, kind))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "extraction task did not complete");
                Extraction {
                    text: String::new(),
                    warning: Some(ExtractionWarning::Panicked {
                        kind,
                        message: e.to_string(),
                    }),
                }
            });

        self.commit_upload(slot, rev, fp, extraction).await
    }

    /// Stores an extraction unless a newer write to `slot` came after `rev`.
    async fn commit_upload(&self, slot: TextSlot, rev: u64, fp: Fingerprint, extraction: Extraction) -> IngestOutcome {
        let mut state = self.state.write().await;
        if !state.is_current(slot, rev) {
            info!(%slot, "newer write to slot, extraction discarded");
            return IngestOutcome {
                chars: state.text(slot).chars().count(),
                changed: false,
                superseded: true,
                warning: None,
            };
        }

        let chars = extraction.char_count();
        let changed = state.set_text(slot, extraction.text);
        if extraction.warning.is_none() {
            state.record_upload(slot, fp);
        }
        info!(chars, changed, failed = extraction.warning.is_some(), "document ingested");

        IngestOutcome {
            chars,
            changed,
            superseded: false,
            warning: extraction.warning,
        }
    }
}

/// Runs comparisons through an [`AnalysisClient`].
#[derive(Debug)]
pub struct Analyzer<C> {
    client: C,
}

impl<C: AnalysisClient> Analyzer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Compares the session's two texts and stores the resulting report.
    ///
    /// # Errors
    /// - [`AnalysisError::Busy`] if this session is already being analyzed
    /// - [`AnalysisError::Precondition`] before any remote call
    /// - client and parse failures; the previous report is kept
    #[instrument(name = "analyzer.analyze", skip_all)]
    pub async fn analyze(
        &self,
        session: &Session,
        credential: Option<&ApiKey>,
    ) -> AnalysisResult<Arc<FindingReport>> {
        let _gate = session.analysis_gate.try_lock().map_err(|_| {
            warn!("analysis already running");
            AnalysisError::Busy
        })?;

        let credential = credential.ok_or(PreconditionError::MissingCredential)?;
        let (standard, candidate) = {
            let state = session.state.read().await;
            (
                state.text(TextSlot::Standard).to_owned(),
                state.text(TextSlot::Candidate).to_owned(),
            )
        };
        if standard.trim().is_empty() {
            return Err(PreconditionError::MissingStandardText.into());
        }
        if candidate.trim().is_empty() {
            return Err(PreconditionError::MissingCandidateText.into());
        }

        let prompt = build_comparison_prompt(&standard, &candidate);
        debug!(
            standard_chars = standard.chars().count(),
            candidate_chars = candidate.chars().count(),
            prompt_len = prompt.len(),
            "sending comparison"
        );

        let raw = self
            .client
            .run_comparison(&prompt, credential)
            .await
            .inspect_err(|e| warn!(error = %e, "comparison call failed"))?;
        let report = parse_finding_report(&raw).inspect_err(|e| warn!(error = %e, "response rejected"))?;

        let report = session.state.write().await.replace_report(report);
        info!(
            violations = report.violations.len(),
            overall_risk = report.summary.overall_risk.label(),
            "analysis complete"
        );
        Ok(report)
    }
}
