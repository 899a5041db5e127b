//! Contract comparison: two contract texts in, one structured finding report out.
//!
//! - [`session`]: per-operator state (texts + last report)
//! - [`prompt`]: the fixed comparison prompt
//! - [`client`]: the remote call seam
//! - [`parser`]: untrusted model text → [`report::FindingReport`]
//! - [`pipeline`]: ties them together with single-flight analysis

pub mod client;
pub mod errors;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod session;

pub use client::AnalysisClient;
pub use errors::{AnalysisError, ClientError, MalformedResponse, PreconditionError, SessionError};
pub use pipeline::{Analyzer, IngestOutcome, Session};
pub use report::{Category, FindingReport, RiskLevel, Severity, Summary, Violation};
pub use session::{SessionPatch, SessionSnapshot, SessionState, Slot, SlotValue, TextSlot};
