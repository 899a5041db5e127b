//! Recoverable extraction problems.
//!
//! None of these stop the caller: the extractor returns empty text together
//! with the warning, and the presentation layer shows it as a notice.

use thiserror::Error;

use crate::media_kind::MediaKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionWarning {
    #[error("the uploaded {0} file is empty")]
    EmptyInput(MediaKind),

    #[error("file is not valid UTF-8 text (first invalid byte at offset {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read Word document: {0}")]
    Docx(String),

    /// Parsed fine, but no page or paragraph produced text (e.g. a scanned PDF).
    #[error("no extractable text found in the {0} file")]
    NoExtractableText(MediaKind),

    #[error("{kind} parser failed unexpectedly: {message}")]
    Panicked { kind: MediaKind, message: String },
}
