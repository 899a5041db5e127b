//! Document Extractor: uploaded bytes + declared kind → one plain-text blob.
//!
//! [`extract`] never fails and never panics past its boundary. Parser errors,
//! empty uploads and even panics inside the PDF/DOCX libraries come back as an
//! empty text plus an [`ExtractionWarning`].
//!
//! ```
//! use doc_extract::{MediaKind, extract};
//!
//! let out = extract(b"Payment due within 30 days.", MediaKind::Text);
//! assert_eq!(out.text, "Payment due within 30 days.");
//! assert!(out.warning.is_none());
//!
//! let out = extract(b"", MediaKind::Pdf);
//! assert!(out.text.is_empty());
//! assert!(out.warning.is_some());
//! ```

mod docx;
pub mod errors;
pub mod media_kind;
mod pdf;
mod plain;

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

pub use errors::ExtractionWarning;
pub use media_kind::{MediaKind, UnknownMediaKind};

/// Result of one extraction. `warning` is set exactly when something went
/// wrong; `text` is then empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub warning: Option<ExtractionWarning>,
}

impl Extraction {
    fn ok(text: String) -> Self {
        Self {
            text,
            warning: None,
        }
    }

    fn failed(warning: ExtractionWarning) -> Self {
        Self {
            text: String::new(),
            warning: Some(warning),
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Converts an uploaded document to text according to its declared kind.
pub fn extract(bytes: &[u8], kind: MediaKind) -> Extraction {
    if bytes.is_empty() {
        warn!(%kind, "empty upload");
        return Extraction::failed(ExtractionWarning::EmptyInput(kind));
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| match kind {
        MediaKind::Text => plain::extract(bytes),
        MediaKind::Pdf => pdf::extract(bytes),
        MediaKind::Docx => docx::extract(bytes),
    }));

    match outcome {
        Ok(Ok(text)) => {
            debug!(%kind, bytes = bytes.len(), chars = text.chars().count(), "document extracted");
            Extraction::ok(text)
        }
        Ok(Err(warning)) => {
            warn!(%kind, %warning, "extraction failed");
            Extraction::failed(warning)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(%kind, %message, "extractor panicked");
            Extraction::failed(ExtractionWarning::Panicked { kind, message })
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
