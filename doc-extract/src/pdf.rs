//! Per-page PDF text via `lopdf`.
//!
//! Pages are visited in page-number order. A page whose content yields no
//! text (image-only scans, unsupported font encodings) contributes nothing;
//! a document with no text at all, including one with no pages, is a warning.

use lopdf::Document;
use tracing::debug;

use crate::{errors::ExtractionWarning, media_kind::MediaKind};

pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractionWarning> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionWarning::Pdf(e.to_string()))?;

    let pages = doc.get_pages();
    let mut texts = Vec::with_capacity(pages.len());
    for &page_no in pages.keys() {
        match doc.extract_text(&[page_no]) {
            Ok(text) if !text.trim().is_empty() => texts.push(text.trim_end().to_string()),
            Ok(_) => debug!(page = page_no, "page has no text"),
            Err(e) => debug!(page = page_no, error = %e, "page text not extractable"),
        }
    }

    if texts.is_empty() {
        return Err(ExtractionWarning::NoExtractableText(MediaKind::Pdf));
    }
    Ok(texts.join("\n"))
}
