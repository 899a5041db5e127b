//! Paragraph text from `.docx` via `docx-rs`.
//!
//! The OOXML body is walked as Document → Paragraph → Run → Text. Every
//! top-level paragraph becomes one line, empty ones included, so paragraph
//! boundaries survive. A body with no visible text is a warning. Tables, images and other non-paragraph blocks are not
//! read.

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, read_docx};

use crate::{errors::ExtractionWarning, media_kind::MediaKind};

pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractionWarning> {
    let docx = read_docx(bytes).map_err(|e| ExtractionWarning::Docx(format!("{e:?}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    let text = paragraphs.join("\n");
    if text.trim().is_empty() {
        return Err(ExtractionWarning::NoExtractableText(MediaKind::Docx));
    }
    Ok(text)
}

/// Runs are parts of the same sentence, so they are joined without a separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    RunChild::Text(t) => out.push_str(&t.text),
                    RunChild::Tab(_) => out.push('\t'),
                    _ => {}
                }
            }
        }
    }
    out
}
