use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";

/// Declared kind of an uploaded document. Chosen from what the uploader
/// says, never sniffed from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[serde(alias = "txt")]
    Text,
    Pdf,
    Docx,
}

impl MediaKind {
    /// Maps a declared MIME type. Anything that is neither PDF nor DOCX is
    /// read as plain text.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            MIME_PDF => MediaKind::Pdf,
            MIME_DOCX => MediaKind::Docx,
            _ => MediaKind::Text,
        }
    }

    /// `txt`, `pdf` or `docx` (case-insensitive, leading dot allowed).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" | "text" => Some(MediaKind::Text),
            "pdf" => Some(MediaKind::Pdf),
            "docx" => Some(MediaKind::Docx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_mime(self) -> &'static str {
        match self {
            MediaKind::Text => MIME_TEXT,
            MediaKind::Pdf => MIME_PDF,
            MediaKind::Docx => MIME_DOCX,
        }
    }
}

impl FromStr for MediaKind {
    type Err = UnknownMediaKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| UnknownMediaKind(s.to_string()))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaKind::Text => "text",
            MediaKind::Pdf => "PDF",
            MediaKind::Docx => "Word",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported document kind `{0}` (expected txt, pdf or docx)")]
pub struct UnknownMediaKind(pub String);
