use crate::errors::ExtractionWarning;

const UTF8_BOM: &str = "\u{feff}";

/// Strict UTF-8 decode; a leading byte-order mark is dropped.
pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractionWarning> {
    let text = std::str::from_utf8(bytes).map_err(|e| ExtractionWarning::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
}
