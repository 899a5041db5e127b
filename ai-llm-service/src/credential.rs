//! Operator-supplied API key.
//!
//! The key only ever lives in memory for the duration of one call. It has no
//! `Display`/`Serialize` impl and its `Debug` output is redacted, so it cannot
//! end up in logs or persisted state by accident.

use std::fmt;

use reqwest::header::HeaderValue;

use crate::{
    config::llm_provider::LlmProvider,
    error_handler::{ProviderError, ProviderErrorKind, Result},
};

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a raw key; blank input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The secret itself. Only the HTTP clients should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Header value flagged as sensitive so HTTP tooling never prints it.
    pub(crate) fn header_value(&self, provider: LlmProvider, prefix: &str) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("{prefix}{}", self.0)).map_err(|_| {
            ProviderError::new(
                provider,
                ProviderErrorKind::Decode("API key contains characters not allowed in a header".into()),
            )
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
