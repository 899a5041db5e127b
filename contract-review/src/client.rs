//! Analysis Client seam.
//!
//! The pipeline only needs "prompt + credential in, response text out".
//! [`LlmService`] is the production implementation; tests plug in a mock.

use std::future::Future;

use ai_llm_service::{ApiKey, LlmService};
use tracing::instrument;

use crate::errors::ClientError;

pub trait AnalysisClient: Send + Sync {
    /// Exactly one remote call. No retry.
    fn run_comparison(
        &self,
        prompt: &str,
        credential: &ApiKey,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;
}

impl AnalysisClient for LlmService {
    #[instrument(name = "analysis_client.run_comparison", skip_all, fields(provider = %self.config().provider))]
    async fn run_comparison(&self, prompt: &str, credential: &ApiKey) -> Result<String, ClientError> {
        Ok(self.generate(prompt, None, credential).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let svc = LlmService::new(LlmModelConfig {
            provider: LlmProvider::Anthropic,
            model: "m".into(),
            endpoint: "http://127.0.0.1:9".into(),
            max_tokens: Some(16),
            temperature: None,
            timeout_secs: Some(2),
            api_version: None,
        })
        .unwrap();
        let key = ApiKey::new("sk-test").unwrap();

        let err = svc.run_comparison("compare", &key).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
    }
}
