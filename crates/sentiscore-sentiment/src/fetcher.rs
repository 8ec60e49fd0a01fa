//! Embedding fetch: preprocessing, retried provider call, and dimension
//! normalization.

use std::sync::Arc;

use crate::error::SentimentError;
use crate::params::EmbeddingParams;
use crate::provider::EmbeddingProvider;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// Fetches embeddings from the provider with bounded retry.
///
/// The same fetcher (and the same retry policy) serves both exemplar
/// embeddings and per-request input-text embeddings.
pub struct EmbeddingFetcher {
    provider: Arc<dyn EmbeddingProvider>,
    retry: RetryPolicy,
}

impl EmbeddingFetcher {
    #[must_use]
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_retry_policy(provider, RetryPolicy::default())
    }

    #[must_use]
    pub fn with_retry_policy(provider: Arc<dyn EmbeddingProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Fetch one embedding for `text`, normalized to the target dimension.
    ///
    /// Newlines are replaced with spaces before the call (they degrade
    /// embedding quality), and the `dimensions` override is stripped from the
    /// forwarded params while still driving the normalization step.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::Http`] / [`SentimentError::Provider`] once the
    ///   retry budget is exhausted; the final error is surfaced unchanged.
    /// - [`SentimentError::EmptyResponse`] if the provider answered without
    ///   any embedding data. This check runs after a successful call and is
    ///   not retried.
    pub async fn fetch(
        &self,
        text: &str,
        params: &EmbeddingParams,
    ) -> Result<Vec<f32>, SentimentError> {
        // Newlines can negatively affect embedding performance.
        let text = text.replace('\n', " ");
        let target_dim = params.target_dim();
        let provider_params = params.for_provider();

        let response = retry_with_backoff(self.retry, || {
            self.provider.embed(&text, &provider_params)
        })
        .await?;

        let embedding = response
            .data
            .and_then(|data| data.into_iter().next())
            .ok_or(SentimentError::EmptyResponse)?
            .embedding;

        Ok(normalize_dimensions(embedding, target_dim))
    }

    /// Batch helper used for input texts: one slot per text, `None` where the
    /// fetch failed. Failures are logged, not propagated, so one bad text
    /// cannot fail a whole batch.
    pub async fn generate_embeddings(
        &self,
        texts: &[&str],
        params: &EmbeddingParams,
    ) -> Vec<Option<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            match self.fetch(text, params).await {
                Ok(vector) => vectors.push(Some(vector)),
                Err(e) => {
                    tracing::warn!(error = %e, "embedding generation failed for input text");
                    vectors.push(None);
                }
            }
        }
        vectors
    }
}

/// Force `vector` to `target_dim` entries: truncate when longer, zero-pad
/// when shorter.
#[must_use]
pub fn normalize_dimensions(mut vector: Vec<f32>, target_dim: usize) -> Vec<f32> {
    vector.resize(target_dim, 0.0);
    vector
}
