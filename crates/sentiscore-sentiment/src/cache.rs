//! Process-lifetime cache of the two exemplar-sentence embeddings.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::SentimentError;
use crate::fetcher::EmbeddingFetcher;
use crate::params::EmbeddingParams;

/// Canonical strongly-negative exemplar sentence.
pub const NEGATIVE_EXEMPLAR: &str = "Comment of a user who is extremely dissatisfied";
/// Canonical strongly-positive exemplar sentence.
pub const POSITIVE_EXEMPLAR: &str = "Comment of a very happy and satisfied user";

/// The two reference vectors for one embedding model.
#[derive(Debug, Clone)]
pub struct ReferenceEmbeddings {
    pub negative: Vec<f32>,
    pub positive: Vec<f32>,
}

/// Keyed store of exemplar embeddings, one entry per embedding model.
///
/// Owned by the service instance and injected where needed, so tests get
/// isolated caches. Entries are populated lazily and never evicted: the key
/// space is bounded by configuration diversity, not request volume.
#[derive(Default)]
pub struct ReferenceCache {
    entries: RwLock<HashMap<String, Arc<ReferenceEmbeddings>>>,
}

impl ReferenceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the exemplar pair for `params.model`, fetching and caching it
    /// on first use.
    ///
    /// The lock is never held across a provider call, so concurrent first
    /// requests for the same key may each fetch and insert. That race is
    /// benign: both writers compute the same pair, last write wins.
    ///
    /// # Errors
    ///
    /// Propagates any [`SentimentError`] from the exemplar fetches.
    pub async fn get_reference_embeddings(
        &self,
        fetcher: &EmbeddingFetcher,
        params: &EmbeddingParams,
    ) -> Result<Arc<ReferenceEmbeddings>, SentimentError> {
        if let Some(entry) = self.entries.read().await.get(&params.model) {
            return Ok(Arc::clone(entry));
        }

        tracing::debug!(model = %params.model, "reference embeddings not cached, fetching exemplars");
        let negative = fetcher.fetch(NEGATIVE_EXEMPLAR, params).await?;
        let positive = fetcher.fetch(POSITIVE_EXEMPLAR, params).await?;
        let entry = Arc::new(ReferenceEmbeddings { negative, positive });

        self.entries
            .write()
            .await
            .insert(params.model.clone(), Arc::clone(&entry));
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::provider::{EmbedData, EmbedResponse, EmbeddingProvider};
    use crate::retry::RetryPolicy;

    /// Fake provider that returns a distinct vector per exemplar and counts
    /// every call.
    struct ExemplarProvider {
        calls: AtomicU32,
        inputs: Mutex<Vec<String>>,
    }

    impl ExemplarProvider {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
                inputs: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for ExemplarProvider {
        async fn embed(
            &self,
            input: &str,
            _params: &EmbeddingParams,
        ) -> Result<EmbedResponse, SentimentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inputs.lock().unwrap().push(input.to_owned());
            let embedding = if input == NEGATIVE_EXEMPLAR {
                vec![0.0, 1.0, 0.0]
            } else {
                vec![0.0, 0.0, 1.0]
            };
            Ok(EmbedResponse {
                data: Some(vec![EmbedData { embedding }]),
            })
        }
    }

    fn params(model: &str) -> EmbeddingParams {
        let mut p = EmbeddingParams::new(model);
        p.dimensions = Some(3);
        p
    }

    #[tokio::test]
    async fn second_call_with_same_model_is_a_pure_cache_hit() {
        let provider = Arc::new(ExemplarProvider::new());
        let fetcher =
            EmbeddingFetcher::with_retry_policy(provider.clone(), RetryPolicy::immediate(6));
        let cache = ReferenceCache::new();
        let p = params("text-embedding-3-small");

        let first = cache.get_reference_embeddings(&fetcher, &p).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

        let second = cache.get_reference_embeddings(&fetcher, &p).await.unwrap();
        assert_eq!(
            provider.calls.load(Ordering::SeqCst),
            2,
            "cache hit must not fetch"
        );
        assert_eq!(first.negative, second.negative);
        assert_eq!(first.positive, second.positive);
    }

    #[tokio::test]
    async fn negative_exemplar_is_fetched_first() {
        let provider = Arc::new(ExemplarProvider::new());
        let fetcher =
            EmbeddingFetcher::with_retry_policy(provider.clone(), RetryPolicy::immediate(6));
        let cache = ReferenceCache::new();

        cache
            .get_reference_embeddings(&fetcher, &params("m"))
            .await
            .unwrap();

        let inputs = provider.inputs.lock().unwrap();
        assert_eq!(inputs[0], NEGATIVE_EXEMPLAR);
        assert_eq!(inputs[1], POSITIVE_EXEMPLAR);
    }

    #[tokio::test]
    async fn distinct_models_get_distinct_entries() {
        let provider = Arc::new(ExemplarProvider::new());
        let fetcher =
            EmbeddingFetcher::with_retry_policy(provider.clone(), RetryPolicy::immediate(6));
        let cache = ReferenceCache::new();

        cache
            .get_reference_embeddings(&fetcher, &params("model-a"))
            .await
            .unwrap();
        cache
            .get_reference_embeddings(&fetcher, &params("model-b"))
            .await
            .unwrap();

        assert_eq!(
            provider.calls.load(Ordering::SeqCst),
            4,
            "each model key fetches its own exemplar pair"
        );
    }

    #[tokio::test]
    async fn pair_is_indexed_negative_then_positive() {
        let provider = Arc::new(ExemplarProvider::new());
        let fetcher =
            EmbeddingFetcher::with_retry_policy(provider.clone(), RetryPolicy::immediate(6));
        let cache = ReferenceCache::new();

        let refs = cache
            .get_reference_embeddings(&fetcher, &params("m"))
            .await
            .unwrap();

        assert_eq!(refs.negative, vec![0.0, 1.0, 0.0]);
        assert_eq!(refs.positive, vec![0.0, 0.0, 1.0]);
    }
}
