//! Embedding-based sentiment scoring for sentiscore.
//!
//! Embeds input text via a remote embedding provider (with bounded retry),
//! caches two exemplar-sentence embeddings per model for the process lifetime,
//! and scores text by the cosine-similarity gap between the input vector and
//! the positive/negative exemplars.

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod params;
pub mod provider;
pub mod retry;
pub mod scorer;

pub use cache::{ReferenceCache, ReferenceEmbeddings};
pub use error::SentimentError;
pub use fetcher::EmbeddingFetcher;
pub use params::EmbeddingParams;
pub use provider::{EmbeddingProvider, HttpEmbeddingProvider};
pub use retry::RetryPolicy;
pub use scorer::{score, ScoreResult, SentimentLabel};
