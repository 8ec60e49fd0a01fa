use thiserror::Error;

/// Errors produced by the sentiment scoring pipeline.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// Network or TLS failure from the underlying HTTP client. Retried.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The embedding provider returned a non-success status or an
    /// application-level error. Retried.
    #[error("embedding provider error: {0}")]
    Provider(String),

    /// The provider call succeeded transport-wise but carried no embedding
    /// data. Raised after the call, outside the retry loop.
    #[error("no data returned from the embedding model")]
    EmptyResponse,

    /// The input text produced no usable vector. Surfaced immediately as a
    /// request failure, never retried.
    #[error("no vector returned from the embedding model")]
    NoVector,

    /// A reference or input vector has zero magnitude, so cosine similarity
    /// is undefined.
    #[error("zero-magnitude vector: cosine similarity is undefined")]
    ZeroMagnitude,
}
