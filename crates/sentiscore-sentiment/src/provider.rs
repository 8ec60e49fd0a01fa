//! Embedding provider capability: trait seam plus the reqwest-backed
//! OpenAI-compatible client used in production.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;
use crate::params::EmbeddingParams;

/// One embedding in a provider response.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedData {
    pub embedding: Vec<f32>,
}

/// Raw provider response. `data` may be absent or empty — callers decide
/// whether that is an error.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    #[serde(default)]
    pub data: Option<Vec<EmbedData>>,
}

/// The opaque embedding capability: `embed(text, params) -> response`.
///
/// Injectable so tests can substitute call-counting fakes for the remote
/// provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single input text with the given provider params.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] or [`SentimentError::Provider`] on
    /// transport or provider-side failure.
    async fn embed(
        &self,
        input: &str,
        params: &EmbeddingParams,
    ) -> Result<EmbedResponse, SentimentError>;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
    /// Ask the provider to drop options the selected model does not support
    /// instead of rejecting the call.
    drop_params: bool,
    #[serde(flatten)]
    extra: &'a serde_json::Map<String, serde_json::Value>,
}

/// OpenAI-compatible `/embeddings` HTTP client.
///
/// Points at a litellm-style gateway in production; use a wiremock base URL
/// in tests.
pub struct HttpEmbeddingProvider {
    client: Client,
    url: Url,
    api_key: Option<String>,
}

impl HttpEmbeddingProvider {
    /// Creates a provider client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SentimentError::Provider`] if `base_url`
    /// is not a valid URL.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sentiscore/0.1 (sentiment-scoring)")
            .build()?;

        let joined = format!("{}/embeddings", base_url.trim_end_matches('/'));
        let url = Url::parse(&joined).map_err(|e| {
            SentimentError::Provider(format!("invalid provider base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            url,
            api_key: api_key.map(ToOwned::to_owned),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(
        &self,
        input: &str,
        params: &EmbeddingParams,
    ) -> Result<EmbedResponse, SentimentError> {
        let body = EmbedRequest {
            model: &params.model,
            input,
            drop_params: true,
            extra: &params.extra,
        };

        let mut request = self.client.post(self.url.clone()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SentimentError::Provider(format!(
                "provider returned status {status}: {detail}"
            )));
        }

        Ok(response.json().await?)
    }
}
