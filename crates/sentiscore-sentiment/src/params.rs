//! Provider configuration attached to each scoring request.

use serde::{Deserialize, Serialize};

/// Dimensionality used when the request does not ask for one.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Embedding provider configuration, as received on the wire.
///
/// `model` doubles as the reference-cache key. Any provider-specific options
/// beyond the two named fields are carried through verbatim in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingParams {
    pub model: String,

    /// Requested output dimensionality. Stripped from the copy forwarded to
    /// the provider (some models reject it) but still honored when the
    /// returned vector is normalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EmbeddingParams {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            dimensions: None,
            extra: serde_json::Map::new(),
        }
    }

    /// The dimensionality the caller ultimately wants, defaulting to
    /// [`DEFAULT_EMBEDDING_DIM`].
    #[must_use]
    pub fn target_dim(&self) -> usize {
        self.dimensions.unwrap_or(DEFAULT_EMBEDDING_DIM)
    }

    /// Copy of these params safe to forward to the provider: identical except
    /// the `dimensions` override is removed.
    #[must_use]
    pub fn for_provider(&self) -> Self {
        Self {
            dimensions: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_dim_defaults_to_1536() {
        let params = EmbeddingParams::new("text-embedding-3-small");
        assert_eq!(params.target_dim(), 1536);
    }

    #[test]
    fn target_dim_honors_override() {
        let mut params = EmbeddingParams::new("text-embedding-3-small");
        params.dimensions = Some(256);
        assert_eq!(params.target_dim(), 256);
    }

    #[test]
    fn for_provider_strips_dimensions() {
        let mut params = EmbeddingParams::new("text-embedding-3-small");
        params.dimensions = Some(256);
        let forwarded = params.for_provider();
        assert!(forwarded.dimensions.is_none());
        assert_eq!(forwarded.model, "text-embedding-3-small");
    }

    #[test]
    fn for_provider_keeps_extra_options() {
        let mut params = EmbeddingParams::new("azure/text-embedding-ada-002");
        params.dimensions = Some(512);
        params
            .extra
            .insert("api_base".to_owned(), "https://example.test".into());
        let forwarded = params.for_provider();
        assert_eq!(
            forwarded.extra.get("api_base").and_then(|v| v.as_str()),
            Some("https://example.test")
        );
    }

    #[test]
    fn serialized_form_omits_absent_dimensions() {
        let params = EmbeddingParams::new("text-embedding-3-small").for_provider();
        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("dimensions").is_none());
    }

    #[test]
    fn deserializes_unknown_keys_into_extra() {
        let params: EmbeddingParams = serde_json::from_value(serde_json::json!({
            "model": "text-embedding-3-small",
            "dimensions": 128,
            "api_version": "2024-02-01",
        }))
        .unwrap();
        assert_eq!(params.dimensions, Some(128));
        assert_eq!(
            params.extra.get("api_version").and_then(|v| v.as_str()),
            Some("2024-02-01")
        );
    }
}
