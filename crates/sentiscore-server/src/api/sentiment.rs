use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use sentiscore_sentiment::{scorer, EmbeddingParams, SentimentError};

use crate::middleware::RequestId;

use super::{map_sentiment_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SentimentRequest {
    pub text: String,
    pub embeddings_litellm_params: EmbeddingParams,
}

/// `POST /sentiment` — embed the input text, compare it against the cached
/// exemplar embeddings, return the scored result.
pub(super) async fn analyze_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<SentimentRequest>,
) -> Result<Json<scorer::ScoreResult>, ApiError> {
    let params = &request.embeddings_litellm_params;

    let vector = state
        .fetcher
        .generate_embeddings(&[request.text.as_str()], params)
        .await
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| map_sentiment_error(req_id.0.clone(), &SentimentError::NoVector))?;

    let refs = state
        .cache
        .get_reference_embeddings(&state.fetcher, params)
        .await
        .map_err(|e| map_sentiment_error(req_id.0.clone(), &e))?;

    let result =
        scorer::score(&vector, &refs).map_err(|e| map_sentiment_error(req_id.0.clone(), &e))?;

    Ok(Json(result))
}
