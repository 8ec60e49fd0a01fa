//! Cosine-similarity sentiment scorer.
//!
//! An input vector is compared against the negative and positive exemplar
//! embeddings; the similarity gap is divided by a calibration constant and
//! clamped above at 1.0.

use serde::Serialize;

use crate::cache::ReferenceEmbeddings;
use crate::error::SentimentError;

/// Calibration divisor for the raw similarity gap, from the observed
/// similarity bounds 0.83/0.73 of the exemplar pair. Empirically tuned
/// against that pair, not derived from anything principled.
pub const SCORE_CALIBRATION: f64 = 0.83 - 0.73;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Positive,
}

/// Per-request scoring result, serialized verbatim as the response body.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    /// `score_raw / SCORE_CALIBRATION`, clamped above at 1.0. No lower clamp.
    pub score_normalized: f64,
    /// `score_positive - score_negative`, unbounded.
    pub score_raw: f64,
    pub score_positive: f64,
    pub score_negative: f64,
    pub label: SentimentLabel,
}

/// Cosine similarity of two vectors, in `[-1, 1]`.
///
/// Upstream dimension normalization guarantees equal lengths; the dot product
/// runs over the shorter zip either way.
///
/// # Errors
///
/// Returns [`SentimentError::ZeroMagnitude`] if either vector has zero norm,
/// rather than letting a NaN escape.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SentimentError> {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a = norm(a);
    let norm_b = norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(SentimentError::ZeroMagnitude);
    }

    Ok(dot / (norm_a * norm_b))
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt()
}

/// Score an input vector against the exemplar pair.
///
/// # Errors
///
/// Returns [`SentimentError::ZeroMagnitude`] if the input or either exemplar
/// vector has zero norm.
pub fn score(vector: &[f32], refs: &ReferenceEmbeddings) -> Result<ScoreResult, SentimentError> {
    let score_positive = cosine_similarity(vector, &refs.positive)?;
    let score_negative = cosine_similarity(vector, &refs.negative)?;

    let score_raw = score_positive - score_negative;
    let score_normalized = (score_raw / SCORE_CALIBRATION).min(1.0);
    let label = if score_raw < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Positive
    };

    Ok(ScoreResult {
        score_normalized,
        score_raw,
        score_positive,
        score_negative,
        label,
    })
}
