//! Result payload encoding
//!
//! This module turns a stored survey result into the JSON payload returned by
//! the score and detail endpoints. Display scores and highlights are
//! recomputed from the stored trait sums on every call.

use crate::config::PayloadOptions;
use crate::error::SurveyError;
use crate::highlights::compute_highlights;
use crate::normalizer::compute_trait_displays;
use crate::scoring::{MAX_SCORE, MIN_SCORE};
use crate::store::SurveyResult;
use crate::types::{ResultPayload, ScoreRange, TraitScoreRow};

/// Range of a 10-item trait sum
pub const RAW_RANGE: ScoreRange = ScoreRange {
    min: MIN_SCORE,
    max: MAX_SCORE,
};

/// Range of scaled and display scores
pub const SCALED_RANGE: ScoreRange = ScoreRange { min: 0, max: 100 };

/// Encoder for producing result payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultEncoder {
    options: PayloadOptions,
}

impl ResultEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PayloadOptions) -> Self {
        Self { options }
    }

    /// Encode a stored result into its API payload
    pub fn encode(&self, result: &SurveyResult) -> ResultPayload {
        let displays = compute_trait_displays(result.trait_sum_map());
        let highlights = compute_highlights(&displays);

        ResultPayload {
            id: result.id,
            created_at: result.created_at,
            trait_scores: displays.iter().map(TraitScoreRow::from).collect(),
            raw_range: RAW_RANGE,
            scaled_range: SCALED_RANGE,
            highlights,
            raw_scores: self
                .options
                .include_raw_scores
                .then(|| result.raw_scores.clone()),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(&self, result: &SurveyResult) -> Result<String, SurveyError> {
        let payload = self.encode(result);
        serde_json::to_string_pretty(&payload).map_err(SurveyError::JsonError)
    }
}
