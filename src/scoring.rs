//! Trait scoring
//!
//! Converts raw Likert answers into per-trait sums, applying item reversal,
//! and rescales the sums linearly onto 0-100.

use crate::catalog::Item;
use crate::error::ScoringError;
use crate::types::{TraitScaled, TraitSums};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Lowest accepted Likert answer
pub const MIN_ANSWER: i64 = 1;

/// Highest accepted Likert answer
pub const MAX_ANSWER: i64 = 5;

/// Lowest possible trait sum for a 10-item trait
pub const MIN_SCORE: u32 = 10;

/// Highest possible trait sum for a 10-item trait
pub const MAX_SCORE: u32 = 50;

/// A submitted answer as it arrived on the wire.
///
/// Anything that is neither an integer nor a string lands in `Other` so the
/// failure is reported per item by [`compute_trait_scores`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Integer(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<i64> for ResponseValue {
    fn from(value: i64) -> Self {
        ResponseValue::Integer(value)
    }
}

impl From<&str> for ResponseValue {
    fn from(value: &str) -> Self {
        ResponseValue::Text(value.to_string())
    }
}

/// Item code to submitted answer
pub type ResponseSet = HashMap<String, ResponseValue>;

/// Item code to validated answer, before reversal
pub type RawScores = BTreeMap<String, u32>;

/// Intermediate scoring results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedScores {
    pub raw_scores: RawScores,
    pub trait_sums: TraitSums,
    pub scaled_scores: TraitScaled,
}

/// Linear map of a trait sum from [10, 50] onto [0, 100].
///
/// Rounds half to even and clamps out-of-range sums.
pub fn scale_score(total: u32) -> u32 {
    let scaled = scale_to_percentage(total);
    scaled.clamp(0.0, 100.0).round_ties_even() as u32
}

/// Unrounded, unclamped linear rescale shared with the display normalizer
pub(crate) fn scale_to_percentage(total: u32) -> f64 {
    (total as f64 - MIN_SCORE as f64) / (MAX_SCORE - MIN_SCORE) as f64 * 100.0
}

/// Aggregate trait sums from the provided responses.
///
/// Every item in `items` must have an answer in `responses`. Codes present in
/// `responses` but not in `items` are ignored here; see [`validate_responses`]
/// for the stricter request-level check.
pub fn compute_trait_scores(
    items: &[Item],
    responses: &ResponseSet,
) -> Result<ComputedScores, ScoringError> {
    if items.is_empty() {
        return Err(ScoringError::EmptyCatalog);
    }

    let mut raw_scores = RawScores::new();
    let mut trait_sums = TraitSums::default();

    for item in items {
        let value = responses
            .get(&item.code)
            .ok_or_else(|| ScoringError::MissingResponse {
                code: item.code.clone(),
            })?;
        let answer = coerce_answer(value, &item.code)?;
        raw_scores.insert(item.code.clone(), answer);
        trait_sums[item.trait_] += adjusted_answer(item, answer);
    }

    let scaled_scores = trait_sums.map(|_, total| scale_score(*total));
    Ok(ComputedScores {
        raw_scores,
        trait_sums,
        scaled_scores,
    })
}

/// Request-level validation: all catalog codes present, no unknown codes,
/// and every answer scoreable.
pub fn validate_responses(
    items: &[Item],
    responses: &ResponseSet,
) -> Result<ComputedScores, ScoringError> {
    if items.is_empty() {
        return Err(ScoringError::EmptyCatalog);
    }

    let missing: Vec<String> = items
        .iter()
        .filter(|item| !responses.contains_key(&item.code))
        .map(|item| item.code.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ScoringError::MissingResponses { codes: missing });
    }

    let known: BTreeSet<&str> = items.iter().map(|item| item.code.as_str()).collect();
    let extra: BTreeSet<&str> = responses
        .keys()
        .map(String::as_str)
        .filter(|code| !known.contains(code))
        .collect();
    if !extra.is_empty() {
        return Err(ScoringError::UnknownCodes {
            codes: extra.into_iter().map(str::to_string).collect(),
        });
    }

    compute_trait_scores(items, responses)
}

/// Contribution of one answer to its trait sum
fn adjusted_answer(item: &Item, answer: u32) -> u32 {
    if item.is_reversed {
        6 - answer
    } else {
        answer
    }
}

fn coerce_answer(value: &ResponseValue, code: &str) -> Result<u32, ScoringError> {
    let invalid = || ScoringError::InvalidResponse {
        code: code.to_string(),
    };
    let numeric = match value {
        ResponseValue::Integer(n) => *n,
        ResponseValue::Text(s) => parse_integer_text(s).ok_or_else(invalid)?,
        ResponseValue::Other(serde_json::Value::Number(n)) => {
            integral_float(n.as_f64().ok_or_else(invalid)?).ok_or_else(invalid)?
        }
        ResponseValue::Other(_) => return Err(invalid()),
    };

    if !(MIN_ANSWER..=MAX_ANSWER).contains(&numeric) {
        return Err(ScoringError::OutOfRange {
            code: code.to_string(),
            value: numeric,
        });
    }
    Ok(numeric as u32)
}

/// Parse an integer, accepting a trailing decimal point followed by zeros ("4.0", "4.")
fn parse_integer_text(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = match text.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => text,
    };
    digits.parse().ok()
}

fn integral_float(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= i64::MAX as f64)
        .then(|| value as i64)
}
