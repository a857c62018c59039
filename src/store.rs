//! Survey result persistence
//!
//! A result is written once per submission and later only touched by the
//! retention purge, which scrubs raw answers and deletes expired records.
//! Only the trait sums, their linear 0-100 rescale and the raw answers are
//! stored; display scores are always recomputed at read time.

use crate::config::RetentionPolicy;
use crate::error::SurveyError;
use crate::scoring::{ComputedScores, RawScores};
use crate::types::{TraitScaled, TraitSums};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum memo length in characters
pub const MEMO_MAX_CHARS: usize = 50;

/// Stored scores for a single survey submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResult {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Free-text note attached by an operator
    #[serde(default)]
    pub memo: String,
    /// Original 1-5 answers keyed by item code; emptied by the scrub step
    pub raw_scores: RawScores,
    pub sums: TraitSums,
    pub scaled: TraitScaled,
}

impl SurveyResult {
    /// Build a new record with a fresh id.
    ///
    /// Fails when the trimmed memo is longer than [`MEMO_MAX_CHARS`].
    pub fn from_scores(
        computed: ComputedScores,
        memo: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SurveyError> {
        Ok(Self {
            id: Uuid::new_v4(),
            created_at,
            memo: validate_memo(memo)?,
            raw_scores: computed.raw_scores,
            sums: computed.trait_sums,
            scaled: computed.scaled_scores,
        })
    }

    pub fn trait_sum_map(&self) -> &TraitSums {
        &self.sums
    }

    pub fn trait_scaled_map(&self) -> &TraitScaled {
        &self.scaled
    }

    pub fn is_scrubbed(&self) -> bool {
        self.raw_scores.is_empty()
    }
}

/// Trim surrounding whitespace and enforce the memo length limit
pub fn validate_memo(memo: &str) -> Result<String, SurveyError> {
    let memo = memo.trim();
    let length = memo.chars().count();
    if length > MEMO_MAX_CHARS {
        return Err(SurveyError::MemoTooLong {
            length,
            max: MEMO_MAX_CHARS,
        });
    }
    Ok(memo.to_string())
}

/// Durable record of completed submissions
pub trait ResultStore: Send + Sync {
    /// Insert a new result; each result is created exactly once
    fn insert(&self, result: SurveyResult) -> Result<(), SurveyError>;

    fn get(&self, id: Uuid) -> Result<SurveyResult, SurveyError>;

    /// All results, newest first
    fn all(&self) -> Vec<SurveyResult>;

    /// Empty the raw answers of results created before `cutoff`.
    ///
    /// Returns the number of results that still had answers.
    fn scrub_raw_before(&self, cutoff: DateTime<Utc>) -> usize;

    /// Delete results created before `cutoff`, returning how many were removed
    fn delete_before(&self, cutoff: DateTime<Utc>) -> usize;
}

/// In-memory store with JSON snapshot support
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    results: RwLock<Vec<SurveyResult>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.read().is_empty()
    }

    /// Load store from a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, SurveyError> {
        let results: Vec<SurveyResult> = serde_json::from_str(json)?;
        Ok(Self {
            results: RwLock::new(results),
        })
    }

    /// Serialize store to a JSON snapshot
    pub fn to_json(&self) -> Result<String, SurveyError> {
        Ok(serde_json::to_string_pretty(&*self.results.read())?)
    }
}

impl ResultStore for MemoryResultStore {
    fn insert(&self, result: SurveyResult) -> Result<(), SurveyError> {
        let mut results = self.results.write();
        if results.iter().any(|r| r.id == result.id) {
            return Err(SurveyError::DuplicateResult(result.id));
        }
        results.push(result);
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<SurveyResult, SurveyError> {
        self.results
            .read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(SurveyError::NotFound(id))
    }

    fn all(&self) -> Vec<SurveyResult> {
        let mut results = self.results.read().clone();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        results
    }

    fn scrub_raw_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut scrubbed = 0;
        for result in self.results.write().iter_mut() {
            if result.created_at < cutoff && !result.raw_scores.is_empty() {
                result.raw_scores.clear();
                scrubbed += 1;
            }
        }
        scrubbed
    }

    fn delete_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut results = self.results.write();
        let before = results.len();
        results.retain(|r| r.created_at >= cutoff);
        before - results.len()
    }
}

/// Outcome of a retention purge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeReport {
    pub scrubbed: usize,
    pub deleted: usize,
    pub scrub_days: u32,
    pub retention_days: u32,
}

/// Scrub raw answers and delete results according to the retention policy.
///
/// Scrubbing runs before deletion. A step whose day count is zero is skipped.
pub fn purge_old_results(
    store: &dyn ResultStore,
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
) -> PurgeReport {
    let scrub_days = policy.scrub_raw_after_days;
    let retention_days = policy.retention_days;

    let scrubbed = if scrub_days > 0 {
        store.scrub_raw_before(now - Duration::days(i64::from(scrub_days)))
    } else {
        0
    };

    let deleted = if retention_days > 0 {
        store.delete_before(now - Duration::days(i64::from(retention_days)))
    } else {
        0
    };

    tracing::info!(scrubbed, deleted, scrub_days, retention_days, "purged survey results");

    PurgeReport {
        scrubbed,
        deleted,
        scrub_days,
        retention_days,
    }
}
