//! Pipeline orchestration
//!
//! This module provides the public API for the survey engine.
//! It orchestrates scoring, persistence and payload encoding.

use crate::catalog::{Item, ItemCatalog, ItemView};
use crate::config::{PayloadOptions, RetentionPolicy};
use crate::encoder::ResultEncoder;
use crate::error::SurveyError;
use crate::scoring::{compute_trait_scores, validate_responses, ComputedScores, ResponseSet};
use crate::store::{purge_old_results, PurgeReport, ResultStore, SurveyResult};
use crate::types::ResultPayload;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Score a submission and hand the record to the store.
///
/// Nothing is written unless scoring succeeds.
pub fn create_survey_result(
    items: &[Item],
    responses: &ResponseSet,
    memo: &str,
    store: &dyn ResultStore,
) -> Result<SurveyResult, SurveyError> {
    let computed = compute_trait_scores(items, responses)?;
    persist(computed, memo, store)
}

fn persist(
    computed: ComputedScores,
    memo: &str,
    store: &dyn ResultStore,
) -> Result<SurveyResult, SurveyError> {
    let result = SurveyResult::from_scores(computed, memo, Utc::now())?;
    store.insert(result.clone())?;
    tracing::info!(id = %result.id, "created survey result");
    Ok(result)
}

/// Stateful processor binding a catalog to a result store.
///
/// All scoring work is pure; the store is the only shared state.
pub struct SurveyProcessor<S: ResultStore> {
    catalog: ItemCatalog,
    store: S,
    encoder: ResultEncoder,
}

impl<S: ResultStore> SurveyProcessor<S> {
    pub fn new(catalog: ItemCatalog, store: S) -> Self {
        Self {
            catalog,
            store,
            encoder: ResultEncoder::new(),
        }
    }

    pub fn with_options(catalog: ItemCatalog, store: S, options: PayloadOptions) -> Self {
        Self {
            catalog,
            store,
            encoder: ResultEncoder::with_options(options),
        }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Questionnaire items in presentation order
    pub fn items(&self) -> Vec<ItemView> {
        self.catalog.items().iter().map(ItemView::from).collect()
    }

    /// Validate, score and persist a submission, returning its payload
    pub fn score(&self, responses: &ResponseSet, memo: &str) -> Result<ResultPayload, SurveyError> {
        let computed = validate_responses(self.catalog.items(), responses)?;
        let result = persist(computed, memo, &self.store)?;
        Ok(self.encoder.encode(&result))
    }

    /// Payload for a previously stored result
    pub fn result(&self, id: Uuid) -> Result<ResultPayload, SurveyError> {
        let result = self.store.get(id)?;
        Ok(self.encoder.encode(&result))
    }

    pub fn purge(&self, policy: &RetentionPolicy, now: DateTime<Utc>) -> PurgeReport {
        purge_old_results(&self.store, policy, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;
    use crate::scoring::ResponseValue;
    use crate::store::MemoryResultStore;
    use crate::types::Trait;

    fn make_catalog() -> ItemCatalog {
        let mut items = Vec::new();
        for t in Trait::ALL {
            for index in 1..=10 {
                let order = items.len() as u32 + 1;
                items.push(
                    Item::new(format!("{}{}", t.code(), index), t, index % 2 == 0, order)
                        .with_text(format!("{} item {}", t.code(), index)),
                );
            }
        }
        ItemCatalog::new(items).unwrap()
    }

    fn uniform_responses(catalog: &ItemCatalog, answer: i64) -> ResponseSet {
        catalog
            .items()
            .iter()
            .map(|item| (item.code.clone(), ResponseValue::Integer(answer)))
            .collect()
    }

    #[test]
    fn test_create_survey_result_persists_sums_and_scaled() {
        let catalog = make_catalog();
        let store = MemoryResultStore::new();
        let result = create_survey_result(
            catalog.items(),
            &uniform_responses(&catalog, 4),
            "trial run",
            &store,
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(result.memo, "trial run");
        for t in Trait::ALL {
            assert_eq!(result.sums[t], 30);
            assert_eq!(result.scaled[t], 50);
        }
        assert_eq!(store.get(result.id).unwrap(), result);
    }

    #[test]
    fn test_failed_scoring_writes_nothing() {
        let catalog = make_catalog();
        let store = MemoryResultStore::new();
        let mut responses = uniform_responses(&catalog, 4);
        responses.remove("C5");

        let err = create_survey_result(catalog.items(), &responses, "", &store).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::Scoring(ScoringError::MissingResponse { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_processor_score_and_fetch() {
        let processor = SurveyProcessor::new(make_catalog(), MemoryResultStore::new());
        let payload = processor
            .score(&uniform_responses(processor.catalog(), 4), "")
            .unwrap();

        assert_eq!(payload.trait_scores.len(), 5);
        assert!(payload.highlights.contrast_summary_locked);

        let fetched = processor.result(payload.id).unwrap();
        assert_eq!(fetched, payload);
    }

    #[test]
    fn test_processor_boosts_flat_profile() {
        let processor = SurveyProcessor::new(make_catalog(), MemoryResultStore::new());
        let mut responses = uniform_responses(processor.catalog(), 4);
        let overrides: ResponseSet = serde_json::from_str(
            r#"{"O1": "5", "O2": 3, "C1": 5, "A1": " 3 ", "N1": 3}"#,
        )
        .unwrap();
        responses.extend(overrides);

        let payload = processor.score(&responses, "").unwrap();
        let sums: Vec<u32> = payload.trait_scores.iter().map(|row| row.sum).collect();
        let scores: Vec<u32> = payload
            .trait_scores
            .iter()
            .map(|row| row.display_score)
            .collect();

        assert_eq!(sums, vec![32, 31, 30, 29, 29]);
        assert_eq!(scores, vec![58, 54, 50, 46, 46]);
        assert_eq!(payload.highlights.signature_strength.trait_, Trait::Openness);
        assert_eq!(payload.highlights.signature_caution.trait_, Trait::Agreeableness);

        let stored = processor.store().get(payload.id).unwrap();
        assert_eq!(stored.raw_scores.get("O1"), Some(&5));
        assert_eq!(stored.raw_scores.get("O2"), Some(&3));
    }

    #[test]
    fn test_long_memo_writes_nothing() {
        let processor = SurveyProcessor::new(make_catalog(), MemoryResultStore::new());
        let memo = "m".repeat(51);
        let err = processor
            .score(&uniform_responses(processor.catalog(), 4), &memo)
            .unwrap_err();
        assert!(matches!(err, SurveyError::MemoTooLong { length: 51, .. }));
        assert!(processor.store().is_empty());
    }

    #[test]
    fn test_processor_surfaces_empty_catalog() {
        let processor = SurveyProcessor::new(ItemCatalog::default(), MemoryResultStore::new());
        let err = processor.score(&ResponseSet::new(), "").unwrap_err();
        assert!(matches!(err, SurveyError::Scoring(ScoringError::EmptyCatalog)));
    }

    #[test]
    fn test_processor_rejects_unknown_codes() {
        let processor = SurveyProcessor::new(make_catalog(), MemoryResultStore::new());
        let mut responses = uniform_responses(processor.catalog(), 3);
        responses.insert("X1".to_string(), ResponseValue::Integer(3));

        let err = processor.score(&responses, "").unwrap_err();
        assert!(matches!(
            err,
            SurveyError::Scoring(ScoringError::UnknownCodes { .. })
        ));
        assert!(processor.store().is_empty());
    }

    #[test]
    fn test_processor_unknown_result() {
        let processor = SurveyProcessor::new(make_catalog(), MemoryResultStore::new());
        let id = Uuid::new_v4();
        assert!(matches!(processor.result(id), Err(SurveyError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn test_processor_items_in_order() {
        let processor = SurveyProcessor::new(make_catalog(), MemoryResultStore::new());
        let items = processor.items();
        assert_eq!(items.len(), 50);
        assert_eq!(items[0].code, "O1");
        assert_eq!(items[49].code, "N10");
        assert_eq!(items[0].text, "O item 1");
    }
}
