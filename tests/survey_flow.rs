use big5_survey::error::ScoringError;
use big5_survey::types::Level;
use big5_survey::{
    compute_highlights, compute_trait_displays, create_survey_result, purge_old_results,
    MemoryResultStore, PayloadOptions, ResponseSet, ResponseValue, ResultStore, RetentionPolicy,
    ItemCatalog, SurveyError, SurveyProcessor, Trait, TraitSums,
};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

/// Ten items per trait, every second item reversed, as a JSON array
fn catalog_json() -> String {
    let mut items = Vec::new();
    for t in Trait::ALL {
        for index in 1..=10 {
            items.push(serde_json::json!({
                "code": format!("{}{}", t.code(), index),
                "text": format!("Statement {} for {}", index, t.label()),
                "trait": t.code(),
                "is_reversed": index % 2 == 0,
                "order": items.len() + 1,
            }));
        }
    }
    serde_json::to_string(&items).unwrap()
}

fn catalog() -> ItemCatalog {
    ItemCatalog::from_json(&catalog_json()).unwrap()
}

fn uniform(catalog: &ItemCatalog, answer: i64) -> ResponseSet {
    catalog
        .items()
        .iter()
        .map(|item| (item.code.clone(), ResponseValue::Integer(answer)))
        .collect()
}

#[test]
fn catalog_loads_fifty_items() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 50);
    for t in Trait::ALL {
        assert_eq!(catalog.trait_counts()[t], 10);
    }
}

#[test]
fn all_fours_give_neutral_profile() {
    let processor = SurveyProcessor::new(catalog(), MemoryResultStore::new());
    let payload = processor.score(&uniform(processor.catalog(), 4), "").unwrap();

    for row in &payload.trait_scores {
        assert_eq!(row.sum, 30);
        assert_eq!(row.raw_mean, 50.0);
        assert_eq!(row.z_boosted, 0.0);
        assert_eq!(row.display_score, 50);
        assert_eq!(row.level, Level::Neutral);
    }
    assert_eq!(payload.highlights.signature_strength.trait_, Trait::Openness);
    assert_eq!(payload.highlights.signature_caution.trait_, Trait::Openness);
    assert!(payload.highlights.strong_candidates.is_empty());
    assert!(payload.highlights.weak_candidates.is_empty());
}

#[test]
fn flat_profile_is_boosted() {
    let displays = compute_trait_displays(&TraitSums::new([32, 31, 30, 29, 29]));
    let scores: Vec<u32> = displays.iter().map(|d| d.display_score).collect();
    assert_eq!(scores, vec![58, 54, 50, 46, 46]);
    assert!((displays[0].z_boosted - 0.635).abs() < 1e-9);

    let highlights = compute_highlights(&displays);
    assert_eq!(highlights.signature_strength.trait_, Trait::Openness);
    assert_eq!(highlights.signature_caution.trait_, Trait::Agreeableness);
}

#[test]
fn spread_profile_is_not_boosted() {
    let displays = compute_trait_displays(&TraitSums::new([50, 45, 40, 35, 30]));
    let scores: Vec<u32> = displays.iter().map(|d| d.display_score).collect();
    assert_eq!(scores, vec![100, 95, 80, 65, 50]);

    let highlights = compute_highlights(&displays);
    let strong: Vec<Trait> = highlights
        .strong_candidates
        .iter()
        .map(|card| card.trait_)
        .collect();
    assert_eq!(strong, vec![Trait::Conscientiousness, Trait::Extraversion]);
    assert!(highlights.weak_candidates.is_empty());
}

#[test]
fn missing_answer_writes_nothing() {
    let catalog = catalog();
    let store = MemoryResultStore::new();
    let mut responses = uniform(&catalog, 3);
    responses.remove("E7");

    let err = create_survey_result(catalog.items(), &responses, "", &store).unwrap_err();
    assert!(matches!(
        err,
        SurveyError::Scoring(ScoringError::MissingResponse { ref code }) if code == "E7"
    ));
    assert!(store.is_empty());
}

#[test]
fn out_of_range_answer_is_rejected() {
    let processor = SurveyProcessor::new(catalog(), MemoryResultStore::new());
    let mut responses = uniform(processor.catalog(), 3);
    responses.insert("N3".to_string(), ResponseValue::Integer(6));

    let err = processor.score(&responses, "").unwrap_err();
    assert!(matches!(
        err,
        SurveyError::Scoring(ScoringError::OutOfRange { ref code, value: 6 }) if code == "N3"
    ));
    assert!(processor.store().is_empty());
}

#[test]
fn payload_json_shape() {
    let processor = SurveyProcessor::with_options(
        catalog(),
        MemoryResultStore::new(),
        PayloadOptions {
            include_raw_scores: true,
        },
    );
    let payload = processor.score(&uniform(processor.catalog(), 5), "memo").unwrap();
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["trait_scores"][0]["trait"], "O");
    assert_eq!(json["trait_scores"][0]["sum"], 30);
    assert_eq!(json["raw_range"], serde_json::json!({"min": 10, "max": 50}));
    assert_eq!(json["scaled_range"], serde_json::json!({"min": 0, "max": 100}));
    assert_eq!(json["highlights"]["contrast_summary_locked"], true);
    assert_eq!(json["raw_scores"]["O2"], 5);

    let stored = processor.store().get(payload.id).unwrap();
    assert_eq!(stored.memo, "memo");
    assert_eq!(processor.result(payload.id).unwrap(), payload);
}

#[test]
fn purge_applies_retention_policy() {
    let catalog = catalog();
    let store = MemoryResultStore::new();
    let result = create_survey_result(catalog.items(), &uniform(&catalog, 2), "", &store).unwrap();

    let policy = RetentionPolicy {
        retention_days: 30,
        scrub_raw_after_days: 7,
    };

    let report = purge_old_results(&store, &policy, Utc::now() + Duration::days(10));
    assert_eq!((report.scrubbed, report.deleted), (1, 0));
    assert!(store.get(result.id).unwrap().is_scrubbed());
    assert_eq!(store.get(result.id).unwrap().sums, result.sums);

    let report = purge_old_results(&store, &policy, Utc::now() + Duration::days(31));
    assert_eq!((report.scrubbed, report.deleted), (0, 1));
    assert!(store.all().is_empty());
}
