//! Big5 Survey - Scoring and display-normalization engine for a Big Five questionnaire
//!
//! Submitted Likert answers flow through a deterministic pipeline:
//! scoring → display normalization → highlight selection → payload encoding.
//!
//! ## Modules
//!
//! - **Scoring**: Per-trait sums with item reversal, linear 0-100 rescale for storage
//! - **Display**: Z-score normalization with a contrast boost for flat profiles
//! - **Highlights**: Signature strength/caution traits and secondary candidates
//! - **Store**: Result records with retention and raw-answer scrubbing

pub mod catalog;
pub mod config;
pub mod encoder;
pub mod error;
pub mod highlights;
pub mod normalizer;
pub mod pipeline;
pub mod scoring;
pub mod store;
pub mod types;

pub use catalog::{Item, ItemCatalog, ItemView};
pub use config::{PayloadOptions, RetentionPolicy, SurveyConfig};
pub use error::{ScoringError, SurveyError};
pub use highlights::compute_highlights;
pub use normalizer::compute_trait_displays;
pub use pipeline::{create_survey_result, SurveyProcessor};
pub use scoring::{compute_trait_scores, scale_score, validate_responses, ComputedScores, ResponseSet, ResponseValue};
pub use store::{purge_old_results, MemoryResultStore, PurgeReport, ResultStore, SurveyResult};
pub use types::{Highlights, ResultPayload, Trait, TraitDisplay, TraitSums};

/// Engine version embedded in CLI reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
