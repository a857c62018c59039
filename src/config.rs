//! Runtime configuration
//!
//! Settings are read from an optional TOML file and then overridden by
//! environment variables. Normalization constants are fixed product decisions
//! and live in [`crate::normalizer`], not here.

use crate::error::SurveyError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const ENV_RETENTION_DAYS: &str = "SURVEY_RESULT_RETENTION_DAYS";
pub const ENV_SCRUB_RAW_AFTER_DAYS: &str = "SURVEY_RESULT_SCRUB_RAW_AFTER_DAYS";
pub const ENV_INCLUDE_RAW_SCORES: &str = "SURVEY_INCLUDE_RAW_SCORES";

/// How long results and their raw answers are kept.
///
/// A value of zero disables the corresponding step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    pub retention_days: u32,
    pub scrub_raw_after_days: u32,
}

/// Shape of the result payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadOptions {
    /// Echo the per-item answers back in the payload
    pub include_raw_scores: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub retention: RetentionPolicy,
    pub payload: PayloadOptions,
}

impl SurveyConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, SurveyError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, SurveyError> {
        let mut config = match path {
            Some(path) => {
                let contents = fs::read_to_string(path)?;
                tracing::debug!(path = %path.display(), "loaded survey config");
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from a key lookup (normally the process environment)
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SurveyError> {
        if let Some(value) = lookup(ENV_RETENTION_DAYS) {
            self.retention.retention_days = parse_days(ENV_RETENTION_DAYS, &value)?;
        }
        if let Some(value) = lookup(ENV_SCRUB_RAW_AFTER_DAYS) {
            self.retention.scrub_raw_after_days = parse_days(ENV_SCRUB_RAW_AFTER_DAYS, &value)?;
        }
        if let Some(value) = lookup(ENV_INCLUDE_RAW_SCORES) {
            self.payload.include_raw_scores = parse_flag(ENV_INCLUDE_RAW_SCORES, &value)?;
        }
        Ok(())
    }
}

fn parse_days(key: &str, value: &str) -> Result<u32, SurveyError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    // Negative day counts disable the step
    match value.parse::<i64>() {
        Ok(days) => Ok(days.clamp(0, i64::from(u32::MAX)) as u32),
        Err(_) => Err(SurveyError::InvalidConfig(format!(
            "{key} must be an integer, got {value:?}"
        ))),
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, SurveyError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SurveyError::InvalidConfig(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}
