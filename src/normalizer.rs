//! Display normalization
//!
//! This module converts trait sums into 0-100 display scores.
//! - Sums rescaled linearly to a 0-100 raw mean
//! - Raw means converted to z-scores around a fixed center
//! - Contrast boost applied when the five z-scores cluster tightly
//!
//! Display scores are always recomputed from the stored sums and never persisted.

use crate::scoring::scale_to_percentage;
use crate::types::{Trait, TraitDisplay, TraitDisplays, TraitSums};

/// Multiplier applied to each z-score's distance from the profile mean
pub const BOOST_FACTOR: f64 = 1.3;

/// Boost applies when max(z) - min(z) is strictly below this value
pub const RANGE_THRESHOLD: f64 = 1.0;

/// Display points per unit of (boosted) z-score
pub const DISPLAY_SCALE: f64 = 12.0;

/// Display score of a zero z-score
pub const DISPLAY_CENTER: f64 = 50.0;

/// Raw mean treated as z = 0
pub const Z_CENTER: f64 = 50.0;

/// Raw-mean points per unit of z-score
pub const Z_SPREAD: f64 = 10.0;

pub const RAW_MEAN_DECIMALS: i32 = 2;
pub const Z_DECIMALS: i32 = 4;

/// Normalizer for converting trait sums to display records
pub struct DisplayNormalizer;

impl DisplayNormalizer {
    /// One display record per trait, in canonical `[O, C, E, A, N]` order
    pub fn normalize(trait_sums: &TraitSums) -> TraitDisplays {
        let raw_means = trait_sums.map(|_, total| scale_to_percentage(*total));
        let z_scores = raw_means.map(|_, raw_mean| z_score(*raw_mean));

        let n = Trait::ALL.len() as f64;
        let mean_z = z_scores.values().sum::<f64>() / n;
        let max_z = z_scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_z = z_scores.values().copied().fold(f64::INFINITY, f64::min);
        let boosted = max_z - min_z < RANGE_THRESHOLD;

        if boosted {
            tracing::debug!(range_z = max_z - min_z, mean_z, "trait profile is flat, applying contrast boost");
        }

        Trait::ALL.map(|t| {
            let z = z_scores[t];
            let z_boosted = if boosted { boost(z, mean_z) } else { z };
            TraitDisplay {
                trait_: t,
                label: t.label().to_string(),
                sum_score: trait_sums[t],
                raw_mean: round_to(raw_means[t], RAW_MEAN_DECIMALS),
                z_score: round_to(z, Z_DECIMALS),
                z_boosted: round_to(z_boosted, Z_DECIMALS),
                display_score: display_score(z_boosted),
            }
        })
    }
}

/// Display metrics for each Big Five trait
pub fn compute_trait_displays(trait_sums: &TraitSums) -> TraitDisplays {
    DisplayNormalizer::normalize(trait_sums)
}

fn z_score(raw_mean: f64) -> f64 {
    (raw_mean - Z_CENTER) / Z_SPREAD
}

/// Stretch a z-score away from the profile mean; ordering is preserved
fn boost(z: f64, mean_z: f64) -> f64 {
    (z - mean_z) * BOOST_FACTOR + mean_z
}

fn display_score(z_boosted: f64) -> u32 {
    (DISPLAY_CENTER + z_boosted * DISPLAY_SCALE)
        .clamp(0.0, 100.0)
        .round_ties_even() as u32
}

/// Round half to even at the given number of decimals
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
