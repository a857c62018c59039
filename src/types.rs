//! Core types for the survey engine
//!
//! This module defines the data structures that flow through each stage of the
//! engine: per-trait maps, display records, and highlight cards.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use uuid::Uuid;

/// Big Five personality dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Trait {
    #[serde(rename = "O")]
    Openness,
    #[serde(rename = "C")]
    Conscientiousness,
    #[serde(rename = "E")]
    Extraversion,
    #[serde(rename = "A")]
    Agreeableness,
    #[serde(rename = "N")]
    Neuroticism,
}

impl Trait {
    /// Canonical presentation order
    pub const ALL: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    /// Single-letter code
    pub fn code(&self) -> &'static str {
        match self {
            Trait::Openness => "O",
            Trait::Conscientiousness => "C",
            Trait::Extraversion => "E",
            Trait::Agreeableness => "A",
            Trait::Neuroticism => "N",
        }
    }

    /// Product label shown next to the trait
    pub fn label(&self) -> &'static str {
        match self {
            Trait::Openness => "開放性 (Openness)",
            Trait::Conscientiousness => "誠実性 (Conscientiousness)",
            Trait::Extraversion => "外向性 (Extraversion)",
            Trait::Agreeableness => "協調性 (Agreeableness)",
            Trait::Neuroticism => "神経症傾向 (Neuroticism)",
        }
    }

    pub fn from_code(code: &str) -> Option<Trait> {
        match code {
            "O" => Some(Trait::Openness),
            "C" => Some(Trait::Conscientiousness),
            "E" => Some(Trait::Extraversion),
            "A" => Some(Trait::Agreeableness),
            "N" => Some(Trait::Neuroticism),
            _ => None,
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A value for each of the five traits.
///
/// Always holds exactly five entries. Serializes as a JSON object keyed by
/// trait code in canonical order; deserialization rejects missing traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraitMap<T> {
    values: [T; 5],
}

impl<T> TraitMap<T> {
    /// Build from values given in canonical `[O, C, E, A, N]` order
    pub fn new(values: [T; 5]) -> Self {
        Self { values }
    }

    pub fn from_fn(mut f: impl FnMut(Trait) -> T) -> Self {
        Self {
            values: Trait::ALL.map(&mut f),
        }
    }

    /// Iterate `(trait, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Trait, &T)> {
        Trait::ALL.into_iter().zip(self.values.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(Trait, &T) -> U) -> TraitMap<U> {
        TraitMap::from_fn(|t| f(t, &self.values[t.position()]))
    }
}

impl<T> Index<Trait> for TraitMap<T> {
    type Output = T;

    fn index(&self, t: Trait) -> &T {
        &self.values[t.position()]
    }
}

impl<T> IndexMut<Trait> for TraitMap<T> {
    fn index_mut(&mut self, t: Trait) -> &mut T {
        &mut self.values[t.position()]
    }
}

impl<T: Serialize> Serialize for TraitMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TraitMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = BTreeMap::<Trait, T>::deserialize(deserializer)?;
        let mut take = |t: Trait| {
            map.remove(&t)
                .ok_or_else(|| <D::Error as de::Error>::custom(format!("missing value for trait {}", t)))
        };
        Ok(TraitMap::new([
            take(Trait::Openness)?,
            take(Trait::Conscientiousness)?,
            take(Trait::Extraversion)?,
            take(Trait::Agreeableness)?,
            take(Trait::Neuroticism)?,
        ]))
    }
}

/// Per-trait sum of adjusted answers (10-50 for a 10-item trait)
pub type TraitSums = TraitMap<u32>;

/// Per-trait linear rescale of the sums onto 0-100
pub type TraitScaled = TraitMap<u32>;

/// Qualitative band derived from a display score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Strong,
    Neutral,
    Weak,
}

/// Display metrics for a single trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitDisplay {
    #[serde(rename = "trait")]
    pub trait_: Trait,
    pub label: String,
    pub sum_score: u32,
    /// Linear 0-100 rescale of the sum (2 decimals)
    pub raw_mean: f64,
    /// 4 decimals
    pub z_score: f64,
    /// 4 decimals
    pub z_boosted: f64,
    /// Boost-adjusted presentation score (0-100)
    pub display_score: u32,
}

impl TraitDisplay {
    pub fn level(&self) -> Level {
        if self.display_score >= 60 {
            Level::Strong
        } else if self.display_score <= 40 {
            Level::Weak
        } else {
            Level::Neutral
        }
    }

    pub fn to_card(&self) -> HighlightCard {
        HighlightCard {
            trait_: self.trait_,
            label: self.label.clone(),
            display_score: self.display_score,
        }
    }
}

/// Display records for all five traits in canonical order
pub type TraitDisplays = [TraitDisplay; 5];

/// Projection of a trait display used on highlight cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightCard {
    #[serde(rename = "trait")]
    pub trait_: Trait,
    pub label: String,
    pub display_score: u32,
}

/// Signature traits and secondary candidates selected from the displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    pub signature_strength: HighlightCard,
    pub signature_caution: HighlightCard,
    pub strong_candidates: Vec<HighlightCard>,
    pub weak_candidates: Vec<HighlightCard>,
    /// Fixed product flag gating the contrast summary feature
    pub contrast_summary_locked: bool,
}

/// Inclusive bounds reported alongside the scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: u32,
    pub max: u32,
}

/// One trait row of the API payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitScoreRow {
    #[serde(rename = "trait")]
    pub trait_: Trait,
    pub label: String,
    pub sum: u32,
    /// Mirrors `display_score`
    pub scaled: u32,
    pub raw_mean: f64,
    pub z: f64,
    pub z_boosted: f64,
    pub display_score: u32,
    pub level: Level,
}

impl From<&TraitDisplay> for TraitScoreRow {
    fn from(display: &TraitDisplay) -> Self {
        Self {
            trait_: display.trait_,
            label: display.label.clone(),
            sum: display.sum_score,
            scaled: display.display_score,
            raw_mean: display.raw_mean,
            z: display.z_score,
            z_boosted: display.z_boosted,
            display_score: display.display_score,
            level: display.level(),
        }
    }
}

/// Complete result payload shared by the score and detail endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub trait_scores: Vec<TraitScoreRow>,
    pub raw_range: ScoreRange,
    pub scaled_range: ScoreRange,
    pub highlights: Highlights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_scores: Option<BTreeMap<String, u32>>,
}
