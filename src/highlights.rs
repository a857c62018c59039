//! Highlight selection
//!
//! Picks the signature strength and caution traits plus up to two secondary
//! candidates on each side from the computed display records.

use crate::types::{HighlightCard, Highlights, TraitDisplay, TraitDisplays};
use std::cmp::Ordering;

/// Display score at or above which a trait is a strong candidate
pub const STRONG_THRESHOLD: u32 = 60;

/// Display score at or below which a trait is a weak candidate
pub const WEAK_THRESHOLD: u32 = 40;

/// Maximum number of secondary candidates per side
pub const MAX_CANDIDATES: usize = 2;

/// Select highlight cards from computed trait displays
pub fn compute_highlights(displays: &TraitDisplays) -> Highlights {
    let strength = select_extreme(displays, Ordering::Greater);
    let caution = select_extreme(displays, Ordering::Less);

    let mut strong: Vec<&TraitDisplay> = displays
        .iter()
        .filter(|d| d.trait_ != strength.trait_ && d.display_score >= STRONG_THRESHOLD)
        .collect();
    strong.sort_by(|a, b| b.display_score.cmp(&a.display_score));

    let mut weak: Vec<&TraitDisplay> = displays
        .iter()
        .filter(|d| d.trait_ != caution.trait_ && d.display_score <= WEAK_THRESHOLD)
        .collect();
    weak.sort_by_key(|d| d.display_score);

    Highlights {
        signature_strength: strength.to_card(),
        signature_caution: caution.to_card(),
        strong_candidates: to_cards(strong),
        weak_candidates: to_cards(weak),
        contrast_summary_locked: true,
    }
}

/// Ranking tuple `(display_score, z_boosted, raw_mean)`
fn rank(a: &TraitDisplay, b: &TraitDisplay) -> Ordering {
    a.display_score
        .cmp(&b.display_score)
        .then_with(|| a.z_boosted.total_cmp(&b.z_boosted))
        .then_with(|| a.raw_mean.total_cmp(&b.raw_mean))
}

/// First display that ranks strictly beyond every earlier one in `direction`.
///
/// Ties resolve to the earliest trait in canonical order.
fn select_extreme(displays: &TraitDisplays, direction: Ordering) -> &TraitDisplay {
    displays[1..].iter().fold(&displays[0], |best, candidate| {
        if rank(candidate, best) == direction {
            candidate
        } else {
            best
        }
    })
}

fn to_cards(displays: Vec<&TraitDisplay>) -> Vec<HighlightCard> {
    displays
        .into_iter()
        .take(MAX_CANDIDATES)
        .map(TraitDisplay::to_card)
        .collect()
}
