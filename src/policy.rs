//! policy.rs — From raw scores to a ranked candidate list, plus the
//! auto-confirmation rule. Pure and synchronous, like the scoring engine.

use serde::Serialize;

use crate::catalog::DeckProfile;
use crate::config::Tuning;
use crate::scoring::{ScoreBreakdown, ScoreOutcome};

/// Probability cap for any single candidate; we never claim certainty.
const PROBABILITY_CAP: f32 = 0.99;
/// Raw score that maps to the base-probability ceiling.
const SCORE_SCALE: f32 = 200.0;
const BASE_PROBABILITY_CAP: f32 = 0.9;
/// Meta share tops out at a +0.10 probability adjustment.
const META_ADJUSTMENT_WEIGHT: f32 = 0.1;

/// Discrete trust label for a candidate's probability, gated by both score
/// and sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

/// One ranked candidate. Rebuilt from scratch every observation; candidates
/// from the previous pass are discarded wholesale, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub deck: DeckProfile,
    pub total: f32,
    pub breakdown: ScoreBreakdown,
    pub probability: f32,
    pub confidence: Confidence,
    pub matched_cards: Vec<String>,
    pub reasoning: Vec<String>,
}

/// `min(total/200, 0.9)` plus a small meta-share adjustment, capped at 0.99.
pub fn probability_for(total: f32, meta_share: f32) -> f32 {
    let base = (total / SCORE_SCALE).min(BASE_PROBABILITY_CAP);
    let meta_adjustment = (meta_share / 100.0) * META_ADJUSTMENT_WEIGHT;
    (base + meta_adjustment).min(PROBABILITY_CAP)
}

/// First tier from the top where both the score and the card-count floor
/// hold.
pub fn confidence_for(total: f32, cards_seen: usize) -> Confidence {
    if total >= 150.0 && cards_seen >= 4 {
        Confidence::VeryHigh
    } else if total >= 100.0 && cards_seen >= 3 {
        Confidence::High
    } else if total >= 50.0 && cards_seen >= 2 {
        Confidence::Medium
    } else if total >= 25.0 {
        Confidence::Low
    } else {
        Confidence::VeryLow
    }
}

/// Rank scored decks: drop non-positive totals entirely, keep the top N by
/// raw score, blend each probability with its share of the kept scores,
/// floor the leader, then re-rank by the blended probability (stable, so
/// ties keep their score order).
pub fn rank(
    outcomes: Vec<(DeckProfile, ScoreOutcome)>,
    cards_seen: usize,
    tuning: &Tuning,
) -> Vec<ScoredCandidate> {
    let mut candidates: Vec<ScoredCandidate> = outcomes
        .into_iter()
        .filter(|(_, out)| out.total > 0.0)
        .map(|(deck, out)| {
            let probability = probability_for(out.total, deck.meta_share);
            let confidence = confidence_for(out.total, cards_seen);
            ScoredCandidate {
                deck,
                total: out.total,
                breakdown: out.breakdown,
                probability,
                confidence,
                matched_cards: out.matched_cards,
                reasoning: out.reasoning,
            }
        })
        .collect();

    candidates.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(tuning.max_candidates);

    let score_sum: f32 = candidates.iter().map(|c| c.total).sum();
    if score_sum > 0.0 {
        let w = tuning.blend_model_weight;
        for c in candidates.iter_mut() {
            let share = c.total / score_sum;
            c.probability = (c.probability * w + share * (1.0 - w)).min(PROBABILITY_CAP);
        }
        // The score-ranked leader must always read as plausible.
        if let Some(top) = candidates.first_mut() {
            top.probability = top.probability.max(tuning.leader_probability_floor);
        }
    }

    // The blend can reorder relative to raw score.
    candidates.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

/// All three gates must hold: probability, top confidence tier, evidence.
pub fn should_confirm(top: &ScoredCandidate, cards_seen: usize, tuning: &Tuning) -> bool {
    top.probability >= tuning.confirm_probability
        && top.confidence == Confidence::VeryHigh
        && cards_seen >= tuning.confirm_min_cards
}
