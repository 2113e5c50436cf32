//! scoring.rs — The pure scoring engine: one deck profile against the
//! observed evidence. No I/O, no side effects; deterministic given inputs.
//!
//! Six contributions, summed in a fixed order (the order only shapes the
//! human-readable reasoning trace, not the math):
//!   signature matches, key-card matches, color compatibility, curve timing,
//!   meta popularity, and a final multiplicative archetype modifier.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::catalog::{Archetype, DeckProfile};
use crate::context::GameContext;
use crate::matching::fuzzy_match;
use crate::observe::ObservedCard;

/// Signature hits are near-conclusive, so they count double.
const SIGNATURE_MULTIPLIER: f32 = 2.0;
/// Key cards without an explicit weight from the provider.
const DEFAULT_KEY_WEIGHT: f32 = 50.0;
/// Bonus factor when a key card lands on its expected turn.
const ON_CURVE_FACTOR: f32 = 1.2;
/// A detected color the deck cannot produce. Subtractive, not a veto: the
/// deck stays in the ranking, just buried.
const COLOR_MISMATCH_PENALTY: f32 = -50.0;
const COLOR_EXACT_MATCH: f32 = 25.0 * 1.3;
const COLOR_PARTIAL_MATCH: f32 = 15.0;
/// Flat bonus per observed card found on the deck's expected curve.
const CURVE_HIT_BONUS: f32 = 10.0;

const AGGRO_MULTIPLIER: f32 = 1.2;
const CONTROL_MULTIPLIER: f32 = 1.15;
const RAMP_MULTIPLIER: f32 = 1.25;

/// Cheap interactive spells usually hit the table on turns 1–2.
static EARLY_SPELL_HINTS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["shock", "bolt", "strike", "stomp", "spike", "probe"]);
/// Planeswalkers rarely land before turn 3.
static WALKER_HINTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "teferi", "chandra", "nissa", "liliana", "jace", "karn", "ugin", "vraska", "kaya",
        "sorin", "ajani",
    ]
});
/// Top-end finishers rarely land before turn 5.
static FINISHER_HINTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "dragon", "titan", "ulamog", "emrakul", "finale", "craterhoof", "avenger", "zenith",
    ]
});

static CONTROL_KEYWORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["counter", "removal", "draw", "wrath", "verdict", "negate"]);
static RAMP_KEYWORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["explore", "rampant", "growth", "land", "mana", "cultivate"]);

/// Additive components plus the final multiplier, kept per candidate for
/// explainability and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub signature: f32,
    pub key_cards: f32,
    pub colors: f32,
    pub timing: f32,
    pub meta_bonus: f32,
    pub archetype_multiplier: f32,
    /// Deterministic list-consistency metric in [60, 100]. Reported for
    /// diagnostics; not part of the additive total (see DESIGN.md).
    pub consistency: f32,
}

/// Result of scoring one deck against the observed evidence.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreOutcome {
    pub total: f32,
    pub breakdown: ScoreBreakdown,
    pub matched_cards: Vec<String>,
    pub reasoning: Vec<String>,
}

/// Score one deck. `Err` carries the diagnostic reason for a malformed
/// profile; the caller skips that deck and keeps ranking the rest.
pub fn score_deck(
    deck: &DeckProfile,
    observed: &[ObservedCard],
    ctx: &GameContext,
) -> Result<ScoreOutcome, String> {
    deck.validate()?;

    let mut matched_cards: Vec<String> = Vec::new();
    let mut reasoning: Vec<String> = Vec::new();

    // 1) Signature matches. Each signature entry consumes at most one
    //    observed card.
    let mut signature = 0.0f32;
    for sig in &deck.signature_cards {
        if let Some(card) = observed.iter().find(|c| fuzzy_match(&c.name, &sig.name)) {
            let pts = sig.weight * SIGNATURE_MULTIPLIER;
            signature += pts;
            push_match(&mut matched_cards, &card.name);
            reasoning.push(format!("signature '{}' seen (+{:.0})", sig.name, pts));
        }
    }

    // 2) Key cards, with the on-curve timing factor.
    let mut key_cards = 0.0f32;
    for key in &deck.key_cards {
        if let Some(card) = observed.iter().find(|c| fuzzy_match(&c.name, &key.name)) {
            let base = key.weight.unwrap_or(DEFAULT_KEY_WEIGHT);
            let on_curve = played_on_expected_turn(&card.normalized_name, card.turn);
            let pts = if on_curve { base * ON_CURVE_FACTOR } else { base };
            key_cards += pts;
            push_match(&mut matched_cards, &card.name);
            if on_curve {
                reasoning.push(format!("key card '{}' on curve (+{:.0})", key.name, pts));
            } else {
                reasoning.push(format!("key card '{}' seen (+{:.0})", key.name, pts));
            }
        }
    }

    // 3) Color compatibility. A single off-color symbol is a hard negative
    //    signal and short-circuits the rest of the color logic.
    let colors = if ctx.colors_detected.is_empty() {
        0.0
    } else if ctx.colors_detected.iter().any(|c| !deck.colors.contains(c)) {
        reasoning.push("off-color play detected (-50)".to_string());
        COLOR_MISMATCH_PENALTY
    } else if ctx.colors_detected == deck.colors {
        reasoning.push(format!("exact color match (+{COLOR_EXACT_MATCH:.1})"));
        COLOR_EXACT_MATCH
    } else {
        reasoning.push(format!("compatible colors (+{COLOR_PARTIAL_MATCH:.0})"));
        COLOR_PARTIAL_MATCH
    };

    // 4) Curve timing: +10 per observed card found on the expected curve
    //    for its turn.
    let mut timing = 0.0f32;
    for card in observed {
        if let Some(expected) = deck.expected_curve.get(&card.turn) {
            if expected.iter().any(|e| fuzzy_match(&card.name, e)) {
                timing += CURVE_HIT_BONUS;
                reasoning.push(format!("'{}' fits the turn-{} curve (+10)", card.name, card.turn));
            }
        }
    }

    // 5) Meta popularity, tiered.
    let meta_bonus = meta_tier_bonus(deck.meta_share);
    if meta_bonus > 0.0 {
        reasoning.push(format!(
            "meta share {:.1}% (+{:.0})",
            deck.meta_share, meta_bonus
        ));
    }

    // 6) Archetype multiplier over the running total.
    let archetype_multiplier = archetype_multiplier(deck.archetype, ctx);
    if archetype_multiplier != 1.0 {
        reasoning.push(format!("play pattern fits archetype (x{archetype_multiplier:.2})"));
    }

    let sum = signature + key_cards + colors + timing + meta_bonus;
    // Negative partials are allowed; only the final sum is floored.
    let total = sum.max(0.0) * archetype_multiplier;

    Ok(ScoreOutcome {
        total,
        breakdown: ScoreBreakdown {
            signature,
            key_cards,
            colors,
            timing,
            meta_bonus,
            archetype_multiplier,
            consistency: consistency_score(deck),
        },
        matched_cards,
        reasoning,
    })
}

fn push_match(matched: &mut Vec<String>, name: &str) {
    if !matched.iter().any(|m| m == name) {
        matched.push(name.to_string());
    }
}

/// Name-keyed timing heuristics: cheap burn on turns 1–2, planeswalkers
/// turn 3+, big finishers turn 5+.
fn played_on_expected_turn(normalized_name: &str, turn: u32) -> bool {
    if EARLY_SPELL_HINTS.iter().any(|h| normalized_name.contains(h)) {
        return (1..=2).contains(&turn);
    }
    if WALKER_HINTS.iter().any(|h| normalized_name.contains(h)) {
        return turn >= 3;
    }
    if FINISHER_HINTS.iter().any(|h| normalized_name.contains(h)) {
        return turn >= 5;
    }
    false
}

fn meta_tier_bonus(meta_share: f32) -> f32 {
    if meta_share > 15.0 {
        20.0 * 1.5
    } else if meta_share > 10.0 {
        10.0
    } else if meta_share > 5.0 {
        5.0
    } else {
        0.0
    }
}

/// Match the deck's strategic category against the recent play pattern.
fn archetype_multiplier(archetype: Option<Archetype>, ctx: &GameContext) -> f32 {
    let avg_turn = ctx.average_play_turn();
    match archetype {
        Some(Archetype::Aggro) => {
            if ctx.play_pattern.len() >= 2 && avg_turn.is_some_and(|t| t <= 3.0) {
                AGGRO_MULTIPLIER
            } else {
                1.0
            }
        }
        Some(Archetype::Control) => {
            let keyword_seen = ctx
                .play_pattern
                .iter()
                .any(|p| CONTROL_KEYWORDS.iter().any(|k| p.normalized_name.contains(k)));
            if avg_turn.is_some_and(|t| t >= 3.0) && keyword_seen {
                CONTROL_MULTIPLIER
            } else {
                1.0
            }
        }
        Some(Archetype::Ramp) => {
            let keyword_seen = ctx
                .play_pattern
                .iter()
                .any(|p| RAMP_KEYWORDS.iter().any(|k| p.normalized_name.contains(k)));
            if keyword_seen {
                RAMP_MULTIPLIER
            } else {
                1.0
            }
        }
        _ => 1.0,
    }
}

/// Deterministic stand-in for the old random "consistency" placeholder:
/// denser signature/key lists read as more consistent. Range [60, 100].
pub fn consistency_score(deck: &DeckProfile) -> f32 {
    let listed = deck.signature_cards.len() + deck.key_cards.len();
    let density = (listed as f32 / 12.0).min(1.0);
    60.0 + 40.0 * density
}
