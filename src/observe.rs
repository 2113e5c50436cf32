//! observe.rs — Inbound card events and the immutable observation record.
//!
//! The engine does not parse logs; whatever detects a play hands us a
//! `CardEvent`. We normalize the name once at construction and infer colors
//! only from what the name itself can prove (basic lands).

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::Color;

/// Raw inbound event from the event source (log tail, manual input, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEvent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<u32>,
    /// Unix seconds; defaults to "now" when the source has no clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl CardEvent {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            turn: None,
            timestamp: None,
        }
    }

    pub fn on_turn(mut self, turn: u32) -> Self {
        self.turn = Some(turn);
        self
    }
}

/// One observed play. Immutable after creation; appended to the session
/// history in play order and never reordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedCard {
    pub name: String,
    pub normalized_name: String,
    pub turn: u32,
    pub ts_unix: i64,
    pub colors: Vec<Color>,
}

impl ObservedCard {
    /// Build from an event, taking the session's current turn as fallback.
    pub fn from_event(event: &CardEvent, session_turn: u32) -> Self {
        let normalized = normalize_name(&event.name);
        let colors = infer_colors(&normalized);
        Self {
            name: event.name.trim().to_string(),
            normalized_name: normalized,
            turn: event.turn.unwrap_or(session_turn),
            ts_unix: event.timestamp.unwrap_or_else(|| Utc::now().timestamp()),
            colors,
        }
    }
}

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("normalize regex"));
static MULTI_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Lowercase, strip punctuation, collapse whitespace.
/// "Torbran, Thane of Red Fell" → "torbran thane of red fell".
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let stripped = NON_WORD.replace_all(&lower, "");
    MULTI_WS.replace_all(stripped.trim(), " ").into_owned()
}

/// Infer colors a card name proves on its own: basic lands (plus the
/// snow-covered variants). Anything else is left to richer event sources.
pub fn infer_colors(normalized: &str) -> Vec<Color> {
    let mut out = Vec::new();
    for (land, color) in [
        ("plains", Color::W),
        ("island", Color::U),
        ("swamp", Color::B),
        ("mountain", Color::R),
        ("forest", Color::G),
    ] {
        if normalized == land || normalized == format!("snowcovered {land}") {
            out.push(color);
        }
    }
    out
}
