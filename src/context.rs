//! context.rs — Per-game mutable context: current turn, detected colors,
//! and a bounded window of recent plays for the archetype heuristics.

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;

use crate::catalog::Color;
use crate::observe::ObservedCard;

/// Only the last N plays feed the play-pattern heuristics.
pub const PLAY_PATTERN_CAP: usize = 10;

/// Compact record kept in the pattern window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayRecord {
    pub turn: u32,
    pub normalized_name: String,
}

/// Mutable per-game state owned by the session. `colors_detected` only grows
/// within a game; `reset` swaps in a fresh context with the next game number.
#[derive(Debug, Clone, Serialize)]
pub struct GameContext {
    pub turn: u32,
    pub colors_detected: BTreeSet<Color>,
    pub play_pattern: VecDeque<PlayRecord>,
    pub game_number: u32,
}

impl GameContext {
    pub fn new() -> Self {
        Self::with_game_number(1)
    }

    fn with_game_number(game_number: u32) -> Self {
        Self {
            turn: 1,
            colors_detected: BTreeSet::new(),
            play_pattern: VecDeque::with_capacity(PLAY_PATTERN_CAP),
            game_number,
        }
    }

    /// Fresh context for the next game of the match. Nothing carries over
    /// except the incremented game number.
    pub fn next_game(&self) -> Self {
        Self::with_game_number(self.game_number + 1)
    }

    /// Fold one observation into the context.
    pub fn record_play(&mut self, card: &ObservedCard) {
        if card.turn > self.turn {
            self.turn = card.turn;
        }
        self.colors_detected.extend(card.colors.iter().copied());
        if self.play_pattern.len() == PLAY_PATTERN_CAP {
            self.play_pattern.pop_front();
        }
        self.play_pattern.push_back(PlayRecord {
            turn: card.turn,
            normalized_name: card.normalized_name.clone(),
        });
    }

    /// Average turn across the pattern window; `None` when empty.
    pub fn average_play_turn(&self) -> Option<f32> {
        if self.play_pattern.is_empty() {
            return None;
        }
        let sum: u32 = self.play_pattern.iter().map(|p| p.turn).sum();
        Some(sum as f32 / self.play_pattern.len() as f32)
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{CardEvent, ObservedCard};

    fn obs(name: &str, turn: u32) -> ObservedCard {
        ObservedCard::from_event(&CardEvent::named(name).on_turn(turn), 1)
    }

    #[test]
    fn colors_only_grow() {
        let mut ctx = GameContext::new();
        ctx.record_play(&obs("Forest", 1));
        ctx.record_play(&obs("Mountain", 2));
        ctx.record_play(&obs("Shock", 2));
        assert_eq!(ctx.colors_detected.len(), 2);
        assert!(ctx.colors_detected.contains(&Color::G));
        assert!(ctx.colors_detected.contains(&Color::R));
    }

    #[test]
    fn pattern_window_is_bounded() {
        let mut ctx = GameContext::new();
        for i in 0..15 {
            ctx.record_play(&obs("Shock", i + 1));
        }
        assert_eq!(ctx.play_pattern.len(), PLAY_PATTERN_CAP);
        // Oldest plays evicted first.
        assert_eq!(ctx.play_pattern.front().unwrap().turn, 6);
    }

    #[test]
    fn next_game_preserves_only_the_counter() {
        let mut ctx = GameContext::new();
        ctx.record_play(&obs("Island", 3));
        let next = ctx.next_game();
        assert_eq!(next.game_number, 2);
        assert_eq!(next.turn, 1);
        assert!(next.colors_detected.is_empty());
        assert!(next.play_pattern.is_empty());
    }

    #[test]
    fn average_turn() {
        let mut ctx = GameContext::new();
        assert!(ctx.average_play_turn().is_none());
        ctx.record_play(&obs("Shock", 1));
        ctx.record_play(&obs("Embercleave", 5));
        assert_eq!(ctx.average_play_turn(), Some(3.0));
    }
}
