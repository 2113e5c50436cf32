//! session.rs — The stateful prediction session: EMPTY → PREDICTING →
//! CONFIRMED, driven by `observe_card`.
//!
//! Confirmation is one-way by design: once a deck is confirmed, further
//! observations only check whether the new card fits the confirmed list.
//! Only `reset` or an explicit `unconfirm` reopens the race; automatic
//! reversion would oscillate on noisy evidence.
//!
//! Methods take `&mut self`, so overlapping `observe_card` calls are ruled
//! out at compile time; callers that share a session across tasks should
//! wrap it in an async mutex.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{CatalogProvider, Color, DeckProfile};
use crate::config::Tuning;
use crate::context::GameContext;
use crate::error::PredictError;
use crate::matching::{fuzzy_match, near_equal};
use crate::observe::{CardEvent, ObservedCard};
use crate::policy::{rank, should_confirm, ScoredCandidate};
use crate::scoring::score_deck;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Empty,
    Predicting,
    Confirmed,
}

/// What one `observe_card` call hands back.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Observation {
    /// Still guessing. The list is empty below the evidence floor or when
    /// the catalog is unavailable.
    Predicting { predictions: Vec<ScoredCandidate> },
    /// A deck is locked in. `expected` reports whether the card that
    /// triggered this observation fits the confirmed list.
    Confirmed {
        deck: Box<ScoredCandidate>,
        expected: bool,
    },
}

impl Observation {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Observation::Confirmed { .. })
    }

    pub fn predictions(&self) -> &[ScoredCandidate] {
        match self {
            Observation::Predicting { predictions } => predictions,
            Observation::Confirmed { .. } => &[],
        }
    }
}

/// Session summary for overlays and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub state: SessionState,
    pub game_number: u32,
    pub turn: u32,
    pub cards_seen: usize,
    pub colors_detected: Vec<Color>,
    pub candidate_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_deck: Option<String>,
}

pub struct PredictionSession {
    provider: Arc<dyn CatalogProvider>,
    tuning: Tuning,
    observed: Vec<ObservedCard>,
    predictions: Vec<ScoredCandidate>,
    confirmed: Option<ScoredCandidate>,
    context: GameContext,
    state: SessionState,
}

impl PredictionSession {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self::with_tuning(provider, Tuning::default())
    }

    pub fn with_tuning(provider: Arc<dyn CatalogProvider>, tuning: Tuning) -> Self {
        Self {
            provider,
            tuning,
            observed: Vec::new(),
            predictions: Vec::new(),
            confirmed: None,
            context: GameContext::new(),
            state: SessionState::Empty,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn predictions(&self) -> &[ScoredCandidate] {
        &self.predictions
    }

    pub fn confirmed_deck(&self) -> Option<&ScoredCandidate> {
        self.confirmed.as_ref()
    }

    /// Ingest one play. Rescans the whole catalog while predicting; after
    /// confirmation it only checks the new card against the confirmed list.
    pub async fn observe_card(&mut self, event: CardEvent) -> Result<Observation, PredictError> {
        if event.name.trim().is_empty() {
            // Session state stays untouched; the caller can correct and retry.
            return Err(PredictError::InvalidInput("blank card name".into()));
        }

        let card = ObservedCard::from_event(&event, self.context.turn);
        debug!(card = %card.name, turn = card.turn, "card observed");
        self.context.record_play(&card);
        self.observed.push(card);

        if let Some(confirmed) = &self.confirmed {
            let newest = self.observed.last().expect("just pushed");
            let expected = card_fits_deck(&confirmed.deck, newest);
            return Ok(Observation::Confirmed {
                deck: Box::new(confirmed.clone()),
                expected,
            });
        }

        if self.observed.len() < self.tuning.min_evidence {
            // Below the evidence floor there is nothing worth scoring.
            return Ok(Observation::Predicting {
                predictions: Vec::new(),
            });
        }
        self.state = SessionState::Predicting;

        let catalog = match self.provider.deck_catalog().await {
            Ok(decks) if !decks.is_empty() => decks,
            Ok(_) => {
                warn!("deck catalog is empty; returning no predictions");
                self.predictions.clear();
                return Ok(Observation::Predicting {
                    predictions: Vec::new(),
                });
            }
            Err(e) => {
                warn!(error = %e, "deck catalog unavailable; returning no predictions");
                self.predictions.clear();
                return Ok(Observation::Predicting {
                    predictions: Vec::new(),
                });
            }
        };

        let mut outcomes = Vec::with_capacity(catalog.len());
        for deck in catalog {
            match score_deck(&deck, &self.observed, &self.context) {
                Ok(outcome) => outcomes.push((deck, outcome)),
                Err(reason) => warn!(deck = %deck.id, %reason, "skipping malformed deck"),
            }
        }

        // Previous candidates are discarded wholesale; never patched.
        self.predictions = rank(outcomes, self.observed.len(), &self.tuning);

        if let Some(top) = self.predictions.first() {
            if should_confirm(top, self.observed.len(), &self.tuning) {
                let deck = top.clone();
                debug!(deck = %deck.deck.name, probability = deck.probability, "auto-confirmed");
                self.confirmed = Some(deck.clone());
                self.state = SessionState::Confirmed;
                return Ok(Observation::Confirmed {
                    deck: Box::new(deck),
                    expected: true,
                });
            }
        }

        Ok(Observation::Predicting {
            predictions: self.predictions.clone(),
        })
    }

    /// Adopt the game clock from the caller. Zero is not a turn.
    pub fn set_turn(&mut self, turn: u32) -> Result<(), PredictError> {
        if turn == 0 {
            return Err(PredictError::InvalidInput("turn must be positive".into()));
        }
        self.context.turn = turn;
        Ok(())
    }

    /// Start the next game: everything is replaced atomically except the
    /// incremented game counter. Safe to call at any time, repeatedly.
    pub fn reset(&mut self) {
        self.context = self.context.next_game();
        self.observed.clear();
        self.predictions.clear();
        self.confirmed = None;
        self.state = SessionState::Empty;
    }

    /// Operator override: accept any deck currently in the ranking,
    /// regardless of thresholds.
    pub fn confirm_manually(&mut self, deck_id: &str) -> Option<ScoredCandidate> {
        let candidate = self.predictions.iter().find(|c| c.deck.id == deck_id)?.clone();
        self.confirmed = Some(candidate.clone());
        self.state = SessionState::Confirmed;
        Some(candidate)
    }

    /// Explicit escape hatch from CONFIRMED; observed history is kept, so
    /// the next observation rescans the catalog with full evidence.
    pub fn unconfirm(&mut self) {
        if self.confirmed.take().is_some() {
            self.state = if self.observed.len() >= self.tuning.min_evidence {
                SessionState::Predicting
            } else {
                SessionState::Empty
            };
        }
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            state: self.state,
            game_number: self.context.game_number,
            turn: self.context.turn,
            cards_seen: self.observed.len(),
            colors_detected: self.context.colors_detected.iter().copied().collect(),
            candidate_count: self.predictions.len(),
            confirmed_deck: self.confirmed.as_ref().map(|c| c.deck.name.clone()),
        }
    }
}

/// Is this card plausibly part of the confirmed deck? Fuzzy against the
/// identifying lists, typo-tolerant against the full mainboard.
fn card_fits_deck(deck: &DeckProfile, card: &ObservedCard) -> bool {
    deck.signature_cards
        .iter()
        .any(|s| fuzzy_match(&card.name, &s.name))
        || deck.key_cards.iter().any(|k| fuzzy_match(&card.name, &k.name))
        || deck
            .mainboard
            .iter()
            .any(|m| fuzzy_match(&card.name, m) || near_equal(&card.name, m))
}
