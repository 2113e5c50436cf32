// tests/properties.rs
//
// Invariants of the scoring and ranking model, checked through the public
// API rather than unit-level internals.

use std::sync::Arc;

use deck_oracle::{
    CardEvent, DeckProfile, PredictionSession, SessionState, StaticCatalog,
};

fn deck(json: serde_json::Value) -> DeckProfile {
    serde_json::from_value(json).unwrap()
}

fn red_deck_with_sig(meta: f32) -> DeckProfile {
    deck(serde_json::json!({
        "id": "red",
        "name": "Red",
        "colors": ["R"],
        "meta_share": meta,
        "signature_cards": [{ "name": "Torbran, Thane of Red Fell", "weight": 100.0 }],
        "key_cards": [{ "name": "Shock", "weight": 35.0 }]
    }))
}

#[tokio::test]
async fn color_veto_is_additive_not_removal() {
    // Off-color evidence buries a deck but must not delete it: the -50 is
    // a subtractive term, and strong card matches can still outweigh it.
    let mut s = PredictionSession::new(Arc::new(StaticCatalog::new(vec![red_deck_with_sig(0.0)])));
    s.observe_card(CardEvent::named("Forest").on_turn(1)).await.unwrap();
    let obs = s
        .observe_card(CardEvent::named("Torbran, Thane of Red Fell").on_turn(4))
        .await
        .unwrap();
    let top = &obs.predictions()[0];
    assert_eq!(top.breakdown.colors, -50.0);
    assert!(top.total > 0.0, "deck must stay in the ranking");

    // And the veto keeps the deck out of auto-confirmation: 2 cards and a
    // -50 drag never clear the very-high gates.
    assert_eq!(s.state(), SessionState::Predicting);
    assert!(s.confirmed_deck().is_none());
}

#[tokio::test]
async fn probability_bounds_hold_across_the_board() {
    let catalog = vec![
        red_deck_with_sig(100.0),
        deck(serde_json::json!({
            "id": "blue", "name": "Blue", "colors": ["U"], "meta_share": 1.0,
            "key_cards": [{ "name": "Opt", "weight": 10.0 }]
        })),
        deck(serde_json::json!({
            "id": "white", "name": "White", "colors": ["W"], "meta_share": 50.0,
            "signature_cards": [{ "name": "Torbran, Thane of Red Fell", "weight": 100.0 }]
        })),
    ];
    let mut s = PredictionSession::new(Arc::new(StaticCatalog::new(catalog)));
    for (name, turn) in [("Opt", 1), ("Shock", 2), ("Torbran, Thane of Red Fell", 4)] {
        let obs = s.observe_card(CardEvent::named(name).on_turn(turn)).await.unwrap();
        let predictions = obs.predictions();
        for c in predictions {
            assert!(
                (0.0..=0.99).contains(&c.probability),
                "probability {} out of bounds",
                c.probability
            );
        }
        if !predictions.is_empty() {
            assert!(
                predictions[0].probability >= 0.4,
                "leader must read as plausible, got {}",
                predictions[0].probability
            );
        }
    }
}

#[tokio::test]
async fn minimum_evidence_gate_holds() {
    let mut s = PredictionSession::new(Arc::new(StaticCatalog::new(vec![red_deck_with_sig(12.0)])));
    assert_eq!(s.state(), SessionState::Empty);
    let obs = s
        .observe_card(CardEvent::named("Torbran, Thane of Red Fell").on_turn(4))
        .await
        .unwrap();
    // Even a signature card alone is not enough signal.
    assert!(obs.predictions().is_empty());
    assert_eq!(s.state(), SessionState::Empty);
}

#[tokio::test]
async fn confirmation_is_one_way() {
    let mut s = PredictionSession::new(Arc::new(StaticCatalog::new(vec![red_deck_with_sig(12.0)])));
    s.observe_card(CardEvent::named("Mountain").on_turn(1)).await.unwrap();
    s.observe_card(CardEvent::named("Shock").on_turn(1)).await.unwrap();
    s.confirm_manually("red").expect("ranked");

    // No sequence of observations alone reverts a confirmed session, not
    // even a stream of cards that belong to no known deck.
    for name in ["Teferi, Hero of Dominaria", "Llanowar Elves", "Opt", "Swamp", "Island"] {
        s.observe_card(CardEvent::named(name).on_turn(5)).await.unwrap();
        assert_eq!(s.state(), SessionState::Confirmed);
    }
}

#[tokio::test]
async fn reset_is_idempotent_per_call() {
    let mut s = PredictionSession::new(Arc::new(StaticCatalog::new(vec![red_deck_with_sig(12.0)])));
    s.observe_card(CardEvent::named("Mountain").on_turn(1)).await.unwrap();

    s.reset();
    assert_eq!(s.stats().state, SessionState::Empty);
    assert_eq!(s.stats().game_number, 2);

    s.reset();
    assert_eq!(s.stats().state, SessionState::Empty);
    assert_eq!(s.stats().game_number, 3);
}

#[tokio::test]
async fn fresh_candidates_every_pass() {
    // A pass that loses its evidence quality must not inherit stale scores:
    // candidates are rebuilt from scratch each observation.
    let mut s = PredictionSession::new(Arc::new(StaticCatalog::new(vec![red_deck_with_sig(12.0)])));
    s.observe_card(CardEvent::named("Mountain").on_turn(1)).await.unwrap();
    let first = s
        .observe_card(CardEvent::named("Torbran, Thane of Red Fell").on_turn(4))
        .await
        .unwrap();
    let first_total = first.predictions()[0].total;

    // An off-color land drags the next pass down by exactly the color swing.
    let second = s.observe_card(CardEvent::named("Forest").on_turn(5)).await.unwrap();
    let second_total = second.predictions()[0].total;
    assert!(second_total < first_total);
}
