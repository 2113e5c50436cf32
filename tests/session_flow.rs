// tests/session_flow.rs
//
// Full session lifecycle against a small multi-deck catalog: ranking,
// auto-confirmation, post-confirmation expectation checks, reset.

use std::sync::Arc;

use deck_oracle::{
    CardEvent, DeckProfile, Observation, PredictionSession, SessionState, StaticCatalog,
};

fn catalog() -> Vec<DeckProfile> {
    serde_json::from_value(serde_json::json!([
        {
            "id": "mono-red",
            "name": "Mono Red Aggro",
            "colors": ["R"],
            "meta_share": 30.0,
            "archetype": "aggro",
            "signature_cards": [
                { "name": "Torbran, Thane of Red Fell", "weight": 100.0 },
                { "name": "Embercleave", "weight": 95.0 }
            ],
            "key_cards": [
                { "name": "Fervent Champion", "weight": 60.0 },
                { "name": "Shock", "weight": 35.0 }
            ],
            "mainboard": ["Mountain", "Castle Embereth"]
        },
        {
            "id": "azorius-control",
            "name": "Azorius Control",
            "colors": ["W", "U"],
            "meta_share": 9.0,
            "archetype": "control",
            "signature_cards": [{ "name": "Teferi, Hero of Dominaria", "weight": 100.0 }],
            "key_cards": [{ "name": "Absorb", "weight": 55.0 }]
        }
    ]))
    .unwrap()
}

fn session() -> PredictionSession {
    PredictionSession::new(Arc::new(StaticCatalog::new(catalog())))
}

#[tokio::test]
async fn red_draws_rank_the_red_deck_first() {
    let mut s = session();
    s.observe_card(CardEvent::named("Mountain").on_turn(1)).await.unwrap();
    let obs = s
        .observe_card(CardEvent::named("Fervent Champion").on_turn(1))
        .await
        .unwrap();
    let predictions = obs.predictions();
    assert!(!predictions.is_empty());
    assert_eq!(predictions[0].deck.id, "mono-red");
}

#[tokio::test]
async fn overwhelming_evidence_auto_confirms() {
    let mut s = session();
    let plays = [
        ("Mountain", 1),
        ("Fervent Champion", 1),
        ("Shock", 2),
        ("Torbran, Thane of Red Fell", 4),
        ("Embercleave", 6),
    ];
    let mut confirmed_at = None;
    for (name, turn) in plays {
        let obs = s.observe_card(CardEvent::named(name).on_turn(turn)).await.unwrap();
        if obs.is_confirmed() && confirmed_at.is_none() {
            confirmed_at = Some(name);
        }
    }
    assert_eq!(s.state(), SessionState::Confirmed);
    let deck = s.confirmed_deck().expect("confirmed");
    assert_eq!(deck.deck.id, "mono-red");
    // The first signature card pushes past every gate before the end.
    assert_eq!(confirmed_at, Some("Torbran, Thane of Red Fell"));
}

#[tokio::test]
async fn confirmed_session_reports_expected_cards() {
    let mut s = session();
    for (name, turn) in [
        ("Mountain", 1),
        ("Fervent Champion", 1),
        ("Shock", 2),
        ("Torbran, Thane of Red Fell", 4),
        ("Embercleave", 6),
    ] {
        s.observe_card(CardEvent::named(name).on_turn(turn)).await.unwrap();
    }
    assert_eq!(s.state(), SessionState::Confirmed);

    // Mainboard card: expected.
    let obs = s
        .observe_card(CardEvent::named("Castle Embereth").on_turn(7))
        .await
        .unwrap();
    assert!(matches!(obs, Observation::Confirmed { expected: true, .. }));

    // A blue planeswalker is not part of Mono Red.
    let obs = s
        .observe_card(CardEvent::named("Teferi, Hero of Dominaria").on_turn(8))
        .await
        .unwrap();
    assert!(matches!(obs, Observation::Confirmed { expected: false, .. }));
    // And the session never reverts on its own.
    assert_eq!(s.state(), SessionState::Confirmed);
}

#[tokio::test]
async fn reset_starts_the_next_game_clean() {
    let mut s = session();
    for (name, turn) in [("Mountain", 1), ("Shock", 2), ("Torbran, Thane of Red Fell", 4)] {
        s.observe_card(CardEvent::named(name).on_turn(turn)).await.unwrap();
    }
    let before = s.stats();
    assert_eq!(before.game_number, 1);
    assert!(before.cards_seen > 0);

    s.reset();
    let after = s.stats();
    assert_eq!(after.game_number, 2);
    assert_eq!(after.cards_seen, 0);
    assert_eq!(after.candidate_count, 0);
    assert_eq!(after.state, SessionState::Empty);
    assert!(after.colors_detected.is_empty());

    // The new game starts from the evidence floor again.
    let obs = s.observe_card(CardEvent::named("Island").on_turn(1)).await.unwrap();
    assert!(obs.predictions().is_empty());
}

#[tokio::test]
async fn stats_snapshot_tracks_the_session() {
    let mut s = session();
    s.observe_card(CardEvent::named("Mountain").on_turn(1)).await.unwrap();
    s.observe_card(CardEvent::named("Shock").on_turn(2)).await.unwrap();
    let stats = s.stats();
    assert_eq!(stats.cards_seen, 2);
    assert_eq!(stats.turn, 2);
    assert_eq!(stats.colors_detected, vec![deck_oracle::Color::R]);
    assert!(stats.candidate_count > 0);
    assert!(stats.confirmed_deck.is_none());

    let confirmed = s.confirm_manually("mono-red").unwrap();
    assert_eq!(s.stats().confirmed_deck.as_deref(), Some("Mono Red Aggro"));
    assert_eq!(confirmed.deck.id, "mono-red");
}
