//! Demo that replays a scripted Mono Red opening against the bundled
//! catalog and prints the ranking after each observed card.

use std::sync::Arc;

use deck_oracle::{BundledCatalog, CardEvent, Observation, PredictionSession, Tuning};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut session = PredictionSession::with_tuning(Arc::new(BundledCatalog), Tuning::from_env());

    let script = [
        ("Mountain", 1),
        ("Fervent Champion", 1),
        ("Shock", 2),
        ("Anax, Hardened in the Forge", 3),
        ("Torbran, Thane of Red Fell", 4),
        ("Embercleave", 6),
    ];

    for (name, turn) in script {
        let obs = session
            .observe_card(CardEvent::named(name).on_turn(turn))
            .await
            .expect("scripted names are valid");

        println!("\nturn {turn}: opponent plays {name}");
        match &obs {
            Observation::Predicting { predictions } if predictions.is_empty() => {
                println!("  (not enough evidence yet)");
            }
            Observation::Predicting { predictions } => {
                for (i, c) in predictions.iter().enumerate() {
                    println!(
                        "  {}. {} — {:.0}% ({:?}, score {:.1})",
                        i + 1,
                        c.deck.name,
                        c.probability * 100.0,
                        c.confidence,
                        c.total
                    );
                }
            }
            Observation::Confirmed { deck, expected } => {
                println!(
                    "  CONFIRMED: {} ({:.0}%, expected card: {})",
                    deck.deck.name,
                    deck.probability * 100.0,
                    expected
                );
            }
        }
    }

    let stats = session.stats();
    println!(
        "\ngame {}: {} cards seen, state {:?}",
        stats.game_number, stats.cards_seen, stats.state
    );
}
