//! catalog.rs — Deck catalog boundary: profile types and the provider trait.
//!
//! Profiles are supplied by an external meta-data source and are read-only
//! to the engine. Missing fields are tolerated everywhere: a profile with no
//! key cards or no curve simply scores zero for those contributions.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The five color symbols. Serialized as single letters ("W", "U", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    W,
    U,
    B,
    R,
    G,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Color::W => "W",
            Color::U => "U",
            Color::B => "B",
            Color::R => "R",
            Color::G => "G",
        };
        f.write_str(s)
    }
}

/// Strategic category of a deck; drives the pattern multiplier in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Aggro,
    Control,
    Midrange,
    Ramp,
    Combo,
    Tempo,
}

/// A card whose presence is near-conclusive evidence for one deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureCard {
    pub name: String,
    /// Typically around 100.
    pub weight: f32,
}

/// A supporting card that contributes partial identifying evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCard {
    pub name: String,
    /// 0–95; defaults to 50 when the source omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
    /// Free-form role tag ("removal", "finisher", ...). Informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// One known competitive deck as supplied by the meta-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub colors: BTreeSet<Color>,
    /// Popularity weight, percent of the competitive field (0–100).
    #[serde(default)]
    pub meta_share: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<Archetype>,
    #[serde(default)]
    pub signature_cards: Vec<SignatureCard>,
    #[serde(default)]
    pub key_cards: Vec<KeyCard>,
    /// Turn number → card-name substrings typically played on that turn.
    #[serde(default)]
    pub expected_curve: BTreeMap<u32, Vec<String>>,
    /// Full decklist names, when the provider has them. Only used for the
    /// post-confirmation "was this card expected?" check.
    #[serde(default)]
    pub mainboard: Vec<String>,
}

impl DeckProfile {
    /// Quick structural sanity check; returns a diagnostic reason on failure.
    /// Scoring skips (never aborts on) profiles that fail this.
    pub fn validate(&self) -> Result<(), String> {
        if !self.meta_share.is_finite() || self.meta_share < 0.0 {
            return Err(format!("deck '{}': meta_share out of range", self.id));
        }
        if self.signature_cards.iter().any(|c| !c.weight.is_finite() || c.weight < 0.0) {
            return Err(format!("deck '{}': negative signature weight", self.id));
        }
        if self
            .key_cards
            .iter()
            .any(|c| c.weight.is_some_and(|w| !w.is_finite() || w < 0.0))
        {
            return Err(format!("deck '{}': negative key-card weight", self.id));
        }
        Ok(())
    }
}

/// Read interface required of the meta-data collaborator. May be slow, may
/// be stale, may fail — the engine degrades to empty predictions on failure.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn deck_catalog(&self) -> anyhow::Result<Vec<DeckProfile>>;
}

/// In-memory provider; the workhorse for tests and embedders that fetch
/// profiles themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    decks: Vec<DeckProfile>,
}

impl StaticCatalog {
    pub fn new(decks: Vec<DeckProfile>) -> Self {
        Self { decks }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn deck_catalog(&self) -> anyhow::Result<Vec<DeckProfile>> {
        Ok(self.decks.clone())
    }
}

static BUNDLED: Lazy<Vec<DeckProfile>> = Lazy::new(|| {
    let raw = include_str!("../decks.json");
    serde_json::from_str::<Vec<DeckProfile>>(raw).expect("valid bundled deck catalog")
});

/// Provider over the starter catalog compiled into the binary. Handy for the
/// demo and for running without a live meta-data source.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

#[async_trait]
impl CatalogProvider for BundledCatalog {
    async fn deck_catalog(&self) -> anyhow::Result<Vec<DeckProfile>> {
        Ok(BUNDLED.clone())
    }
}
