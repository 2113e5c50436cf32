// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod matching;
pub mod observe;
pub mod policy;
pub mod scoring;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::catalog::{
    Archetype, BundledCatalog, CatalogProvider, Color, DeckProfile, KeyCard, SignatureCard,
    StaticCatalog,
};
pub use crate::config::Tuning;
pub use crate::error::PredictError;
pub use crate::observe::CardEvent;
pub use crate::policy::{Confidence, ScoredCandidate};
pub use crate::session::{Observation, PredictionSession, SessionState, SessionStats};
