//! config.rs — Engine tuning knobs, loadable from TOML.
//!
//! Defaults match the shipped policy; a `config/tuning.toml` (path
//! overridable via env) lets operators adjust confirmation strictness
//! without a rebuild.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

pub const DEFAULT_TUNING_PATH: &str = "config/tuning.toml";
pub const ENV_TUNING_PATH: &str = "DECK_ORACLE_TUNING_PATH";

/// All thresholds the policy layer consults. Values are clamped on load so a
/// bad config file cannot produce probabilities outside [0, 1].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Auto-confirmation floor on the blended probability.
    pub confirm_probability: f32,
    /// Auto-confirmation floor on observed-card count.
    pub confirm_min_cards: usize,
    /// Ranked candidates kept after truncation.
    pub max_candidates: usize,
    /// Observations required before scoring starts at all.
    pub min_evidence: usize,
    /// The leader's probability never reads below this.
    pub leader_probability_floor: f32,
    /// Blend between the model probability and the score share.
    pub blend_model_weight: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            confirm_probability: 0.95,
            confirm_min_cards: 3,
            max_candidates: 5,
            min_evidence: 2,
            leader_probability_floor: 0.4,
            blend_model_weight: 0.7,
        }
    }
}

impl Tuning {
    /// Load from an explicit path; parse errors fall back to defaults with a
    /// log line rather than failing the caller.
    pub fn from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<Tuning>(&raw) {
                Ok(t) => {
                    info!(path = %path.display(), "tuning loaded");
                    t.clamped()
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "bad tuning file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Resolve the path from `DECK_ORACLE_TUNING_PATH` (default
    /// `config/tuning.toml`) and load; missing file means defaults.
    pub fn from_env() -> Self {
        let path = std::env::var(ENV_TUNING_PATH).unwrap_or_else(|_| DEFAULT_TUNING_PATH.into());
        Self::from_path(Path::new(&path))
    }

    fn clamped(mut self) -> Self {
        self.confirm_probability = self.confirm_probability.clamp(0.0, 1.0);
        self.leader_probability_floor = self.leader_probability_floor.clamp(0.0, 1.0);
        self.blend_model_weight = self.blend_model_weight.clamp(0.0, 1.0);
        self.max_candidates = self.max_candidates.max(1);
        self
    }
}
