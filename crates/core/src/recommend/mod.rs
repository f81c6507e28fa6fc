//! Outfit Recommendation Engine
//!
//! Picks one item per outfit slot from a user's wardrobe for a given occasion and
//! weather, rotating away from recently worn items, and reports a heuristic
//! confidence score.

mod engine;
mod scoring;
pub mod taxonomy;
mod types;

pub use engine::OutfitEngine;
pub use scoring::{ItemScorer, ScoringWeights};
pub use types::*;

use crate::errors::DomainError;

/// Result type for recommendation operations
pub type RecommendResult<T> = Result<T, DomainError>;

/// Default per-item scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    season_match: 10,
    occasion_match: 10,
    neutral_color: 5,
    wear_ceiling: 10,
    recency_cap: 10,
    never_worn: 15,
};

/// Default engine settings
pub const DEFAULT_SETTINGS: EngineSettings = EngineSettings {
    recent_window_days: 7,
    points_per_slot: 25,
    match_bonus: 5,
    jitter_ceiling: 20,
    max_confidence: 95,
    shortlist_size: 3,
};

/// Confidence reported when only one core slot can be filled
pub const PARTIAL_MATCH_CONFIDENCE: u8 = 25;
