//! Scoring heuristics for outfit recommendations

use chrono::{DateTime, Utc};

use super::taxonomy::{is_neutral_color, seasons_for_weather};
use super::types::{EngineSettings, OutfitSuggestion};
use crate::domain::item::ClothingItem;

/// Points awarded by the per-item score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Item passes the weather match, season-less items included (default: 10)
    pub season_match: u32,
    /// Item is explicitly tagged with the requested occasion (default: 10)
    pub occasion_match: u32,
    /// Item has at least one neutral color (default: 5)
    pub neutral_color: u32,
    /// Wear bonus is `wear_ceiling - wear_count`, floored at zero (default: 10)
    pub wear_ceiling: u32,
    /// Cap on the days-since-last-worn bonus (default: 10)
    pub recency_cap: u32,
    /// Flat bonus for never-worn items, above any reachable recency bonus (default: 15)
    pub never_worn: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Score calculator for wardrobe items
#[derive(Debug, Clone, Default)]
pub struct ItemScorer {
    weights: ScoringWeights,
}

impl ItemScorer {
    /// Create a new scorer with default weights
    pub fn new() -> Self {
        Self { weights: ScoringWeights::default() }
    }

    /// Season-less items suit any weather; otherwise one tagged season must fit.
    pub fn matches_weather(item: &ClothingItem, weather: &str) -> bool {
        if item.seasons.is_empty() {
            return true;
        }

        let allowed = seasons_for_weather(weather);
        item.seasons.iter().any(|season| allowed.contains(&season.as_str()))
    }

    /// Occasion-less items suit any occasion; otherwise the exact tag must be present.
    pub fn matches_occasion(item: &ClothingItem, occasion: &str) -> bool {
        item.occasions.is_empty() || Self::tagged_for_occasion(item, occasion)
    }

    pub fn tagged_for_occasion(item: &ClothingItem, occasion: &str) -> bool {
        item.occasions.iter().any(|tag| tag == occasion)
    }

    /// Rank an item within its slot. Higher is better.
    pub fn score_item(
        &self,
        item: &ClothingItem,
        occasion: &str,
        weather: &str,
        now: DateTime<Utc>,
    ) -> u32 {
        let mut score = 0;

        if Self::matches_weather(item, weather) {
            score += self.weights.season_match;
        }

        if Self::tagged_for_occasion(item, occasion) {
            score += self.weights.occasion_match;
        }

        if item.colors.iter().any(|color| is_neutral_color(color)) {
            score += self.weights.neutral_color;
        }

        score += self.weights.wear_ceiling.saturating_sub(item.wear_count);

        score += match item.last_worn {
            Some(last_worn) => {
                let days = (now - last_worn).num_days().max(0);
                u32::try_from(days).unwrap_or(u32::MAX).min(self.weights.recency_cap)
            }
            None => self.weights.never_worn,
        };

        score
    }

    /// Aggregate confidence for a built suggestion.
    ///
    /// `jitter` is supplied by the caller so the calculation itself stays pure.
    pub fn confidence(
        &self,
        suggestion: &OutfitSuggestion,
        occasion: &str,
        weather: &str,
        settings: &EngineSettings,
        jitter: f64,
    ) -> u8 {
        let items = suggestion.items();
        let count = |matched: usize| u32::try_from(matched).unwrap_or(u32::MAX);
        let base = count(items.len()).saturating_mul(settings.points_per_slot);
        let weather_bonus = count(
            items.iter().filter(|item| Self::matches_weather(item, weather)).count(),
        )
        .saturating_mul(settings.match_bonus);
        let occasion_bonus = count(
            items.iter().filter(|item| Self::tagged_for_occasion(item, occasion)).count(),
        )
        .saturating_mul(settings.match_bonus);

        let total = base.saturating_add(weather_bonus).saturating_add(occasion_bonus);
        let raw = f64::from(total) + jitter.max(0.0);
        raw.min(f64::from(settings.max_confidence)).round() as u8
    }
}
