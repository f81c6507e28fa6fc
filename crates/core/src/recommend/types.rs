//! Types for the Outfit Recommendation Engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RecommendationConfig;
use crate::domain::item::{ClothingItem, ItemId};
use crate::domain::outfit::{NewOutfit, Slot};
use crate::domain::user::UserId;
use crate::errors::DomainError;

/// Tunables for selection and confidence aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Trailing days of wear history that block an item from being suggested
    pub recent_window_days: u32,
    /// Confidence points per filled slot (default: 25)
    pub points_per_slot: u32,
    /// Confidence points per selected item matching weather, and again for occasion
    pub match_bonus: u32,
    /// Exclusive upper bound of the random confidence jitter
    pub jitter_ceiling: u32,
    /// Confidence cap, always below 100
    pub max_confidence: u8,
    /// How many top-scored candidates per slot the random pick draws from
    pub shortlist_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        super::DEFAULT_SETTINGS
    }
}

impl From<&RecommendationConfig> for EngineSettings {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            recent_window_days: config.recent_window_days,
            points_per_slot: config.points_per_slot,
            match_bonus: config.match_bonus,
            jitter_ceiling: config.jitter_ceiling,
            max_confidence: config.max_confidence,
            shortlist_size: config.shortlist_size,
        }
    }
}

/// Request for an outfit suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitRequest {
    /// Occasion tag, matched exactly against item tags
    pub occasion: String,
    /// Weather condition (warm, cold, rainy, windy; anything else means "season-less only")
    pub weather: String,
    /// Reference time for recency scoring and the history window
    pub now: DateTime<Utc>,
    /// Overrides the engine's history window for this request
    pub recent_window_days: Option<u32>,
}

impl OutfitRequest {
    /// Create a new request evaluated at the current time
    pub fn new(occasion: impl Into<String>, weather: impl Into<String>) -> Self {
        Self {
            occasion: occasion.into(),
            weather: weather.into(),
            now: Utc::now(),
            recent_window_days: None,
        }
    }

    /// Pin the reference time
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Override the recently-worn window
    pub fn with_recent_window_days(mut self, days: u32) -> Self {
        self.recent_window_days = Some(days);
        self
    }

    /// Reject requests missing occasion or weather
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.occasion.trim().is_empty() {
            return Err(DomainError::InvalidRequest("occasion is required".to_string()));
        }
        self.validate_weather()
    }

    pub(crate) fn validate_weather(&self) -> Result<(), DomainError> {
        if self.weather.trim().is_empty() {
            return Err(DomainError::InvalidRequest("weather is required".to_string()));
        }
        Ok(())
    }
}

/// One optional item per slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitSuggestion {
    pub top: Option<ClothingItem>,
    pub bottom: Option<ClothingItem>,
    pub shoes: Option<ClothingItem>,
    pub accessory: Option<ClothingItem>,
}

impl OutfitSuggestion {
    pub fn get(&self, slot: Slot) -> Option<&ClothingItem> {
        match slot {
            Slot::Top => self.top.as_ref(),
            Slot::Bottom => self.bottom.as_ref(),
            Slot::Shoes => self.shoes.as_ref(),
            Slot::Accessory => self.accessory.as_ref(),
        }
    }

    pub fn set(&mut self, slot: Slot, item: Option<ClothingItem>) {
        match slot {
            Slot::Top => self.top = item,
            Slot::Bottom => self.bottom = item,
            Slot::Shoes => self.shoes = item,
            Slot::Accessory => self.accessory = item,
        }
    }

    /// Selected items in slot order
    pub fn items(&self) -> Vec<&ClothingItem> {
        Slot::ALL.iter().filter_map(|slot| self.get(*slot)).collect()
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items().into_iter().map(|item| item.id).collect()
    }

    pub fn filled_slots(&self) -> usize {
        self.items().len()
    }

    /// Convert an accepted suggestion into a persistable outfit
    pub fn to_new_outfit(
        &self,
        user_id: UserId,
        name: impl Into<String>,
        occasion: Option<String>,
        weather: Option<String>,
    ) -> NewOutfit {
        NewOutfit { user_id, name: name.into(), item_ids: self.item_ids(), occasion, weather }
    }
}

/// Why a suggestion was or was not produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    /// At least two core slots could be filled
    Suggested,
    /// The user owns no items at all
    EmptyWardrobe,
    /// Items exist but none fill a core slot under these conditions
    NoMatch,
    /// Only one core slot could be filled
    PartialMatch,
}

impl SuggestionStatus {
    /// User-facing message for the empty states
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SuggestionStatus::Suggested => None,
            SuggestionStatus::EmptyWardrobe => {
                Some("No items in your wardrobe yet. Add some clothing items first!")
            }
            SuggestionStatus::NoMatch => Some(
                "No matching items found for these conditions. Try different options or add more items!",
            ),
            SuggestionStatus::PartialMatch => {
                Some("Limited matches. Add more items for better suggestions!")
            }
        }
    }
}

/// Engine output for a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionOutcome {
    pub suggestion: Option<OutfitSuggestion>,
    /// Heuristic score in 0..=max_confidence, not a probability
    pub confidence_score: u8,
    pub status: SuggestionStatus,
    pub message: Option<String>,
    pub occasion: String,
    pub weather: String,
}

impl SuggestionOutcome {
    pub(crate) fn empty(request: &OutfitRequest, status: SuggestionStatus, confidence: u8) -> Self {
        Self {
            suggestion: None,
            confidence_score: confidence,
            status,
            message: status.message().map(str::to_string),
            occasion: request.occasion.clone(),
            weather: request.weather.clone(),
        }
    }
}

/// Reason an item would be dropped by the hard filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    RecentlyWorn,
    Occasion,
    Weather,
}

/// Score of a single item computed before filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    pub item_id: ItemId,
    pub name: String,
    pub slot: Slot,
    pub score: u32,
    pub exclusion: Option<Exclusion>,
}

impl RankedItem {
    pub fn is_eligible(&self) -> bool {
        self.exclusion.is_none()
    }
}

/// Complete outfit produced by the stricter daily path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOutfit {
    pub top: ClothingItem,
    pub bottom: ClothingItem,
    pub shoes: ClothingItem,
    pub accessory: Option<ClothingItem>,
    pub weather: String,
    pub occasion: Option<String>,
}

impl DailyOutfit {
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids = vec![self.top.id, self.bottom.id, self.shoes.id];
        ids.extend(self.accessory.as_ref().map(|item| item.id));
        ids
    }

    pub fn summary(&self) -> String {
        format!(
            "Today's suggestion: {}, {}, and {}",
            self.top.name, self.bottom.name, self.shoes.name
        )
    }
}
