use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::item::ItemId;
use crate::domain::user::UserId;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutfitId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntryId(pub i64);

/// Outfit position an item can fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Top,
    Bottom,
    Shoes,
    Accessory,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Top, Slot::Bottom, Slot::Shoes, Slot::Accessory];

    /// Top, bottom and shoes make up a basic outfit.
    pub const CORE: [Slot; 3] = [Slot::Top, Slot::Bottom, Slot::Shoes];

    pub fn is_core(&self) -> bool {
        !matches!(self, Slot::Accessory)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Shoes => "shoes",
            Self::Accessory => "accessory",
        }
    }
}

/// A named, persisted combination of items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub id: OutfitId,
    pub user_id: UserId,
    pub name: String,
    pub item_ids: Vec<ItemId>,
    pub occasion: Option<String>,
    pub weather: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOutfit {
    pub user_id: UserId,
    pub name: String,
    pub item_ids: Vec<ItemId>,
    pub occasion: Option<String>,
    pub weather: Option<String>,
}

impl NewOutfit {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidRequest("outfit name must not be empty".to_string()));
        }
        if self.item_ids.is_empty() {
            return Err(DomainError::InvalidRequest(
                "an outfit needs at least one item".to_string(),
            ));
        }
        Ok(())
    }
}

/// Record that a set of items was worn together. Immutable once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitHistoryEntry {
    pub id: HistoryEntryId,
    pub user_id: UserId,
    pub outfit_id: Option<OutfitId>,
    pub item_ids: Vec<ItemId>,
    pub worn_date: DateTime<Utc>,
    pub occasion: Option<String>,
    pub weather: Option<String>,
}

impl OutfitHistoryEntry {
    pub fn is_within_window(&self, now: DateTime<Utc>, window_days: u32) -> bool {
        self.worn_date >= now - Duration::days(i64::from(window_days))
    }
}

/// Payload for logging an outfit as worn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWearRecord {
    pub user_id: UserId,
    pub outfit_id: Option<OutfitId>,
    pub item_ids: Vec<ItemId>,
    pub occasion: Option<String>,
    pub weather: Option<String>,
    pub worn_date: DateTime<Utc>,
}

impl NewWearRecord {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.item_ids.is_empty() {
            return Err(DomainError::InvalidRequest(
                "a worn outfit needs at least one item".to_string(),
            ));
        }
        Ok(())
    }
}
