use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use wardrobe_core::domain::item::{ClothingItem, ItemId, NewClothingItem};
use wardrobe_core::domain::outfit::{
    NewOutfit, NewWearRecord, Outfit, OutfitHistoryEntry, OutfitId,
};
use wardrobe_core::domain::user::UserId;
use wardrobe_core::errors::DomainError;

pub mod history;
pub mod item;
pub mod memory;
pub mod outfit;

pub use history::SqlWearHistoryRepository;
pub use item::SqlItemCatalog;
pub use memory::InMemoryWardrobe;
pub use outfit::SqlOutfitRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("{entity} `{id}` was not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("invalid record: {0}")]
    Invalid(#[from] DomainError),
}

/// Read side of a user's wardrobe, plus item management.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Every item the user owns, in insertion order.
    async fn list_items(&self, user_id: UserId) -> Result<Vec<ClothingItem>, RepositoryError>;

    async fn find_item(&self, id: ItemId) -> Result<Option<ClothingItem>, RepositoryError>;

    async fn create_item(&self, item: NewClothingItem) -> Result<ClothingItem, RepositoryError>;

    async fn delete_item(&self, id: ItemId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait WearHistoryRepository: Send + Sync {
    /// Entries worn at or after `now - window_days`, newest first.
    async fn recent_history(
        &self,
        user_id: UserId,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<OutfitHistoryEntry>, RepositoryError>;

    /// Appends a history entry and bumps wear counters of the listed items the user owns.
    async fn record_worn(
        &self,
        record: NewWearRecord,
    ) -> Result<OutfitHistoryEntry, RepositoryError>;
}

#[async_trait]
pub trait OutfitRepository: Send + Sync {
    async fn save_outfit(&self, outfit: NewOutfit) -> Result<OutfitId, RepositoryError>;

    async fn list_outfits(&self, user_id: UserId) -> Result<Vec<Outfit>, RepositoryError>;

    async fn delete_outfit(&self, id: OutfitId) -> Result<bool, RepositoryError>;
}

/// Fixed-width UTC timestamps so text comparison in SQL matches chronological order.
pub(crate) fn encode_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|error| RepositoryError::Decode(format!("{column}: {error}")))
}

pub(crate) fn encode_tags(tags: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(tags).map_err(|error| RepositoryError::Decode(error.to_string()))
}

pub(crate) fn decode_tags(column: &str, raw: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(raw).map_err(|error| RepositoryError::Decode(format!("{column}: {error}")))
}

pub(crate) fn encode_item_ids(ids: &[ItemId]) -> Result<String, RepositoryError> {
    let raw: Vec<i64> = ids.iter().map(|id| id.0).collect();
    serde_json::to_string(&raw).map_err(|error| RepositoryError::Decode(error.to_string()))
}

pub(crate) fn decode_item_ids(column: &str, raw: &str) -> Result<Vec<ItemId>, RepositoryError> {
    serde_json::from_str::<Vec<i64>>(raw)
        .map(|ids| ids.into_iter().map(ItemId).collect())
        .map_err(|error| RepositoryError::Decode(format!("{column}: {error}")))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{decode_item_ids, decode_tags, decode_timestamp, encode_timestamp};
    use wardrobe_core::domain::item::ItemId;

    #[test]
    fn encoded_timestamps_sort_chronologically() {
        let base = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).single().expect("timestamp");
        let later = base + Duration::milliseconds(1);

        let early = encode_timestamp(base);
        let late = encode_timestamp(later);

        assert!(early < late);
        assert_eq!(early.len(), late.len());
        assert_eq!(decode_timestamp("worn_date", &late).expect("decode"), later);
    }

    #[test]
    fn malformed_columns_are_decode_errors() {
        assert!(decode_tags("colors", "not json").is_err());
        assert!(decode_timestamp("created_at", "yesterday").is_err());
        assert_eq!(decode_item_ids("item_ids", "[1,2]").expect("ids"), vec![ItemId(1), ItemId(2)]);
    }
}
