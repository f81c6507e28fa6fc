use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use wardrobe_core::domain::item::{ClothingItem, ItemId, NewClothingItem};
use wardrobe_core::domain::outfit::{
    HistoryEntryId, NewOutfit, NewWearRecord, Outfit, OutfitHistoryEntry, OutfitId,
};
use wardrobe_core::domain::user::UserId;

use super::{ItemCatalog, OutfitRepository, RepositoryError, WearHistoryRepository};

#[derive(Default)]
struct WardrobeState {
    items: BTreeMap<ItemId, ClothingItem>,
    outfits: BTreeMap<i64, Outfit>,
    history: Vec<OutfitHistoryEntry>,
    next_item_id: i64,
    next_outfit_id: i64,
    next_history_id: i64,
}

/// Single-lock store backing all three repository traits.
#[derive(Default)]
pub struct InMemoryWardrobe {
    state: RwLock<WardrobeState>,
}

impl InMemoryWardrobe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with fully-formed items, keeping their ids and wear stats.
    pub fn with_items(items: impl IntoIterator<Item = ClothingItem>) -> Self {
        let mut state = WardrobeState::default();
        for item in items {
            state.next_item_id = state.next_item_id.max(item.id.0);
            state.items.insert(item.id, item);
        }
        Self { state: RwLock::new(state) }
    }
}

#[async_trait::async_trait]
impl ItemCatalog for InMemoryWardrobe {
    async fn list_items(&self, user_id: UserId) -> Result<Vec<ClothingItem>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.items.values().filter(|item| item.user_id == user_id).cloned().collect())
    }

    async fn find_item(&self, id: ItemId) -> Result<Option<ClothingItem>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.items.get(&id).cloned())
    }

    async fn create_item(&self, item: NewClothingItem) -> Result<ClothingItem, RepositoryError> {
        item.validate()?;
        let mut state = self.state.write().await;
        state.next_item_id += 1;
        let created = item.into_item(ItemId(state.next_item_id), Utc::now());
        state.items.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete_item(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.items.remove(&id).is_some())
    }
}

#[async_trait::async_trait]
impl WearHistoryRepository for InMemoryWardrobe {
    async fn recent_history(
        &self,
        user_id: UserId,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<OutfitHistoryEntry>, RepositoryError> {
        let state = self.state.read().await;
        let mut entries: Vec<OutfitHistoryEntry> = state
            .history
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.is_within_window(now, window_days))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.worn_date.cmp(&a.worn_date).then_with(|| b.id.0.cmp(&a.id.0)));
        Ok(entries)
    }

    async fn record_worn(
        &self,
        record: NewWearRecord,
    ) -> Result<OutfitHistoryEntry, RepositoryError> {
        record.validate()?;
        let mut state = self.state.write().await;

        for item_id in &record.item_ids {
            if let Some(item) = state.items.get_mut(item_id) {
                if item.user_id == record.user_id {
                    item.record_wear(record.worn_date);
                }
            }
        }

        state.next_history_id += 1;
        let entry = OutfitHistoryEntry {
            id: HistoryEntryId(state.next_history_id),
            user_id: record.user_id,
            outfit_id: record.outfit_id,
            item_ids: record.item_ids,
            worn_date: record.worn_date,
            occasion: record.occasion,
            weather: record.weather,
        };
        state.history.push(entry.clone());
        Ok(entry)
    }
}

#[async_trait::async_trait]
impl OutfitRepository for InMemoryWardrobe {
    async fn save_outfit(&self, outfit: NewOutfit) -> Result<OutfitId, RepositoryError> {
        outfit.validate()?;
        let mut state = self.state.write().await;
        state.next_outfit_id += 1;
        let id = OutfitId(state.next_outfit_id);
        state.outfits.insert(
            id.0,
            Outfit {
                id,
                user_id: outfit.user_id,
                name: outfit.name.trim().to_string(),
                item_ids: outfit.item_ids,
                occasion: outfit.occasion,
                weather: outfit.weather,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn list_outfits(&self, user_id: UserId) -> Result<Vec<Outfit>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .outfits
            .values()
            .rev()
            .filter(|outfit| outfit.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_outfit(&self, id: OutfitId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let removed = state.outfits.remove(&id.0).is_some();
        if removed {
            for entry in state.history.iter_mut().filter(|entry| entry.outfit_id == Some(id)) {
                entry.outfit_id = None;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use wardrobe_core::domain::item::{Category, ItemId, NewClothingItem};
    use wardrobe_core::domain::outfit::{NewOutfit, NewWearRecord};
    use wardrobe_core::domain::user::UserId;

    use crate::repositories::{
        InMemoryWardrobe, ItemCatalog, OutfitRepository, WearHistoryRepository,
    };

    #[tokio::test]
    async fn in_memory_wardrobe_tracks_wear() {
        let repo = InMemoryWardrobe::new();
        let tee = repo
            .create_item(NewClothingItem::new(UserId(1), "Tee", Category::Tops))
            .await
            .expect("create");

        let worn_at = Utc::now() - Duration::days(1);
        repo.record_worn(NewWearRecord {
            user_id: UserId(1),
            outfit_id: None,
            item_ids: vec![tee.id],
            occasion: None,
            weather: None,
            worn_date: worn_at,
        })
        .await
        .expect("record");

        let tee = repo.find_item(tee.id).await.expect("find").expect("exists");
        assert_eq!(tee.wear_count, 1);
        assert_eq!(tee.last_worn, Some(worn_at));

        let recent = repo.recent_history(UserId(1), 7, Utc::now()).await.expect("history");
        assert_eq!(recent.len(), 1);
        let later = Utc::now() + Duration::days(30);
        assert!(repo.recent_history(UserId(1), 7, later).await.expect("history").is_empty());
    }

    #[tokio::test]
    async fn seeded_items_keep_their_ids_and_wear_stats() {
        let worn_at = Utc::now() - Duration::days(3);
        let mut boots = NewClothingItem::new(UserId(1), "Boots", Category::Shoes)
            .into_item(ItemId(40), Utc::now());
        boots.wear_count = 6;
        boots.last_worn = Some(worn_at);
        let repo = InMemoryWardrobe::with_items([boots]);

        let boots = repo.find_item(ItemId(40)).await.expect("find").expect("exists");
        assert_eq!(boots.wear_count, 6);
        assert_eq!(boots.last_worn, Some(worn_at));

        let scarf = repo
            .create_item(NewClothingItem::new(UserId(1), "Scarf", Category::Accessories))
            .await
            .expect("create");
        assert_eq!(scarf.id, ItemId(41));
        assert_eq!(repo.list_items(UserId(1)).await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn in_memory_outfits_round_trip() {
        let repo = InMemoryWardrobe::new();
        let id = repo
            .save_outfit(NewOutfit {
                user_id: UserId(1),
                name: "Weekend".to_string(),
                item_ids: vec![ItemId(1), ItemId(2)],
                occasion: Some("casual".to_string()),
                weather: None,
            })
            .await
            .expect("save");

        let outfits = repo.list_outfits(UserId(1)).await.expect("list");
        assert_eq!(outfits.len(), 1);
        assert_eq!(outfits[0].id, id);
        assert!(repo.delete_outfit(id).await.expect("delete"));
        assert!(repo.list_outfits(UserId(1)).await.expect("list").is_empty());
    }
}
