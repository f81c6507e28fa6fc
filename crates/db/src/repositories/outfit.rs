use chrono::Utc;
use sqlx::Row;
use tracing::info;

use wardrobe_core::domain::outfit::{NewOutfit, Outfit, OutfitId};
use wardrobe_core::domain::user::UserId;

use super::{decode_item_ids, decode_timestamp, encode_item_ids, encode_timestamp};
use super::{OutfitRepository, RepositoryError};
use crate::DbPool;

pub struct SqlOutfitRepository {
    pool: DbPool,
}

impl SqlOutfitRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_outfit(row: &sqlx::sqlite::SqliteRow) -> Result<Outfit, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::Decode(e.to_string());

    let id: i64 = row.try_get("id").map_err(decode)?;
    let user_id: i64 = row.try_get("user_id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let item_ids: String = row.try_get("item_ids").map_err(decode)?;
    let occasion: Option<String> = row.try_get("occasion").map_err(decode)?;
    let weather: Option<String> = row.try_get("weather").map_err(decode)?;
    let created_at: String = row.try_get("created_at").map_err(decode)?;

    Ok(Outfit {
        id: OutfitId(id),
        user_id: UserId(user_id),
        name,
        item_ids: decode_item_ids("item_ids", &item_ids)?,
        occasion,
        weather,
        created_at: decode_timestamp("created_at", &created_at)?,
    })
}

#[async_trait::async_trait]
impl OutfitRepository for SqlOutfitRepository {
    async fn save_outfit(&self, outfit: NewOutfit) -> Result<OutfitId, RepositoryError> {
        outfit.validate()?;

        let id = sqlx::query(
            "INSERT INTO outfits (user_id, name, item_ids, occasion, weather, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(outfit.user_id.0)
        .bind(outfit.name.trim())
        .bind(encode_item_ids(&outfit.item_ids)?)
        .bind(&outfit.occasion)
        .bind(&outfit.weather)
        .bind(encode_timestamp(Utc::now()))
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(
            event_name = "wardrobe.outfit.saved",
            user_id = outfit.user_id.0,
            outfit_id = id,
            items = outfit.item_ids.len(),
            "saved outfit"
        );

        Ok(OutfitId(id))
    }

    async fn list_outfits(&self, user_id: UserId) -> Result<Vec<Outfit>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, item_ids, occasion, weather, created_at
             FROM outfits
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_outfit).collect()
    }

    async fn delete_outfit(&self, id: OutfitId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM outfits WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use wardrobe_core::domain::item::ItemId;
    use wardrobe_core::domain::outfit::{NewOutfit, NewWearRecord};
    use wardrobe_core::domain::user::UserId;

    use super::SqlOutfitRepository;
    use crate::repositories::{
        OutfitRepository, RepositoryError, SqlWearHistoryRepository, WearHistoryRepository,
    };
    use crate::{connect_with_settings, migrations, DbPool};

    async fn pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn new_outfit(name: &str, ids: &[i64]) -> NewOutfit {
        NewOutfit {
            user_id: UserId(1),
            name: name.to_string(),
            item_ids: ids.iter().map(|id| ItemId(*id)).collect(),
            occasion: Some("work".to_string()),
            weather: Some("cold".to_string()),
        }
    }

    #[tokio::test]
    async fn saved_outfits_list_with_their_items() {
        let repo = SqlOutfitRepository::new(pool().await);

        let id = repo.save_outfit(new_outfit("Monday", &[1, 2, 3])).await.expect("save");
        let outfits = repo.list_outfits(UserId(1)).await.expect("list");

        assert_eq!(outfits.len(), 1);
        assert_eq!(outfits[0].id, id);
        assert_eq!(outfits[0].item_ids, vec![ItemId(1), ItemId(2), ItemId(3)]);
        assert!(repo.list_outfits(UserId(2)).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn nameless_or_empty_outfits_are_rejected() {
        let repo = SqlOutfitRepository::new(pool().await);

        let error = repo.save_outfit(new_outfit("  ", &[1])).await.expect_err("no name");
        assert!(matches!(error, RepositoryError::Invalid(_)));
        let error = repo.save_outfit(new_outfit("Empty", &[])).await.expect_err("no items");
        assert!(matches!(error, RepositoryError::Invalid(_)));
    }

    #[tokio::test]
    async fn deleting_an_outfit_keeps_its_history() {
        let pool = pool().await;
        let repo = SqlOutfitRepository::new(pool.clone());
        let history = SqlWearHistoryRepository::new(pool);

        let id = repo.save_outfit(new_outfit("Friday", &[4, 5])).await.expect("save");
        history
            .record_worn(NewWearRecord {
                user_id: UserId(1),
                outfit_id: Some(id),
                item_ids: vec![ItemId(4), ItemId(5)],
                occasion: None,
                weather: None,
                worn_date: Utc::now(),
            })
            .await
            .expect("record");

        assert!(repo.delete_outfit(id).await.expect("delete"));

        let entries = history.recent_history(UserId(1), 7, Utc::now()).await.expect("history");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outfit_id, None);
    }
}
