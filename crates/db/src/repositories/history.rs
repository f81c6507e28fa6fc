use chrono::{DateTime, Duration, Utc};
use sqlx::Row;
use tracing::info;

use wardrobe_core::domain::outfit::{HistoryEntryId, NewWearRecord, OutfitHistoryEntry, OutfitId};
use wardrobe_core::domain::user::UserId;

use super::{decode_item_ids, decode_timestamp, encode_item_ids, encode_timestamp};
use super::{RepositoryError, WearHistoryRepository};
use crate::DbPool;

pub struct SqlWearHistoryRepository {
    pool: DbPool,
}

impl SqlWearHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<OutfitHistoryEntry, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::Decode(e.to_string());

    let id: i64 = row.try_get("id").map_err(decode)?;
    let user_id: i64 = row.try_get("user_id").map_err(decode)?;
    let outfit_id: Option<i64> = row.try_get("outfit_id").map_err(decode)?;
    let item_ids: String = row.try_get("item_ids").map_err(decode)?;
    let worn_date: String = row.try_get("worn_date").map_err(decode)?;
    let occasion: Option<String> = row.try_get("occasion").map_err(decode)?;
    let weather: Option<String> = row.try_get("weather").map_err(decode)?;

    Ok(OutfitHistoryEntry {
        id: HistoryEntryId(id),
        user_id: UserId(user_id),
        outfit_id: outfit_id.map(OutfitId),
        item_ids: decode_item_ids("item_ids", &item_ids)?,
        worn_date: decode_timestamp("worn_date", &worn_date)?,
        occasion,
        weather,
    })
}

#[async_trait::async_trait]
impl WearHistoryRepository for SqlWearHistoryRepository {
    async fn recent_history(
        &self,
        user_id: UserId,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<OutfitHistoryEntry>, RepositoryError> {
        let cutoff = now - Duration::days(i64::from(window_days));
        let rows = sqlx::query(
            "SELECT id, user_id, outfit_id, item_ids, worn_date, occasion, weather
             FROM outfit_history
             WHERE user_id = ? AND worn_date >= ?
             ORDER BY worn_date DESC, id DESC",
        )
        .bind(user_id.0)
        .bind(encode_timestamp(cutoff))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn record_worn(
        &self,
        record: NewWearRecord,
    ) -> Result<OutfitHistoryEntry, RepositoryError> {
        record.validate()?;

        let worn_date = encode_timestamp(record.worn_date);
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            "INSERT INTO outfit_history (user_id, outfit_id, item_ids, worn_date, occasion, weather)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(record.user_id.0)
        .bind(record.outfit_id.map(|id| id.0))
        .bind(encode_item_ids(&record.item_ids)?)
        .bind(&worn_date)
        .bind(&record.occasion)
        .bind(&record.weather)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let mut bumped = 0_u64;
        for item_id in &record.item_ids {
            // Items owned by another user are listed in history but never bumped.
            bumped += sqlx::query(
                "UPDATE clothing_items
                 SET wear_count = wear_count + 1, last_worn = ?
                 WHERE id = ? AND user_id = ?",
            )
            .bind(&worn_date)
            .bind(item_id.0)
            .bind(record.user_id.0)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;

        info!(
            event_name = "wardrobe.wear.recorded",
            user_id = record.user_id.0,
            history_entry_id = id,
            items_listed = record.item_ids.len(),
            items_bumped = bumped,
            "recorded worn outfit"
        );

        Ok(OutfitHistoryEntry {
            id: HistoryEntryId(id),
            user_id: record.user_id,
            outfit_id: record.outfit_id,
            item_ids: record.item_ids,
            worn_date: record.worn_date,
            occasion: record.occasion,
            weather: record.weather,
        })
    }
}
