use chrono::Utc;
use sqlx::Row;

use wardrobe_core::domain::item::{ClothingItem, ItemId, NewClothingItem};
use wardrobe_core::domain::user::UserId;

use super::{decode_tags, decode_timestamp, encode_tags, encode_timestamp};
use super::{ItemCatalog, RepositoryError};
use crate::DbPool;

const ITEM_COLUMNS: &str = "id, user_id, name, category, image_url, colors, seasons, occasions,
     wear_count, last_worn, created_at";

pub struct SqlItemCatalog {
    pool: DbPool,
}

impl SqlItemCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Rows across every user. Fails when the schema has not been migrated.
    pub async fn count_all(&self) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM clothing_items").fetch_one(&self.pool).await?;
        Ok(count)
    }
}

pub(crate) fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<ClothingItem, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::Decode(e.to_string());

    let id: i64 = row.try_get("id").map_err(decode)?;
    let user_id: i64 = row.try_get("user_id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let category: String = row.try_get("category").map_err(decode)?;
    let image_url: Option<String> = row.try_get("image_url").map_err(decode)?;
    let colors: String = row.try_get("colors").map_err(decode)?;
    let seasons: String = row.try_get("seasons").map_err(decode)?;
    let occasions: String = row.try_get("occasions").map_err(decode)?;
    let wear_count: i64 = row.try_get("wear_count").map_err(decode)?;
    let last_worn: Option<String> = row.try_get("last_worn").map_err(decode)?;
    let created_at: String = row.try_get("created_at").map_err(decode)?;

    let wear_count = u32::try_from(wear_count)
        .map_err(|_| RepositoryError::Decode(format!("wear_count out of range: {wear_count}")))?;

    Ok(ClothingItem {
        id: ItemId(id),
        user_id: UserId(user_id),
        name,
        category,
        image_url,
        colors: decode_tags("colors", &colors)?,
        seasons: decode_tags("seasons", &seasons)?,
        occasions: decode_tags("occasions", &occasions)?,
        wear_count,
        last_worn: last_worn.map(|raw| decode_timestamp("last_worn", &raw)).transpose()?,
        created_at: decode_timestamp("created_at", &created_at)?,
    })
}

#[async_trait::async_trait]
impl ItemCatalog for SqlItemCatalog {
    async fn list_items(&self, user_id: UserId) -> Result<Vec<ClothingItem>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM clothing_items WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_item).collect()
    }

    async fn find_item(&self, id: ItemId) -> Result<Option<ClothingItem>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM clothing_items WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_item).transpose()
    }

    async fn create_item(&self, item: NewClothingItem) -> Result<ClothingItem, RepositoryError> {
        item.validate()?;
        let created_at = Utc::now();

        let id = sqlx::query(
            "INSERT INTO clothing_items
                (user_id, name, category, image_url, colors, seasons, occasions,
                 wear_count, last_worn, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, NULL, ?)",
        )
        .bind(item.user_id.0)
        .bind(item.name.trim())
        .bind(&item.category)
        .bind(&item.image_url)
        .bind(encode_tags(&item.colors)?)
        .bind(encode_tags(&item.seasons)?)
        .bind(encode_tags(&item.occasions)?)
        .bind(encode_timestamp(created_at))
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_item(ItemId(id))
            .await?
            .ok_or(RepositoryError::NotFound { entity: "clothing item", id })
    }

    async fn delete_item(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM clothing_items WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
