use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::{connect_with_settings, migrations::MIGRATOR, DbPool};

    const MANAGED_TABLES: &[&str] = &["clothing_items", "outfits", "outfit_history"];

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "clothing_items",
        "outfits",
        "outfit_history",
        "idx_clothing_items_user_id",
        "idx_clothing_items_user_category",
        "idx_outfits_user_id",
        "idx_outfit_history_user_worn_date",
    ];

    async fn table_count(pool: &DbPool, table: &str) -> i64 {
        sqlx::query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(pool)
        .await
        .expect("check table")
        .get::<i64, _>("count")
    }

    #[tokio::test]
    async fn migrations_create_baseline_tables() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for table in MANAGED_TABLES {
            assert_eq!(table_count(&pool, table).await, 1, "{table} should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_reversible() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");

        for table in MANAGED_TABLES {
            assert_eq!(table_count(&pool, table).await, 0, "{table} should be dropped");
        }
    }

    #[tokio::test]
    async fn wear_count_cannot_go_negative() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let result = sqlx::query(
            "INSERT INTO clothing_items (user_id, name, category, wear_count, created_at)
             VALUES (1, 'Tee', 'tops', -1, '2026-01-01T00:00:00.000000Z')",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn rerunning_after_full_undo_recreates_identical_schema() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");
        let before = schema_objects(&pool).await;
        assert_eq!(before.len(), MANAGED_SCHEMA_OBJECTS.len());

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");
        assert!(schema_objects(&pool).await.is_empty(), "undo should drop every object");

        run_pending(&pool).await.expect("re-run migrations");
        assert_eq!(schema_objects(&pool).await, before);
    }

    /// `(name, sql)` of every wardrobe table and index, sorted by name.
    async fn schema_objects(pool: &DbPool) -> Vec<(String, String)> {
        let rows = sqlx::query(
            "SELECT name, IFNULL(sql, '') AS sql FROM sqlite_master
             WHERE type IN ('table', 'index') ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .expect("load schema objects");

        rows.iter()
            .map(|row| (row.get::<String, _>("name"), row.get::<String, _>("sql")))
            .filter(|(name, _)| MANAGED_SCHEMA_OBJECTS.contains(&name.as_str()))
            .collect()
    }
}
