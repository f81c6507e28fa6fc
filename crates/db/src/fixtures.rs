use sqlx::Executor;

use wardrobe_core::domain::item::Category;
use wardrobe_core::domain::user::DEMO_USER_ID;

use crate::connection::DbPool;
use crate::repositories::item::row_to_item;
use crate::repositories::RepositoryError;

/// Items the demo fixture guarantees, as `(id, name, category)`.
const DEMO_ITEMS: &[(i64, &str, Category)] = &[
    (1001, "White Oxford Shirt", Category::Tops),
    (1002, "Gray Crewneck Sweater", Category::Tops),
    (1003, "Coral Linen Tee", Category::Tops),
    (1004, "Navy Chinos", Category::Bottoms),
    (1005, "Black Wool Trousers", Category::Bottoms),
    (1006, "Dark Wash Jeans", Category::Bottoms),
    (1007, "White Sneakers", Category::Shoes),
    (1008, "Brown Leather Boots", Category::Shoes),
    (1009, "Black Oxford Shoes", Category::Shoes),
    (1010, "Running Shoes", Category::Shoes),
    (1011, "Leather Belt", Category::Accessories),
    (1012, "Wool Scarf", Category::Accessories),
];

const DEMO_OUTFITS: &[(i64, &str)] = &[(1001, "Office Classic")];

/// Demo wardrobe for the single demo user.
///
/// Covers every category with a mix of tagged and untagged items so each
/// weather and occasion yields a suggestion.
pub struct DemoWardrobe;

impl DemoWardrobe {
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_wardrobe.sql");

    /// Load the demo wardrobe. Existing rows are left untouched.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult {
            user_id: DEMO_USER_ID.0,
            items_seeded: DEMO_ITEMS.len(),
            outfits_seeded: DEMO_OUTFITS.len(),
        })
    }

    /// Check that every demo row exists and decodes.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let item_ids = sql_array_from_ids(DEMO_ITEMS.iter().map(|(id, _, _)| *id));
        let rows = sqlx::query(&format!(
            "SELECT id, user_id, name, category, image_url, colors, seasons, occasions,
                    wear_count, last_worn, created_at
             FROM clothing_items WHERE id IN {item_ids} ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;
        let items = rows.iter().map(row_to_item).collect::<Result<Vec<_>, _>>()?;
        checks.push(("demo-items", items.len() == DEMO_ITEMS.len()));

        let contract_ok = DEMO_ITEMS.iter().all(|(id, name, category)| {
            items.iter().any(|item| {
                item.id.0 == *id
                    && item.user_id == DEMO_USER_ID
                    && item.name == *name
                    && item.category() == Some(*category)
            })
        });
        checks.push(("demo-item-contract", contract_ok));

        for category in Category::ALL {
            let present = items.iter().any(|item| item.category() == Some(category));
            checks.push((category_label(category), present));
        }

        let outfit_ids = sql_array_from_ids(DEMO_OUTFITS.iter().map(|(id, _)| *id));
        let outfit_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM outfits WHERE id IN {outfit_ids} AND user_id = ?1"
        ))
        .bind(DEMO_USER_ID.0)
        .fetch_one(pool)
        .await?;
        checks.push(("demo-outfits", outfit_count == DEMO_OUTFITS.len() as i64));

        let all_present = checks.iter().all(|(_, ok)| *ok);
        Ok(VerificationResult { all_present, checks })
    }

    /// Remove the demo rows, including any history that references demo outfits.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        let item_ids = sql_array_from_ids(DEMO_ITEMS.iter().map(|(id, _, _)| *id));
        let outfit_ids = sql_array_from_ids(DEMO_OUTFITS.iter().map(|(id, _)| *id));

        sqlx::query(&format!("DELETE FROM outfit_history WHERE outfit_id IN {outfit_ids}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM outfits WHERE id IN {outfit_ids}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM clothing_items WHERE id IN {item_ids}"))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Tops => "demo-category-tops",
        Category::Bottoms => "demo-category-bottoms",
        Category::Shoes => "demo-category-shoes",
        Category::Accessories => "demo-category-accessories",
    }
}

fn sql_array_from_ids(ids: impl Iterator<Item = i64>) -> String {
    let joined = ids.map(|id| id.to_string()).collect::<Vec<_>>().join(",");
    format!("({joined})")
}

#[derive(Debug)]
pub struct SeedResult {
    pub user_id: i64,
    pub items_seeded: usize,
    pub outfits_seeded: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
