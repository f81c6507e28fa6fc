pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod recommend;
pub mod repositories;

pub use connection::{connect_with_settings, DbPool};
pub use fixtures::{DemoWardrobe, SeedResult, VerificationResult};
pub use recommend::{daily_for_user, rank_for_user, suggest_for_user, WardrobeSnapshot};
