use serde_json::json;

use crate::commands::{
    application_error, engine_for, load_config, optional_tag, rng_for, with_pool, CommandResult,
};
use wardrobe_core::recommend::OutfitRequest;
use wardrobe_core::UserId;
use wardrobe_db::daily_for_user;
use wardrobe_db::repositories::{SqlItemCatalog, SqlWearHistoryRepository};

#[derive(Debug, Clone)]
pub struct DailyArgs {
    pub weather: String,
    pub occasion: Option<String>,
    pub user: i64,
    pub seed: Option<u64>,
}

pub fn run(args: DailyArgs) -> CommandResult {
    // No occasion means no occasion filter on this path.
    let occasion = optional_tag(args.occasion).unwrap_or_default();
    let request = OutfitRequest::new(occasion, args.weather.trim());

    let config = match load_config("daily") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let engine = engine_for(&config);
    let mut rng = rng_for(args.seed);
    let user_id = UserId(args.user);

    let result = with_pool("daily", &config, |pool| async move {
        let catalog = SqlItemCatalog::new(pool.clone());
        let history = SqlWearHistoryRepository::new(pool);
        daily_for_user(&catalog, &history, &engine, user_id, &request, &mut rng)
            .await
            .map_err(application_error)
    });

    match result {
        Ok(outfit) => {
            let item_ids = outfit.item_ids().iter().map(|id| id.0).collect::<Vec<_>>();
            CommandResult::success_with_data(
                "daily",
                outfit.summary(),
                json!({ "outfit": outfit, "item_ids": item_ids }),
            )
        }
        Err(failure) => failure,
    }
}
