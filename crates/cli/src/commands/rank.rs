use serde_json::json;

use crate::commands::{application_error, engine_for, load_config, with_pool, CommandResult};
use wardrobe_core::recommend::OutfitRequest;
use wardrobe_core::UserId;
use wardrobe_db::rank_for_user;
use wardrobe_db::repositories::{SqlItemCatalog, SqlWearHistoryRepository};

#[derive(Debug, Clone)]
pub struct RankArgs {
    pub occasion: String,
    pub weather: String,
    pub user: i64,
}

pub fn run(args: RankArgs) -> CommandResult {
    let request = OutfitRequest::new(args.occasion.trim(), args.weather.trim());
    if let Err(error) = request.validate() {
        let (error_class, message, exit_code) = application_error(error.into());
        return CommandResult::failure("rank", error_class, message, exit_code);
    }

    let config = match load_config("rank") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let engine = engine_for(&config);
    let user_id = UserId(args.user);

    let result = with_pool("rank", &config, |pool| async move {
        let catalog = SqlItemCatalog::new(pool.clone());
        let history = SqlWearHistoryRepository::new(pool);
        rank_for_user(&catalog, &history, &engine, user_id, &request)
            .await
            .map_err(application_error)
    });

    match result {
        Ok(ranked) => {
            let eligible = ranked.iter().filter(|item| item.is_eligible()).count();
            CommandResult::success_with_data(
                "rank",
                format!("ranked {} items, {} eligible", ranked.len(), eligible),
                json!({ "items": ranked }),
            )
        }
        Err(failure) => failure,
    }
}
