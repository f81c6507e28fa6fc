use chrono::Utc;
use serde_json::json;

use crate::commands::{
    load_config, optional_tag, parse_item_ids, repository_error, with_pool, CommandResult,
};
use wardrobe_core::{NewWearRecord, OutfitId, UserId};
use wardrobe_db::repositories::{SqlWearHistoryRepository, WearHistoryRepository};

#[derive(Debug, Clone)]
pub struct WearArgs {
    pub items: String,
    pub occasion: Option<String>,
    pub weather: Option<String>,
    pub outfit: Option<i64>,
    pub user: i64,
}

pub fn run(args: WearArgs) -> CommandResult {
    let item_ids = match parse_item_ids(&args.items) {
        Ok(ids) => ids,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("wear", error_class, message, exit_code);
        }
    };

    let record = NewWearRecord {
        user_id: UserId(args.user),
        outfit_id: args.outfit.map(OutfitId),
        item_ids,
        occasion: optional_tag(args.occasion),
        weather: optional_tag(args.weather),
        worn_date: Utc::now(),
    };

    let config = match load_config("wear") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let result = with_pool("wear", &config, |pool| async move {
        SqlWearHistoryRepository::new(pool).record_worn(record).await.map_err(repository_error)
    });

    match result {
        Ok(entry) => CommandResult::success_with_data(
            "wear",
            format!("recorded {} items as worn", entry.item_ids.len()),
            json!({ "entry": entry }),
        ),
        Err(failure) => failure,
    }
}
