use serde_json::json;

use crate::commands::{
    invalid_request, load_config, optional_tag, parse_item_ids, repository_error, with_pool,
    CommandResult,
};
use wardrobe_core::{NewOutfit, UserId};
use wardrobe_db::repositories::{OutfitRepository, SqlOutfitRepository};

#[derive(Debug, Clone)]
pub struct SaveArgs {
    pub name: String,
    pub items: String,
    pub occasion: Option<String>,
    pub weather: Option<String>,
    pub user: i64,
}

pub fn run(args: SaveArgs) -> CommandResult {
    let name = args.name.trim().to_string();
    let parsed = if name.is_empty() {
        Err(invalid_request("outfit name is required"))
    } else {
        parse_item_ids(&args.items)
    };
    let item_ids = match parsed {
        Ok(ids) => ids,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("save", error_class, message, exit_code);
        }
    };

    let outfit = NewOutfit {
        user_id: UserId(args.user),
        name,
        item_ids,
        occasion: optional_tag(args.occasion),
        weather: optional_tag(args.weather),
    };

    let config = match load_config("save") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let name = outfit.name.clone();
    let result = with_pool("save", &config, |pool| async move {
        SqlOutfitRepository::new(pool).save_outfit(outfit).await.map_err(repository_error)
    });

    match result {
        Ok(id) => CommandResult::success_with_data(
            "save",
            format!("saved outfit `{name}` as {}", id.0),
            json!({ "outfit_id": id.0 }),
        ),
        Err(failure) => failure,
    }
}
