use serde_json::json;

use crate::commands::{
    application_error, engine_for, invalid_request, load_config, repository_error, rng_for,
    with_pool, CommandResult,
};
use wardrobe_core::recommend::{OutfitRequest, SuggestionOutcome};
use wardrobe_core::{OutfitId, UserId};
use wardrobe_db::repositories::{
    OutfitRepository, SqlItemCatalog, SqlOutfitRepository, SqlWearHistoryRepository,
};
use wardrobe_db::suggest_for_user;

#[derive(Debug, Clone)]
pub struct SuggestArgs {
    pub occasion: String,
    pub weather: String,
    pub user: i64,
    pub seed: Option<u64>,
    pub save_as: Option<String>,
}

pub fn run(args: SuggestArgs) -> CommandResult {
    let request = OutfitRequest::new(args.occasion.trim(), args.weather.trim());
    if let Err(error) = request.validate() {
        let (error_class, message, exit_code) = application_error(error.into());
        return CommandResult::failure("suggest", error_class, message, exit_code);
    }

    let save_as = match args.save_as.as_deref().map(str::trim) {
        Some("") => {
            let (error_class, message, exit_code) = invalid_request("outfit name is required");
            return CommandResult::failure("suggest", error_class, message, exit_code);
        }
        other => other.map(str::to_string),
    };

    let config = match load_config("suggest") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let engine = engine_for(&config);
    let mut rng = rng_for(args.seed);
    let user_id = UserId(args.user);

    let result = with_pool("suggest", &config, |pool| async move {
        let catalog = SqlItemCatalog::new(pool.clone());
        let history = SqlWearHistoryRepository::new(pool.clone());
        let outcome =
            suggest_for_user(&catalog, &history, &engine, user_id, &request, &mut rng)
                .await
                .map_err(application_error)?;

        let saved = match (save_as, outcome.suggestion.as_ref()) {
            (Some(name), Some(suggestion)) => {
                let outfit = suggestion.to_new_outfit(
                    user_id,
                    name,
                    Some(request.occasion.clone()),
                    Some(request.weather.clone()),
                );
                let id = SqlOutfitRepository::new(pool)
                    .save_outfit(outfit)
                    .await
                    .map_err(repository_error)?;
                Some(id)
            }
            _ => None,
        };

        Ok((outcome, saved))
    });

    match result {
        Ok((outcome, saved)) => CommandResult::success_with_data(
            "suggest",
            summarize(&outcome, saved),
            json!({
                "outcome": outcome,
                "saved_outfit_id": saved.map(|id| id.0),
            }),
        ),
        Err(failure) => failure,
    }
}

fn summarize(outcome: &SuggestionOutcome, saved: Option<OutfitId>) -> String {
    let Some(suggestion) = outcome.suggestion.as_ref() else {
        return outcome
            .message
            .clone()
            .unwrap_or_else(|| "no outfit could be suggested".to_string());
    };

    let names =
        suggestion.items().iter().map(|item| item.name.as_str()).collect::<Vec<_>>().join(", ");
    let mut summary = format!(
        "{} for {} / {} (confidence {})",
        names, outcome.occasion, outcome.weather, outcome.confidence_score
    );
    if let Some(id) = saved {
        summary.push_str(&format!("; saved as outfit {}", id.0));
    }
    summary
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use wardrobe_core::recommend::{OutfitSuggestion, SuggestionOutcome, SuggestionStatus};
    use wardrobe_core::{Category, ItemId, NewClothingItem, OutfitId, Slot, UserId};

    use super::summarize;

    fn outcome(suggestion: Option<OutfitSuggestion>, status: SuggestionStatus) -> SuggestionOutcome {
        SuggestionOutcome {
            suggestion,
            confidence_score: 87,
            status,
            message: status.message().map(str::to_string),
            occasion: "work".to_string(),
            weather: "cold".to_string(),
        }
    }

    #[test]
    fn summary_lists_items_and_saved_outfit() {
        let mut suggestion = OutfitSuggestion::default();
        for (id, name, category, slot) in [
            (1, "Sweater", Category::Tops, Slot::Top),
            (2, "Trousers", Category::Bottoms, Slot::Bottom),
        ] {
            let item = NewClothingItem::new(UserId(1), name, category)
                .into_item(ItemId(id), Utc::now());
            suggestion.set(slot, Some(item));
        }

        let summary =
            summarize(&outcome(Some(suggestion), SuggestionStatus::Suggested), Some(OutfitId(4)));
        assert_eq!(summary, "Sweater, Trousers for work / cold (confidence 87); saved as outfit 4");
    }

    #[test]
    fn summary_falls_back_to_status_message() {
        let summary = summarize(&outcome(None, SuggestionStatus::NoMatch), None);
        assert!(summary.starts_with("No matching items"));
    }
}
