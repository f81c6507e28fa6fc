use serde_json::json;

use crate::commands::{load_config, with_pool, CommandError, CommandResult};
use wardrobe_db::{DemoWardrobe, SeedResult};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let result = with_pool("seed", &config, |pool| async move {
        let seeded = DemoWardrobe::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = DemoWardrobe::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        if !verification.all_present {
            return Err::<SeedResult, CommandError>((
                "seed_verification",
                verification_message(&verification.checks),
                6,
            ));
        }
        Ok(seeded)
    });

    match result {
        Ok(seeded) => CommandResult::success_with_data(
            "seed",
            format!(
                "demo wardrobe loaded for user {}: {} items, {} saved outfits",
                seeded.user_id, seeded.items_seeded, seeded.outfits_seeded
            ),
            json!({
                "user_id": seeded.user_id,
                "items_seeded": seeded.items_seeded,
                "outfits_seeded": seeded.outfits_seeded,
            }),
        ),
        Err(failure) => failure,
    }
}

fn verification_message(checks: &[(&'static str, bool)]) -> String {
    let failed_checks =
        checks.iter().filter_map(|(check, passed)| (!passed).then_some(*check)).collect::<Vec<_>>();

    if failed_checks.is_empty() {
        "Some demo wardrobe rows failed to load".to_string()
    } else {
        format!("Demo wardrobe verification failed for checks: {}", failed_checks.join(", "))
    }
}
