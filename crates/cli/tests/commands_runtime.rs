use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use wardrobe_cli::commands::{daily, doctor, migrate, rank, save, seed, suggest, wear};

#[test]
fn migrate_returns_success_against_fresh_database() {
    with_database(|| {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
        assert!(payload.get("data").is_none());
    });
}

#[test]
fn migrate_returns_config_failure_for_non_sqlite_url() {
    with_env(&[("WARDROBE_DATABASE_URL", "postgres://localhost/wardrobe")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    with_database(|| {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["status"], "ok");
        assert_eq!(first_payload["data"]["items_seeded"], 12);
        assert_eq!(first_payload["data"]["outfits_seeded"], 1);

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);
        assert_eq!(first_payload["message"], second_payload["message"]);
    });
}

#[test]
fn suggest_returns_outcome_for_demo_wardrobe() {
    with_database(|| {
        assert_eq!(seed::run().exit_code, 0);

        let result = suggest::run(suggest_args("work", "cold", Some(7)));
        assert_eq!(result.exit_code, 0, "expected suggestion success: {}", result.output);

        let payload = parse_payload(&result.output);
        let outcome = &payload["data"]["outcome"];
        assert_eq!(payload["command"], "suggest");
        assert_eq!(outcome["status"], "suggested");
        assert_eq!(outcome["occasion"], "work");
        assert!(outcome["suggestion"]["top"].is_object());
        assert!(outcome["confidence_score"].as_u64().is_some_and(|score| score <= 95));
        assert_eq!(payload["data"]["saved_outfit_id"], Value::Null);
    });
}

#[test]
fn suggest_with_same_seed_is_reproducible() {
    with_database(|| {
        assert_eq!(seed::run().exit_code, 0);

        let first = parse_payload(&suggest::run(suggest_args("casual", "warm", Some(42))).output);
        let second = parse_payload(&suggest::run(suggest_args("casual", "warm", Some(42))).output);

        assert_eq!(first["data"]["outcome"], second["data"]["outcome"]);
    });
}

#[test]
fn suggest_on_empty_wardrobe_reports_empty_state() {
    with_database(|| {
        let result = suggest::run(suggest_args("casual", "warm", Some(1)));
        assert_eq!(result.exit_code, 0, "empty wardrobe is an outcome, not an error");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["outcome"]["status"], "empty_wardrobe");
        assert_eq!(payload["data"]["outcome"]["confidence_score"], 0);
        assert!(payload["message"].as_str().is_some_and(|message| message.contains("wardrobe")));
    });
}

#[test]
fn suggest_rejects_blank_occasion() {
    with_database(|| {
        let result = suggest::run(suggest_args("  ", "warm", None));
        assert_eq!(result.exit_code, 7, "expected invalid request code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_request");
    });
}

#[test]
fn suggest_save_as_persists_the_accepted_outfit() {
    with_database(|| {
        assert_eq!(seed::run().exit_code, 0);

        let mut args = suggest_args("work", "cold", Some(3));
        args.save_as = Some("Monday".to_string());
        let result = suggest::run(args);
        assert_eq!(result.exit_code, 0, "expected suggestion success: {}", result.output);

        let payload = parse_payload(&result.output);
        let saved = payload["data"]["saved_outfit_id"].as_i64().expect("saved outfit id");
        assert!(saved > 1001, "new outfits are numbered after the demo outfit");
    });
}

#[test]
fn daily_returns_complete_outfit_after_seed() {
    with_database(|| {
        assert_eq!(seed::run().exit_code, 0);

        let result = daily::run(daily::DailyArgs {
            weather: "warm".to_string(),
            occasion: None,
            user: 1,
            seed: Some(11),
        });
        assert_eq!(result.exit_code, 0, "expected daily success: {}", result.output);

        let payload = parse_payload(&result.output);
        let outfit = &payload["data"]["outfit"];
        assert!(outfit["top"].is_object());
        assert!(outfit["bottom"].is_object());
        assert!(outfit["shoes"].is_object());
        assert_eq!(outfit["occasion"], Value::Null);
        assert!(payload["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Today's suggestion:")));
    });
}

#[test]
fn daily_without_wardrobe_is_incomplete() {
    with_database(|| {
        let result = daily::run(daily::DailyArgs {
            weather: "cold".to_string(),
            occasion: Some("work".to_string()),
            user: 1,
            seed: None,
        });
        assert_eq!(result.exit_code, 8, "expected incomplete outfit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "incomplete_outfit");
    });
}

#[test]
fn worn_items_are_excluded_from_ranking() {
    with_database(|| {
        assert_eq!(seed::run().exit_code, 0);

        let worn = wear::run(wear::WearArgs {
            items: "1001, 1004, 1007".to_string(),
            occasion: Some("work".to_string()),
            weather: Some("warm".to_string()),
            outfit: None,
            user: 1,
        });
        assert_eq!(worn.exit_code, 0, "expected wear success: {}", worn.output);
        let worn_payload = parse_payload(&worn.output);
        assert_eq!(worn_payload["data"]["entry"]["item_ids"], serde_json::json!([1001, 1004, 1007]));

        let ranked = rank::run(rank::RankArgs {
            occasion: "work".to_string(),
            weather: "warm".to_string(),
            user: 1,
        });
        assert_eq!(ranked.exit_code, 0, "expected rank success: {}", ranked.output);

        let payload = parse_payload(&ranked.output);
        let items = payload["data"]["items"].as_array().expect("ranked items");
        assert_eq!(items.len(), 12);
        for item in items {
            let id = item["item_id"].as_i64().expect("item id");
            if [1001, 1004, 1007].contains(&id) {
                assert_eq!(item["exclusion"], "recently_worn", "item {id} should be blocked");
            }
        }
    });
}

#[test]
fn wear_rejects_malformed_item_list() {
    with_database(|| {
        let result = wear::run(wear::WearArgs {
            items: "1001,shirt".to_string(),
            occasion: None,
            weather: None,
            outfit: None,
            user: 1,
        });
        assert_eq!(result.exit_code, 7);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_request");
    });
}

#[test]
fn save_persists_named_outfit() {
    with_database(|| {
        assert_eq!(seed::run().exit_code, 0);

        let result = save::run(save::SaveArgs {
            name: "Weekend".to_string(),
            items: "1003,1006,1007".to_string(),
            occasion: Some("casual".to_string()),
            weather: Some(" ".to_string()),
            user: 1,
        });
        assert_eq!(result.exit_code, 0, "expected save success: {}", result.output);

        let payload = parse_payload(&result.output);
        assert!(payload["data"]["outfit_id"].as_i64().is_some_and(|id| id > 0));
        assert!(payload["message"].as_str().is_some_and(|message| message.contains("Weekend")));
    });
}

#[test]
fn rank_rejects_blank_weather() {
    with_database(|| {
        let result =
            rank::run(rank::RankArgs { occasion: "work".to_string(), weather: String::new(), user: 1 });
        assert_eq!(result.exit_code, 7);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_request");
    });
}

#[test]
fn doctor_reports_pass_after_migrate() {
    with_database(|| {
        assert_eq!(migrate::run().exit_code, 0);

        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected doctor pass: {}", result.output);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass");
        let names = report["checks"]
            .as_array()
            .expect("checks")
            .iter()
            .filter_map(|check| check["name"].as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            ["config_validation", "recommendation_settings", "database_connectivity", "wardrobe_schema"]
        );
    });
}

#[test]
fn doctor_skips_database_checks_when_config_invalid() {
    with_env(&[("WARDROBE_RECOMMENDATION_MAX_CONFIDENCE", "100")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 6);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][3]["status"], "skipped");
    });
}

fn suggest_args(occasion: &str, weather: &str, seed: Option<u64>) -> suggest::SuggestArgs {
    suggest::SuggestArgs {
        occasion: occasion.to_string(),
        weather: weather.to_string(),
        user: 1,
        seed,
        save_as: None,
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

/// Runs `test_fn` against a fresh file-backed database.
fn with_database(test_fn: impl FnOnce()) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("wardrobe.db").display());
    with_env(&[("WARDROBE_DATABASE_URL", url.as_str())], test_fn);
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "WARDROBE_DATABASE_URL",
        "WARDROBE_DATABASE_MAX_CONNECTIONS",
        "WARDROBE_DATABASE_TIMEOUT_SECS",
        "WARDROBE_RECOMMENDATION_RECENT_WINDOW_DAYS",
        "WARDROBE_RECOMMENDATION_POINTS_PER_SLOT",
        "WARDROBE_RECOMMENDATION_MATCH_BONUS",
        "WARDROBE_RECOMMENDATION_JITTER_CEILING",
        "WARDROBE_RECOMMENDATION_MAX_CONFIDENCE",
        "WARDROBE_RECOMMENDATION_SHORTLIST_SIZE",
        "WARDROBE_LOGGING_LEVEL",
        "WARDROBE_LOGGING_FORMAT",
        "WARDROBE_LOG_LEVEL",
        "WARDROBE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
