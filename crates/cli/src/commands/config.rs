use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;
use wardrobe_core::config::{AppConfig, LoadOptions};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let file = ConfigFile { doc: config_file_doc.as_ref(), path: config_file_path.as_deref() };

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, env_keys, value) in effective_values(&config) {
        lines.push(render_line(key_path, &value, file.source(key_path, env_keys)));
    }

    lines.join("\n")
}

type EffectiveValue = (&'static str, &'static [&'static str], String);

fn row(
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
) -> EffectiveValue {
    (key_path, env_keys, value)
}

/// Every setting with the env vars that can set it, in lookup order.
fn effective_values(config: &AppConfig) -> Vec<EffectiveValue> {
    let database = &config.database;
    let recommendation = &config.recommendation;
    vec![
        row("database.url", &["WARDROBE_DATABASE_URL"], database.url.clone()),
        row(
            "database.max_connections",
            &["WARDROBE_DATABASE_MAX_CONNECTIONS"],
            database.max_connections.to_string(),
        ),
        row(
            "database.timeout_secs",
            &["WARDROBE_DATABASE_TIMEOUT_SECS"],
            database.timeout_secs.to_string(),
        ),
        row(
            "recommendation.recent_window_days",
            &["WARDROBE_RECOMMENDATION_RECENT_WINDOW_DAYS"],
            recommendation.recent_window_days.to_string(),
        ),
        row(
            "recommendation.points_per_slot",
            &["WARDROBE_RECOMMENDATION_POINTS_PER_SLOT"],
            recommendation.points_per_slot.to_string(),
        ),
        row(
            "recommendation.match_bonus",
            &["WARDROBE_RECOMMENDATION_MATCH_BONUS"],
            recommendation.match_bonus.to_string(),
        ),
        row(
            "recommendation.jitter_ceiling",
            &["WARDROBE_RECOMMENDATION_JITTER_CEILING"],
            recommendation.jitter_ceiling.to_string(),
        ),
        row(
            "recommendation.max_confidence",
            &["WARDROBE_RECOMMENDATION_MAX_CONFIDENCE"],
            recommendation.max_confidence.to_string(),
        ),
        row(
            "recommendation.shortlist_size",
            &["WARDROBE_RECOMMENDATION_SHORTLIST_SIZE"],
            recommendation.shortlist_size.to_string(),
        ),
        row(
            "logging.level",
            &["WARDROBE_LOGGING_LEVEL", "WARDROBE_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        row(
            "logging.format",
            &["WARDROBE_LOGGING_FORMAT", "WARDROBE_LOG_FORMAT"],
            format!("{:?}", config.logging.format).to_lowercase(),
        ),
    ]
}

struct ConfigFile<'a> {
    doc: Option<&'a Value>,
    path: Option<&'a Path>,
}

impl ConfigFile<'_> {
    fn source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if self.doc.is_some_and(|doc| contains_path(doc, key_path)) {
            let file_path = self
                .path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }

        "default".to_string()
    }
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("wardrobe.toml"), PathBuf::from("config/wardrobe.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use toml::Value;
    use wardrobe_core::config::AppConfig;

    use super::{contains_path, effective_values, ConfigFile};

    #[test]
    fn nested_keys_are_found_in_file_document() {
        let doc: Value = "[recommendation]\nshortlist_size = 5\n".parse().expect("toml");

        assert!(contains_path(&doc, "recommendation.shortlist_size"));
        assert!(!contains_path(&doc, "recommendation.match_bonus"));
        assert!(!contains_path(&doc, "database.url"));
    }

    #[test]
    fn file_source_names_the_path_and_defaults_otherwise() {
        let doc: Value = "[logging]\nlevel = \"debug\"\n".parse().expect("toml");
        let file = ConfigFile { doc: Some(&doc), path: Some(Path::new("wardrobe.toml")) };

        assert_eq!(
            file.source("logging.level", &["WARDROBE_TEST_UNSET_LEVEL"]),
            "file (wardrobe.toml)"
        );
        assert_eq!(file.source("logging.format", &["WARDROBE_TEST_UNSET_FORMAT"]), "default");
    }

    #[test]
    fn every_section_is_reported() {
        let values = effective_values(&AppConfig::default());
        let keys = values.iter().map(|(key, _, _)| *key).collect::<Vec<_>>();

        assert!(keys.contains(&"database.url"));
        assert!(keys.contains(&"recommendation.recent_window_days"));
        assert!(keys.contains(&"logging.format"));
        assert!(values.iter().any(|(key, _, value)| *key == "logging.format" && value == "compact"));
    }
}
