use serde::Serialize;

use crate::commands::CommandResult;
use wardrobe_core::config::{AppConfig, LoadOptions};
use wardrobe_db::connect_with_settings;
use wardrobe_db::repositories::SqlItemCatalog;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str, reason: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    fn from_checks(checks: Vec<DoctorCheck>) -> Self {
        let healthy = checks.iter().all(|check| check.status == CheckStatus::Pass);
        let (overall_status, summary) = if healthy {
            (CheckStatus::Pass, "doctor: wardrobe is ready")
        } else {
            (CheckStatus::Fail, "doctor: one or more readiness checks failed")
        };
        Self { overall_status, summary: summary.to_string(), checks }
    }

    fn render_human(&self) -> String {
        let mut lines = vec![self.summary.clone()];
        lines.extend(self.checks.iter().map(|check| {
            let marker = match check.status {
                CheckStatus::Pass => "ok",
                CheckStatus::Fail => "fail",
                CheckStatus::Skipped => "skip",
            };
            format!("- [{marker}] {}: {}", check.name, check.details)
        }));
        lines.join("\n")
    }
}

/// Exit code is 6 when any check does not pass.
pub fn run(json_output: bool) -> CommandResult {
    let report = DoctorReport::from_checks(collect_checks());
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 6 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
    } else {
        report.render_human()
    };

    CommandResult { exit_code, output }
}

fn collect_checks() -> Vec<DoctorCheck> {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            let reason = "configuration did not load";
            return vec![
                DoctorCheck::fail("config_validation", error.to_string()),
                DoctorCheck::skipped("recommendation_settings", reason),
                DoctorCheck::skipped("database_connectivity", reason),
                DoctorCheck::skipped("wardrobe_schema", reason),
            ];
        }
    };

    let mut checks = vec![
        DoctorCheck::pass("config_validation", "configuration loaded and validated"),
        recommendation_settings(&config),
    ];
    checks.extend(database_checks(&config));
    checks
}

fn recommendation_settings(config: &AppConfig) -> DoctorCheck {
    let settings = &config.recommendation;
    // Four filled slots, each matching weather and occasion.
    let uncapped_best = settings
        .points_per_slot
        .saturating_mul(4)
        .saturating_add(settings.match_bonus.saturating_mul(8));
    DoctorCheck::pass(
        "recommendation_settings",
        format!(
            "recently worn window {} days, shortlist {}, confidence capped at {} (uncapped best case {})",
            settings.recent_window_days, settings.shortlist_size, settings.max_confidence, uncapped_best
        ),
    )
}

fn database_checks(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![
                DoctorCheck::fail(
                    "database_connectivity",
                    format!("failed to initialize async runtime: {error}"),
                ),
                DoctorCheck::skipped("wardrobe_schema", "the runtime did not start"),
            ];
        }
    };

    runtime.block_on(async {
        let database = &config.database;
        let pool = match connect_with_settings(
            &database.url,
            database.max_connections,
            database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck::fail(
                        "database_connectivity",
                        format!("failed to connect to database: {error}"),
                    ),
                    DoctorCheck::skipped("wardrobe_schema", "the database is unreachable"),
                ];
            }
        };

        let schema = match SqlItemCatalog::new(pool.clone()).count_all().await {
            Ok(count) => DoctorCheck::pass(
                "wardrobe_schema",
                format!("clothing_items table present with {count} rows"),
            ),
            Err(error) => {
                DoctorCheck::fail("wardrobe_schema", format!("{error}; run `wardrobe migrate`"))
            }
        };
        pool.close().await;

        let connectivity =
            DoctorCheck::pass("database_connectivity", format!("connected using `{}`", database.url));
        vec![connectivity, schema]
    })
}

#[cfg(test)]
mod tests {
    use super::{CheckStatus, DoctorCheck, DoctorReport};

    #[test]
    fn any_skipped_check_fails_the_report() {
        let report = DoctorReport::from_checks(vec![
            DoctorCheck::pass("config_validation", "ok"),
            DoctorCheck::skipped("wardrobe_schema", "the database is unreachable"),
        ]);

        assert_eq!(report.overall_status, CheckStatus::Fail);
        assert_eq!(
            report.render_human().lines().last(),
            Some("- [skip] wardrobe_schema: skipped because the database is unreachable")
        );
    }
}
