pub mod config;
pub mod daily;
pub mod doctor;
pub mod migrate;
pub mod rank;
pub mod save;
pub mod seed;
pub mod suggest;
pub mod wear;

use std::future::Future;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use wardrobe_core::config::{AppConfig, LoadOptions};
use wardrobe_core::errors::{ApplicationError, DomainError};
use wardrobe_core::recommend::{EngineSettings, OutfitEngine};
use wardrobe_core::ItemId;
use wardrobe_db::repositories::RepositoryError;
use wardrobe_db::{connect_with_settings, migrations, DbPool};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

/// `(error_class, message, exit_code)` raised inside a command body.
pub(crate) type CommandError = (&'static str, String, u8);

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::ok(command, message.into(), None)
    }

    pub fn success_with_data(command: &str, message: impl Into<String>, data: Value) -> Self {
        Self::ok(command, message.into(), Some(data))
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    fn ok(command: &str, message: String, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message,
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    fn from_error(command: &str, (error_class, message, exit_code): CommandError) -> Self {
        Self::failure(command, error_class, message, exit_code)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

/// Connects, applies pending migrations, runs `work`, then closes the pool.
pub(crate) fn with_pool<T, F, Fut>(
    command: &str,
    config: &AppConfig,
    work: F,
) -> Result<T, CommandResult>
where
    F: FnOnce(DbPool) -> Fut,
    Fut: Future<Output = Result<T, CommandError>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(
        |error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        },
    )?;

    debug!(event_name = "wardrobe.cli.command.started", command, "running command");

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        if let Err(error) = migrations::run_pending(&pool).await {
            pool.close().await;
            return Err(("migration", error.to_string(), 5u8));
        }

        let outcome = work(pool.clone()).await;
        pool.close().await;
        outcome
    });

    result.map_err(|error| {
        warn!(
            event_name = "wardrobe.cli.command.failed",
            command,
            error_class = error.0,
            exit_code = error.2,
            "command failed"
        );
        CommandResult::from_error(command, error)
    })
}

pub(crate) fn application_error(error: ApplicationError) -> CommandError {
    match error {
        ApplicationError::Domain(DomainError::InvalidRequest(message)) => {
            ("invalid_request", message, 7)
        }
        ApplicationError::Domain(
            error @ (DomainError::EmptyWardrobe | DomainError::IncompleteOutfit { .. }),
        ) => ("incomplete_outfit", error.to_string(), 8),
        ApplicationError::Domain(DomainError::InvariantViolation(message)) => {
            ("invariant_violation", message, 9)
        }
        ApplicationError::Persistence(message) => ("persistence", message, 5),
        ApplicationError::Configuration(message) => ("config_validation", message, 2),
    }
}

pub(crate) fn repository_error(error: RepositoryError) -> CommandError {
    application_error(ApplicationError::from(error))
}

pub(crate) fn invalid_request(message: impl Into<String>) -> CommandError {
    ("invalid_request", message.into(), 7)
}

pub(crate) fn engine_for(config: &AppConfig) -> OutfitEngine {
    OutfitEngine::with_settings(EngineSettings::from(&config.recommendation))
}

pub(crate) fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Parses `1001, 1004,1007` into item ids.
pub(crate) fn parse_item_ids(raw: &str) -> Result<Vec<ItemId>, CommandError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map(ItemId)
                .map_err(|_| invalid_request(format!("`{part}` is not a valid item id")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(invalid_request("at least one item id is required"));
    }
    Ok(ids)
}

/// Blank optional tags are treated as absent.
pub(crate) fn optional_tag(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
