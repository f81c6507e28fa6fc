pub mod commands;

use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wardrobe_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use wardrobe_core::DEMO_USER_ID;

use crate::commands::{daily, rank, save, suggest, wear, CommandResult};

#[derive(Debug, Parser)]
#[command(
    name = "wardrobe",
    about = "Wardrobe outfit recommendation CLI",
    long_about = "Suggest outfits from a stored wardrobe, log what was worn, and operate the local database.",
    after_help = "Examples:\n  wardrobe seed\n  wardrobe suggest --occasion work --weather cold\n  wardrobe daily --weather rainy --seed 7\n  wardrobe wear --items 1001,1004,1007"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the demo wardrobe for the demo user and verify it")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, recommendation tunables, and database readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Suggest an outfit for an occasion and weather")]
    Suggest {
        #[arg(long)]
        occasion: String,
        #[arg(long)]
        weather: String,
        #[arg(long, default_value_t = DEMO_USER_ID.0)]
        user: i64,
        #[arg(long, help = "Seed the random pick for reproducible output")]
        seed: Option<u64>,
        #[arg(long, value_name = "NAME", help = "Save the suggestion as a named outfit")]
        save_as: Option<String>,
    },
    #[command(about = "Build a complete daily outfit (top, bottom and shoes) for the weather")]
    Daily {
        #[arg(long)]
        weather: String,
        #[arg(long)]
        occasion: Option<String>,
        #[arg(long, default_value_t = DEMO_USER_ID.0)]
        user: i64,
        #[arg(long)]
        seed: Option<u64>,
    },
    #[command(about = "Show every item's score and filter verdict")]
    Rank {
        #[arg(long)]
        occasion: String,
        #[arg(long)]
        weather: String,
        #[arg(long, default_value_t = DEMO_USER_ID.0)]
        user: i64,
    },
    #[command(about = "Record an outfit as worn today")]
    Wear {
        #[arg(long, value_name = "IDS", help = "Comma-separated item ids")]
        items: String,
        #[arg(long)]
        occasion: Option<String>,
        #[arg(long)]
        weather: Option<String>,
        #[arg(long, value_name = "ID")]
        outfit: Option<i64>,
        #[arg(long, default_value_t = DEMO_USER_ID.0)]
        user: i64,
    },
    #[command(about = "Save a named outfit from a list of items")]
    Save {
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "IDS", help = "Comma-separated item ids")]
        items: String,
        #[arg(long)]
        occasion: Option<String>,
        #[arg(long)]
        weather: Option<String>,
        #[arg(long, default_value_t = DEMO_USER_ID.0)]
        user: i64,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let logging = AppConfig::load(LoadOptions::default())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    if let Err(error) = init_logging(&logging) {
        eprintln!("logging disabled: {error:#}");
    }

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => CommandResult { exit_code: 0, output: commands::config::run() },
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Suggest { occasion, weather, user, seed, save_as } => {
            suggest::run(suggest::SuggestArgs { occasion, weather, user, seed, save_as })
        }
        Command::Daily { weather, occasion, user, seed } => {
            daily::run(daily::DailyArgs { weather, occasion, user, seed })
        }
        Command::Rank { occasion, weather, user } => {
            rank::run(rank::RankArgs { occasion, weather, user })
        }
        Command::Wear { items, occasion, weather, outfit, user } => {
            wear::run(wear::WearArgs { items, occasion, weather, outfit, user })
        }
        Command::Save { name, items, occasion, weather, user } => {
            save::run(save::SaveArgs { name, items, occasion, weather, user })
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Events go to stderr so stdout carries only the JSON result.
fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("invalid log level `{}`", config.level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|error| anyhow!(error))
}
