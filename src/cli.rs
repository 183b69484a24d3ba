use crate::config::LoadStrategy;
use crate::services::ThemeMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command line interface for homedash.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "homedash",
    author,
    version,
    about = "Loads the data behind a self-hosted start page"
)]
pub struct Cli {
    /// Optional path to a configuration file (TOML, YAML, JSON).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Named profile to load (e.g. dev, staging, prod).
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Where resource documents come from. Overrides the configuration.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Dashboard root serving `/data/*.json`. Overrides the configuration.
    #[arg(long)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load every resource once and print the dashboard state as JSON.
    Snapshot,
    /// Reload on an interval and log a summary of each cycle.
    Watch {
        /// Seconds between reloads (minimum 5).
        #[arg(short, long, default_value_t = 30)]
        interval: u64,
    },
    /// Read or change the persisted theme.
    Theme {
        #[command(subcommand)]
        action: ThemeCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
    /// Print the theme stored for a mode.
    Get {
        #[arg(short, long, value_enum)]
        mode: ThemeModeArg,
    },
    /// Store one of the loaded themes for a mode.
    Set {
        #[arg(short, long, value_enum)]
        mode: ThemeModeArg,
        /// The `value` of the theme in `themes.json`.
        #[arg(short, long)]
        value: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Packaged,
    Network,
}

impl From<StrategyArg> for LoadStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Packaged => LoadStrategy::Packaged,
            StrategyArg::Network => LoadStrategy::Network,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeModeArg {
    Light,
    Dark,
}

impl From<ThemeModeArg> for ThemeMode {
    fn from(value: ThemeModeArg) -> Self {
        match value {
            ThemeModeArg::Light => ThemeMode::Light,
            ThemeModeArg::Dark => ThemeMode::Dark,
        }
    }
}
