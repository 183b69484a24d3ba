use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use homedash::cli::{Cli, Command, ThemeCommand};
use homedash::config::AppConfig;
use homedash::services::{FileThemeStore, ResourceLoader, ThemeMode, ThemeStore};
use homedash::DashboardStore;
use std::panic;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::time::{self, Instant};

fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        eprintln!("homedash panic: {info}");
        if let Some(location) = info.location() {
            eprintln!(
                "  at {}:{}",
                location.file(),
                location.line()
            );
        }
    }));

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("hyper", log::LevelFilter::Warn)
        .filter_module("reqwest", log::LevelFilter::Warn)
        .init();

    let cli = Cli::parse();
    let settings = AppConfig::load(&cli)?;
    let command = cli.command.clone().unwrap_or(Command::Snapshot);

    let runtime = Runtime::new().context("Starting tokio runtime")?;
    runtime.block_on(handle_command(command, settings))
}

async fn handle_command(command: Command, settings: AppConfig) -> Result<()> {
    match command {
        Command::Snapshot => print_snapshot(&settings).await,
        Command::Watch { interval } => watch(&settings, interval).await,
        Command::Theme { action } => handle_theme(action, &settings).await,
    }
}

fn build_loader(settings: &AppConfig) -> Result<ResourceLoader> {
    ResourceLoader::from_config(settings)
        .with_context(|| format!("Preparing {} loader", settings.strategy))
}

fn theme_store(settings: &AppConfig) -> Result<FileThemeStore> {
    match &settings.theme_file {
        Some(path) => Ok(FileThemeStore::new(path.clone())),
        None => FileThemeStore::with_default_location().context("Locating theme storage"),
    }
}

async fn print_snapshot(settings: &AppConfig) -> Result<()> {
    let store = DashboardStore::new(build_loader(settings)?);
    let state = store.wait_for_generation(1).await;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

async fn watch(settings: &AppConfig, interval_secs: u64) -> Result<()> {
    let period = Duration::from_secs(interval_secs.max(5));
    let store = DashboardStore::new(build_loader(settings)?);

    let state = store.wait_for_generation(1).await;
    log::info!("{}", state.summary());

    let mut ticker = time::interval_at(Instant::now() + period, period);
    log::info!(
        "{} refreshing every {}s, press Ctrl-C to stop",
        settings.application_name,
        period.as_secs()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = store.refresh().await;
                log::info!("{}", state.summary());
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Listening for Ctrl-C")?;
                break;
            }
        }
    }
    Ok(())
}

async fn handle_theme(action: ThemeCommand, settings: &AppConfig) -> Result<()> {
    let themes = theme_store(settings)?;
    match action {
        ThemeCommand::Get { mode } => {
            let mode = ThemeMode::from(mode);
            let theme = themes.get_theme(mode);
            println!("{}", serde_json::to_string_pretty(&theme)?);
        }
        ThemeCommand::Set { mode, value } => {
            let mode = ThemeMode::from(mode);
            let store = DashboardStore::new(build_loader(settings)?);
            let state = store.wait_for_generation(1).await;

            if let Some(error) = state.theme_data.error() {
                bail!("Themes are unavailable: {error}");
            }
            let theme = state
                .theme_data
                .payload()
                .find(value)
                .cloned()
                .ok_or_else(|| anyhow!("No theme with value {value}"))?;

            themes
                .set_theme(mode, &theme)
                .with_context(|| format!("Storing {mode} theme in {}", themes.path().display()))?;
            println!(
                "{mode} theme set to {} ({}). Reload the dashboard to apply it.",
                theme.label, theme.value
            );
        }
    }
    Ok(())
}
