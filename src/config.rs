use crate::cli::Cli;
use crate::services::api::{ApiClientConfig, ApiError};
use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// How resource documents are obtained. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// Documents compiled into the binary.
    Packaged,
    /// Documents fetched from `base_url`.
    Network,
}

impl LoadStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadStrategy::Packaged => "packaged",
            LoadStrategy::Network => "network",
        }
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub application_name: String,
    pub strategy: LoadStrategy,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub theme_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_name: "homedash".to_string(),
            strategy: LoadStrategy::Network,
            base_url: "http://localhost:8080/".to_string(),
            request_timeout_secs: 15,
            theme_file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppConfig {
    pub fn load(cli: &Cli) -> Result<Self, AppConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("application_name", defaults.application_name.clone())?
            .set_default("strategy", defaults.strategy.as_str())?
            .set_default("base_url", defaults.base_url.clone())?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?;

        if let Some(profile) = &cli.profile {
            let profile_file_name = format!("homedash.{profile}.toml");
            if let Some(path) = Self::profile_path(&profile_file_name) {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        if let Some(config_path) = &cli.config {
            builder = builder.add_source(File::from(config_path.clone()).required(true));
        } else if let Some(path) = Self::default_config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("HOMEDASH").separator("__"));

        builder = builder
            .set_override_option(
                "strategy",
                cli.strategy.map(|strategy| LoadStrategy::from(strategy).as_str()),
            )?
            .set_override_option("base_url", cli.base_url.clone())?;

        let built = builder.build()?;
        Ok(built.try_deserialize::<AppConfig>()?)
    }

    pub fn api_client_config(&self) -> Result<ApiClientConfig, ApiError> {
        Ok(ApiClientConfig::try_from_url(&self.base_url)?
            .with_timeout(Duration::from_secs(self.request_timeout_secs)))
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("lan", "homedash", "homedash")
            .map(|dirs| dirs.config_dir().join("homedash.toml"))
    }

    fn profile_path(file_name: &str) -> Option<PathBuf> {
        ProjectDirs::from("lan", "homedash", "homedash")
            .map(|dirs| dirs.config_dir().join(file_name))
    }
}
