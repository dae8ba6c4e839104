use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty or missing `config.toml` still
/// yields a runnable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

/// Where the restaurant dataset lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Path to the restaurant CSV, relative to the working directory.
    pub source: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: PathBuf::from("data/skycity_restaurants.csv"),
        }
    }
}

/// Bind address for the JSON API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Presentation parameters of the dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// How many restaurants the strategic risk panel lists.
    pub top_risk_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self { top_risk_limit: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "skycity.log".to_string(),
        }
    }
}
