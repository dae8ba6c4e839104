use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DashboardSettings, DataSettings, LoggingSettings, ServerSettings};

/// Prefix of environment overrides, e.g. `SKYCITY__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "SKYCITY";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at `path`
/// (skipped if it does not exist), then `SKYCITY__*` environment variables.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(
        path = %path.display(),
        source = %config.data.source.display(),
        "Configuration loaded."
    );
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.source.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.source must not be empty".to_string(),
        ));
    }
    if config.server.host.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "server.host must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl ServerSettings {
    /// Parses `host:port` into a socket address.
    pub fn address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ConfigError::ValidationError(format!(
                    "invalid server address '{}:{}': {e}",
                    self.host, self.port
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.dashboard.top_risk_limit, 10);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[data]\nsource = \"fixtures/precinct.csv\"\n\n[server]\nport = 8088\n\n[dashboard]\ntop_risk_limit = 5"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.data.source, Path::new("fixtures/precinct.csv"));
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.dashboard.top_risk_limit, 5);
    }

    #[test]
    fn empty_source_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[data]\nsource = \"\"").unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn server_address_parses() {
        let server = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 4000,
        };
        assert_eq!(server.address().unwrap().port(), 4000);

        let bad = ServerSettings {
            host: "not a host".to_string(),
            port: 4000,
        };
        assert!(bad.address().is_err());
    }
}
