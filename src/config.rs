//! # Server Configuration
//!
//! Settings for the listener and for token issuance. Values are layered:
//! built-in defaults, then an optional TOML file, then environment variables.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [auth]
//! secret_key = "lab-secret"
//! token_lifetime_hours = 1
//! ```
//!
//! ## Environment overrides
//!
//! | Variable               | Field                       |
//! |------------------------|-----------------------------|
//! | `SECRET_KEY`           | `auth.secret_key`           |
//! | `JWT_EXPIRATION_HOURS` | `auth.token_lifetime_hours` |
//! | `HOST`                 | `server.host`               |
//! | `PORT`                 | `server.port`               |
//!
//! The defaults are deliberately insecure; this service is a training target.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration, built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Token signing settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    #[serde(default = "default_token_lifetime_hours")]
    pub token_lifetime_hours: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            token_lifetime_hours: default_token_lifetime_hours(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_secret_key() -> String {
    "super-secret-key-change-in-production".to_string()
}

fn default_token_lifetime_hours() -> u32 {
    24
}

impl Config {
    /// Apply overrides from a variable lookup. `apply_env` passes `std::env::var`;
    /// tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("SECRET_KEY") {
            self.auth.secret_key = secret;
        }
        if let Some(hours) = lookup("JWT_EXPIRATION_HOURS") {
            self.auth.token_lifetime_hours =
                hours.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                    field: "JWT_EXPIRATION_HOURS",
                    reason: format!("{e}"),
                })?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                field: "PORT",
                reason: format!("{e}"),
            })?;
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "auth.secret_key",
                reason: "must not be empty".to_string(),
            });
        }
        if self.auth.token_lifetime_hours == 0 {
            return Err(ConfigError::Invalid {
                field: "auth.token_lifetime_hours",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Token lifetime in seconds.
    pub fn token_lifetime_secs(&self) -> i64 {
        i64::from(self.auth.token_lifetime_hours) * 3600
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Read a TOML config file. Missing sections fall back to defaults.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                Err(ConfigError::Toml(e))
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            Err(ConfigError::Io(e))
        }
    }
}

/// Full startup resolution: defaults, optional file, then environment.
pub fn resolve(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.secret_key, "super-secret-key-change-in-production");
        assert_eq!(config.auth.token_lifetime_hours, 24);
        assert_eq!(config.token_lifetime_secs(), 86_400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_success() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("authlab.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "[auth]\nsecret_key = 'from-file'\ntoken_lifetime_hours = 2").unwrap();
        file.flush().unwrap();
        let config = load_config(file_path.to_str().unwrap()).unwrap();
        assert_eq!(config.auth.secret_key, "from-file");
        assert_eq!(config.auth.token_lifetime_hours, 2);
        // Defaults for missing sections
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/authlab.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_bad_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        std::fs::write(&file_path, "[server\nport = ").unwrap();
        let result = load_config(file_path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let toml_str = "[server]\nhost = '10.0.0.1'\nport = 7000\n[auth]\nsecret_key = 'file'";
        let mut config: Config = toml::from_str(toml_str).unwrap();
        config
            .apply_overrides(lookup_from(&[
                ("SECRET_KEY", "env"),
                ("HOST", "127.0.0.1"),
                ("PORT", "9000"),
                ("JWT_EXPIRATION_HOURS", "3"),
            ]))
            .unwrap();
        assert_eq!(config.auth.secret_key, "env");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.token_lifetime_hours, 3);
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_file_values_survive_without_overrides() {
        let toml_str = "[server]\nhost = '10.0.0.1'\nport = 7000";
        let mut config: Config = toml::from_str(toml_str).unwrap();
        config.apply_overrides(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr(), "10.0.0.1:7000");
    }

    #[test]
    fn test_bad_port_override_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup_from(&[("PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "PORT", .. }));
    }

    #[test]
    fn test_bad_lifetime_override_is_rejected() {
        let mut config = Config::default();
        for hours in ["24h", "-1", ""] {
            let err = config
                .apply_overrides(lookup_from(&[("JWT_EXPIRATION_HOURS", hours)]))
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid {
                    field: "JWT_EXPIRATION_HOURS",
                    ..
                }
            ));
        }
        assert_eq!(config.auth.token_lifetime_hours, 24);
    }

    #[test]
    fn test_validate_rejects_empty_secret_and_zero_lifetime() {
        let mut config = Config::default();
        config.auth.secret_key.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.token_lifetime_hours = 0;
        assert!(config.validate().is_err());
    }
}
