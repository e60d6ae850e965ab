use std::env;

use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::SecurityHeaders;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got '{0}'")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when unset or blank. The server still starts without it.
    pub queue_connection_string: Option<String>,
    pub port: u16,
    pub production: bool,
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let queue_connection_string = lookup("QUEUE_CONNECTION_STRING")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let port = match lookup("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => DEFAULT_PORT,
        };

        let production = lookup("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());

        Ok(Self {
            queue_connection_string,
            port,
            production,
            cors_allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert!(config.queue_connection_string.is_none());
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.production);
        assert_eq!(config.cors_allowed_origins, DEFAULT_ALLOWED_ORIGINS);
    }

    #[test]
    fn test_blank_connection_string_is_unset() {
        let config = config_from(&[("QUEUE_CONNECTION_STRING", "   ")]).unwrap();
        assert!(config.queue_connection_string.is_none());

        let config = config_from(&[("QUEUE_CONNECTION_STRING", " Region=us-east-1 ")]).unwrap();
        assert_eq!(
            config.queue_connection_string.as_deref(),
            Some("Region=us-east-1")
        );
    }

    #[test]
    fn test_production_and_port() {
        let config = config_from(&[("RUST_ENV", "Production"), ("PORT", "8080")]).unwrap();

        assert!(config.production);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port_rejected() {
        for port in ["abc", "0", "70000"] {
            assert!(matches!(
                config_from(&[("PORT", port)]),
                Err(ConfigError::InvalidPort(_))
            ));
        }
    }
}
