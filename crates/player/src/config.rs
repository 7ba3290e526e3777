//! Client configuration loaded from the environment.
//!
//! - `ROSHAMBO_SERVER_URL` - base WebSocket URL rooms are joined under
//!   (default: `ws://localhost:8000/ws`)
//!
//! A `.env.local` or `.env` file in the working directory is read first;
//! variables already set in the process environment win.

use url::Url;

pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8000/ws";
pub const SERVER_URL_ENV: &str = "ROSHAMBO_SERVER_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Server URL must use ws or wss, got '{scheme}'")]
    UnsupportedScheme { scheme: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Room URLs are `<server_url>/<room_code>`
    pub server_url: Url,
}

impl ClientConfig {
    pub fn new(server_url: &str) -> Result<Self, ConfigError> {
        let trimmed = server_url.trim();
        let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
            value: trimmed.to_string(),
            source,
        })?;

        match url.scheme() {
            "ws" | "wss" => Ok(Self { server_url: url }),
            other => Err(ConfigError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }

    /// Build from a variable lookup; unset or blank values use the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(SERVER_URL_ENV).filter(|v| !v.trim().is_empty()) {
            Some(value) => Self::new(&value),
            None => Self::new(DEFAULT_SERVER_URL),
        }
    }

    /// Load `.env` files, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

fn load_dotenv() {
    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = std::path::Path::new(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(path) {
                tracing::warn!(file = filename, error = %e, "Failed to load env file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn default_points_at_local_server() {
        let config = ClientConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config.server_url.as_str(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn blank_variable_uses_default() {
        let config = ClientConfig::from_lookup(lookup(&[(SERVER_URL_ENV, "  ")])).expect("config");
        assert_eq!(config.server_url.as_str(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn variable_overrides_default() {
        let config =
            ClientConfig::from_lookup(lookup(&[(SERVER_URL_ENV, "wss://play.example.com/rooms")]))
                .expect("config");
        assert_eq!(config.server_url.as_str(), "wss://play.example.com/rooms");
    }

    #[test]
    fn rejects_non_websocket_scheme() {
        let err = ClientConfig::new("http://localhost:8000/ws").expect_err("http rejected");
        assert!(matches!(err, ConfigError::UnsupportedScheme { ref scheme } if scheme == "http"));
    }

    #[test]
    fn rejects_unparseable_url() {
        let err = ClientConfig::new("not a url").expect_err("rejected");
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
