//! Bot configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;

/// Main bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub platform: PlatformConfig,
    pub commands: CommandConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Chat platform credentials and endpoints
#[derive(Clone, Deserialize)]
pub struct PlatformConfig {
    /// Bot token, sent as `Authorization: Bot <token>`
    pub token: String,
    pub application_id: u64,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

// Keep the token out of logs
impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("api_base_url", &self.api_base_url)
            .field("gateway_url", &self.gateway_url)
            .finish()
    }
}

/// Text command settings
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

// Default value functions
fn default_app_name() -> String {
    "counter-bot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_api_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_prefix() -> String {
    "!".to_string()
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let prefix = lookup("COMMAND_PREFIX").unwrap_or_else(default_prefix);
        if prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "COMMAND_PREFIX",
                "prefix must not be blank".to_string(),
            ));
        }

        let application_id = required("APPLICATION_ID")?;
        let application_id = application_id
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("APPLICATION_ID", application_id))?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: lookup("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            platform: PlatformConfig {
                token: required("BOT_TOKEN")?,
                application_id,
                api_base_url: lookup("API_BASE_URL")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_api_base_url),
                gateway_url: lookup("GATEWAY_URL").unwrap_or_else(default_gateway_url),
            },
            commands: CommandConfig { prefix },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/counter"),
        ("BOT_TOKEN", "secret-token"),
        ("APPLICATION_ID", "1234567890"),
    ];

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_defaults_applied() {
        let config = BotConfig::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.app.name, "counter-bot");
        assert_eq!(config.app.env, Environment::Development);
        assert_eq!(config.commands.prefix, "!");
        assert_eq!(config.platform.application_id, 1234567890);
        assert_eq!(config.platform.api_base_url, "https://discord.com/api/v10");
        assert!(config.platform.gateway_url.starts_with("wss://"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.min_connections, 1);
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend_from_slice(&[
            ("APP_ENV", "Production"),
            ("COMMAND_PREFIX", "c!"),
            ("API_BASE_URL", "http://localhost:8080/api/v1/"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]);
        let config = BotConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(config.app.env.is_production());
        assert_eq!(config.commands.prefix, "c!");
        assert_eq!(config.platform.api_base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.database.max_connections, 12);
    }

    #[test]
    fn test_missing_required() {
        let err = BotConfig::from_lookup(lookup_from(&REQUIRED[1..])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));

        let err = BotConfig::from_lookup(lookup_from(&REQUIRED[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("APPLICATION_ID")));
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = REQUIRED.to_vec();
        // Later pairs win when collected into the lookup map
        pairs.push(("APPLICATION_ID", "not-a-number"));
        let err = BotConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("APPLICATION_ID", _)));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("COMMAND_PREFIX", "  "));
        let err = BotConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("COMMAND_PREFIX", _)));
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let config = BotConfig::from_lookup(lookup_from(REQUIRED)).unwrap();
        let debug = format!("{:?}", config.platform);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
