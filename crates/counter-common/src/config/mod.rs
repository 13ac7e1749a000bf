//! Configuration structs

mod app_config;

pub use app_config::{
    AppSettings, BotConfig, CommandConfig, ConfigError, DatabaseConfig, Environment,
    PlatformConfig,
};
