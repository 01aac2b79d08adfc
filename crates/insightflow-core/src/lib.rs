use thiserror::Error;

mod app_config;
mod config;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};

/// Errors produced while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
