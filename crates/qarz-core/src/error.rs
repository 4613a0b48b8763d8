//! Error types for Qarz

use std::path::PathBuf;

/// Qarz error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Unknown priority: {0}")]
    UnknownPriority(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Database error: {0}")]
    DbError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Result type alias for Qarz
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn db<S: Into<String>>(msg: S) -> Self {
        Error::DbError(msg.into())
    }
}
