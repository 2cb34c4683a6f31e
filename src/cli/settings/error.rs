//! Error types for settings operations.

use std::fmt;

use crate::core::config::ConfigKey;

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, PartialEq)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The value was rejected by the key's parser.
    InvalidValue { key: ConfigKey, message: String },
    /// An error occurred while persisting the configuration.
    ConfigError(String),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                let keys: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
                eprintln!("   Valid keys: {}", keys.join(", "));
            }
            SettingError::InvalidValue { key, message } => {
                eprintln!("❌ Invalid value for {}: {message}", key.as_str());
            }
            SettingError::ConfigError(msg) => {
                eprintln!("❌ Failed to save configuration: {msg}");
            }
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::InvalidValue { key, message } => {
                write!(f, "Invalid value for {}: {message}", key.as_str())
            }
            SettingError::ConfigError(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for SettingError {}
