//! Settings management for CLI set/unset commands.
//!
//! Every key maps to one field of [`Config`]; parsing and validation live on
//! [`Config::set_value`], this module only turns the outcome into messages.

pub mod error;

pub use error::SettingError;

use crate::core::config::{Config, ConfigKey};

fn parse_key(key: &str) -> Result<ConfigKey, SettingError> {
    ConfigKey::parse(key).ok_or_else(|| SettingError::UnknownKey(key.to_string()))
}

/// Apply `tribe set <key> <args...>` to `config`.
///
/// Multi-word values are joined with spaces.
pub fn set_setting(config: &mut Config, key: &str, args: &[String]) -> Result<String, SettingError> {
    let key = parse_key(key)?;
    let value = args.join(" ");
    config
        .set_value(key, &value)
        .map_err(|message| SettingError::InvalidValue { key, message })?;
    Ok(format!("✅ Set {} to: {}", key.as_str(), value.trim()))
}

pub fn unset_setting(config: &mut Config, key: &str) -> Result<String, SettingError> {
    let key = parse_key(key)?;
    config.unset_value(key);
    Ok(format!("✅ Unset {}", key.as_str()))
}

/// Load, modify and save the user's config file.
pub fn update_config_file(
    update: impl FnOnce(&mut Config) -> Result<String, SettingError>,
) -> Result<String, SettingError> {
    let mut config = Config::load().map_err(|e| SettingError::ConfigError(e.to_string()))?;
    let message = update(&mut config)?;
    config
        .save()
        .map_err(|e| SettingError::ConfigError(e.to_string()))?;
    Ok(message)
}
