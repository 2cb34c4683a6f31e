use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::completion::DEFAULT_ENDPOINT;
use crate::core::fan_out::{FanOutMode, MentorOrder};

/// Environment variable overriding the completion endpoint.
pub const ENDPOINT_ENV_VAR: &str = "TRIBE_ENDPOINT";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base address of the mentor completion endpoint
    pub endpoint: Option<String>,
    /// How completions for one submission are issued
    pub fan_out: Option<FanOutMode>,
    /// Order mentors are consulted in
    pub mentor_order: Option<MentorOrder>,
    /// Per-request timeout; transport defaults apply when unset
    pub request_timeout_secs: Option<u64>,
    /// Where the interactive UI writes its diagnostic log
    pub log_file: Option<String>,
}

/// Keys accepted by `tribe set` / `tribe unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Endpoint,
    FanOut,
    MentorOrder,
    RequestTimeout,
    LogFile,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::Endpoint,
        ConfigKey::FanOut,
        ConfigKey::MentorOrder,
        ConfigKey::RequestTimeout,
        ConfigKey::LogFile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Endpoint => "endpoint",
            ConfigKey::FanOut => "fan-out",
            ConfigKey::MentorOrder => "mentor-order",
            ConfigKey::RequestTimeout => "request-timeout",
            ConfigKey::LogFile => "log-file",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|k| k.as_str() == normalized)
    }
}

/// Settings after applying config file, environment and CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub endpoint: String,
    pub fan_out: FanOutMode,
    pub mentor_order: MentorOrder,
    pub request_timeout: Option<Duration>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {}", key.as_str()));
        }
        match key {
            ConfigKey::Endpoint => self.endpoint = Some(value.to_string()),
            ConfigKey::FanOut => self.fan_out = Some(value.parse()?),
            ConfigKey::MentorOrder => self.mentor_order = Some(value.parse()?),
            ConfigKey::RequestTimeout => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| format!("request-timeout must be whole seconds, got '{value}'"))?;
                if secs == 0 {
                    return Err("request-timeout must be greater than zero".to_string());
                }
                self.request_timeout_secs = Some(secs);
            }
            ConfigKey::LogFile => self.log_file = Some(value.to_string()),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Endpoint => self.endpoint = None,
            ConfigKey::FanOut => self.fan_out = None,
            ConfigKey::MentorOrder => self.mentor_order = None,
            ConfigKey::RequestTimeout => self.request_timeout_secs = None,
            ConfigKey::LogFile => self.log_file = None,
        }
    }

    /// Layer overrides on top of this config: CLI flags win over the
    /// environment, which wins over the file.
    pub fn resolve(
        &self,
        cli_endpoint: Option<&str>,
        env_endpoint: Option<&str>,
        cli_log_file: Option<&str>,
        cli_fan_out: Option<FanOutMode>,
    ) -> ResolvedSettings {
        let endpoint = cli_endpoint
            .or(env_endpoint)
            .or(self.endpoint.as_deref())
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string();

        ResolvedSettings {
            endpoint,
            fan_out: cli_fan_out.or(self.fan_out).unwrap_or_default(),
            mentor_order: self.mentor_order.unwrap_or_default(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            log_file: cli_log_file
                .or(self.log_file.as_deref())
                .map(PathBuf::from),
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
