//! Diagnostic logging setup
//!
//! The interactive UI owns the terminal, so its logs go to a file; without
//! one, nothing is installed and `tracing` macros are no-ops. The headless
//! `ask` command logs warnings to stderr.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Checked first, then `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "TRIBE_LOG";

const FILE_DEFAULT_DIRECTIVE: &str = "info";
const STDERR_DEFAULT_DIRECTIVE: &str = "warn";

/// Build the filter from `TRIBE_LOG`, then `RUST_LOG`, then `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    let directive = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok();
    filter_from(directive.as_deref(), default)
}

fn filter_from(directive: Option<&str>, default: &str) -> EnvFilter {
    directive
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Append log lines to `path`, creating it if needed.
pub fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(FILE_DEFAULT_DIRECTIVE))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| e as Box<dyn Error>)?;
    Ok(())
}

pub fn init_stderr_logging() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(STDERR_DEFAULT_DIRECTIVE))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| e as Box<dyn Error>)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_for_missing_or_invalid_directives() {
        assert_eq!(filter_from(None, "info").to_string(), "info");
        assert_eq!(filter_from(Some("   "), "warn").to_string(), "warn");
        assert_eq!(filter_from(Some("tribe=loud"), "info").to_string(), "info");
    }

    #[test]
    fn keeps_valid_directives() {
        assert_eq!(
            filter_from(Some("tribe=debug"), "info").to_string(),
            "tribe=debug"
        );
    }
}
