//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;
pub mod mentor_list;
pub mod settings;


use std::error::Error;

use clap::{Parser, Subcommand};

use crate::cli::ask::run_ask;
use crate::cli::mentor_list::list_mentors;
use crate::cli::settings::{set_setting, unset_setting, update_config_file};
use crate::core::config::data::ENDPOINT_ENV_VAR;
use crate::core::config::{path_display, Config, ConfigError, ResolvedSettings};
use crate::core::fan_out::FanOutMode;
use crate::ui::chat_loop::run_chat;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "tribe", version, long_version = LONG_VERSION)]
#[command(about = "Consult a tribe of AI mentors side by side")]
#[command(
    long_about = "Tribe is a full-screen terminal client for putting one question to several \
persona-based mentors at once and following each mentor's thread separately.\n\n\
Environment Variables:\n\
  TRIBE_ENDPOINT    Completion endpoint base address (default http://localhost:8000)\n\
  TRIBE_LOG         Log filter directives (falls back to RUST_LOG, then info)\n\n\
Controls:\n\
  Type              Compose your question or follow-up\n\
  Tab/Left/Right    Move through the mentor gallery\n\
  Space             Select or deselect the focused mentor\n\
  Enter             Consult the selected mentors / send a follow-up\n\
  Alt+Enter         Insert a new line\n\
  Ctrl+N or Esc     Start a new consultation\n\
  Ctrl+Up/Down      Switch between recent chats\n\
  PageUp/PageDown   Scroll the transcript\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Completion endpoint base address (overrides TRIBE_ENDPOINT and the config file)
    #[arg(short = 'e', long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// How completions are issued: sequential or concurrent
    #[arg(long, global = true, value_name = "MODE")]
    pub fan_out: Option<FanOutMode>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive consultation interface (default)
    Chat,
    /// List the available mentors
    Mentors,
    /// Ask one or more mentors a question without the full-screen interface
    Ask {
        /// Mentor id to consult; repeat to consult several
        #[arg(short = 'm', long = "mentor", value_name = "MENTOR", required = true)]
        mentors: Vec<String>,
        /// The question to ask
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
    },
    /// Show the config file location, its values and the effective settings
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let Args {
        command,
        endpoint,
        log,
        fan_out,
    } = Args::parse();

    match command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let settings = resolve_settings(endpoint.as_deref(), log.as_deref(), fan_out)?;
            run_chat(settings).await
        }
        Commands::Mentors => list_mentors(),
        Commands::Ask { mentors, question } => {
            let settings = resolve_settings(endpoint.as_deref(), log.as_deref(), fan_out)?;
            run_ask(mentors, question, settings).await
        }
        Commands::Config => {
            let config = Config::load()?;
            println!("Config file: {}", path_display(Config::config_path()?));
            config.print_all();
            println!();
            let settings = resolve_settings(endpoint.as_deref(), log.as_deref(), fan_out)?;
            settings.print_all();
            Ok(())
        }
        Commands::Set { key, value } => {
            if value.is_empty() {
                Config::load()?.print_all();
                return Ok(());
            }
            report(update_config_file(|config| set_setting(config, &key, &value)))
        }
        Commands::Unset { key } => report(update_config_file(|config| unset_setting(config, &key))),
    }
}

fn resolve_settings(
    endpoint: Option<&str>,
    log: Option<&str>,
    fan_out: Option<FanOutMode>,
) -> Result<ResolvedSettings, ConfigError> {
    let config = Config::load()?;
    let env_endpoint = std::env::var(ENDPOINT_ENV_VAR).ok();
    Ok(config.resolve(endpoint, env_endpoint.as_deref(), log, fan_out))
}

fn report(result: Result<String, settings::SettingError>) -> Result<(), Box<dyn Error>> {
    match result {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}
