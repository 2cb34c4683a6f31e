//! Tribe is a terminal client for consulting several AI mentors about the
//! same question and following each mentor's answers separately.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the mentor registry, the in-memory chat store, the
//!   completion client and the per-mentor fan-out, plus the app state
//!   reducer that ties them together.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop.
//! - [`api`] defines the completion endpoint's request/response payloads.
//! - [`cli`] parses arguments and dispatches subcommands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
