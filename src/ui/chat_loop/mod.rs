//! Main chat event loop
//!
//! Owns the terminal for the duration of an interactive session, routes
//! key presses into the app reducer and redraws when state changes.

mod event_loop;
mod keybindings;
mod lifecycle;

pub use event_loop::run_chat;
