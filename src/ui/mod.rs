//! Terminal UI layer for interactive consultations.
//!
//! - [`chat_loop`]: the interaction loop that turns key presses into
//!   [`crate::core::app::AppAction`]s and runs fan-outs in the background.
//! - [`renderer`]: home screen, mentor gallery, transcript and sidebar.
//! - [`theme`]: color and style policy.
//!
//! This layer presents and captures interaction state; [`crate::core`] owns
//! the chat state and the completion client.

pub mod chat_loop;
pub mod renderer;
pub mod theme;
