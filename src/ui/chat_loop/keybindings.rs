//! Key routing for the chat loop
//!
//! Keys are resolved against the visible screen into [`AppAction`]s; the
//! loop applies them through the reducer like any other action.

use crate::core::app::{App, AppAction, Screen};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Lines moved per PageUp/PageDown.
pub const PAGE_SCROLL_LINES: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Composer,
    Gallery,
    Transcript,
}

impl KeyContext {
    pub fn from_app(app: &App) -> Self {
        match app.screen() {
            Screen::Transcript(_) => KeyContext::Transcript,
            Screen::Home if app.ui.gallery_focused => KeyContext::Gallery,
            Screen::Home => KeyContext::Composer,
        }
    }

    fn is_home(self) -> bool {
        matches!(self, KeyContext::Composer | KeyContext::Gallery)
    }
}

#[derive(Debug)]
pub enum KeyResult {
    Handled(Vec<AppAction>),
    NotHandled,
}

pub fn map_key_event(key: &KeyEvent, context: KeyContext) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let action = match key.code {
        KeyCode::Char('c') if ctrl => AppAction::Quit,
        KeyCode::Char('n') if ctrl => AppAction::NewSession,
        KeyCode::Up if ctrl => AppAction::SelectAdjacentSession { delta: -1 },
        KeyCode::Down if ctrl => AppAction::SelectAdjacentSession { delta: 1 },

        KeyCode::Esc => match context {
            KeyContext::Transcript => AppAction::NewSession,
            KeyContext::Gallery => AppAction::FocusComposer,
            KeyContext::Composer => AppAction::ClearStatus,
        },

        KeyCode::Enter if alt => AppAction::InsertIntoInput {
            text: "\n".to_string(),
        },
        KeyCode::Enter if context.is_home() => AppAction::SubmitQuestion,
        KeyCode::Enter => AppAction::SubmitFollowUp,

        KeyCode::Tab | KeyCode::Right if context.is_home() => {
            AppAction::MovePickerCursor { delta: 1 }
        }
        KeyCode::BackTab | KeyCode::Left if context.is_home() => {
            AppAction::MovePickerCursor { delta: -1 }
        }
        KeyCode::Char(' ') if context == KeyContext::Gallery => AppAction::ToggleMentorAtCursor,

        KeyCode::PageUp if context == KeyContext::Transcript => AppAction::ScrollTranscript {
            lines: PAGE_SCROLL_LINES,
        },
        KeyCode::PageDown if context == KeyContext::Transcript => AppAction::ScrollTranscript {
            lines: -PAGE_SCROLL_LINES,
        },

        KeyCode::Backspace => AppAction::InputBackspace,
        KeyCode::Char(c) if !ctrl => AppAction::InsertIntoInput {
            text: c.to_string(),
        },

        _ => return KeyResult::NotHandled,
    };

    KeyResult::Handled(vec![action])
}
