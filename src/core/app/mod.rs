//! Application state container
//!
//! [`App`] holds everything the presentation layer reads: the mentor
//! registry, the chat store, the gallery selection, draft text and status.
//! It is only mutated through [`apply_action`], which returns any side
//! effect (a fan-out to run) as an [`AppCommand`] for the caller to execute.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::core::fan_out::MentorOrder;
use crate::core::mentors::MentorRegistry;
use crate::core::session::{ChatSession, SessionId};
use crate::core::store::ChatStore;

pub mod actions;
pub mod picker;


pub use actions::{apply_action, apply_actions, AppAction, AppCommand};
pub use picker::MentorPicker;

/// Which main view is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Composer and mentor gallery.
    Home,
    /// Transcript of the active session.
    Transcript(SessionId),
}

#[derive(Debug, Default)]
pub struct UiState {
    /// Question being composed on the home screen.
    pub draft: String,
    /// Follow-up being typed under the transcript.
    pub follow_up: String,
    /// Home screen keys go to the mentor gallery instead of the composer.
    pub gallery_focused: bool,
    pub status: Option<String>,
    /// Lines scrolled up from the bottom of the transcript; 0 follows new
    /// messages.
    pub transcript_scroll: u16,
    pub exit_requested: bool,
}

#[derive(Debug)]
pub struct App {
    pub registry: MentorRegistry,
    pub store: ChatStore,
    pub picker: MentorPicker,
    pub ui: UiState,
    pub mentor_order: MentorOrder,
    /// Outstanding fan-outs per session.
    pending: HashMap<SessionId, usize>,
}

impl App {
    pub fn new(registry: MentorRegistry, mentor_order: MentorOrder) -> Self {
        Self {
            registry,
            store: ChatStore::new(),
            picker: MentorPicker::new(),
            ui: UiState::default(),
            mentor_order,
            pending: HashMap::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        match self.store.active_id() {
            Some(id) => Screen::Transcript(id),
            None => Screen::Home,
        }
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        self.store.active_session()
    }

    /// True while any completion for a submission on `session_id` is
    /// outstanding.
    pub fn is_thinking(&self, session_id: SessionId) -> bool {
        self.pending.get(&session_id).copied().unwrap_or(0) > 0
    }

    pub fn has_pending_work(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Whether the home composer would accept a submission right now.
    pub fn can_submit_question(&self) -> bool {
        !self.ui.draft.trim().is_empty() && !self.picker.is_empty()
    }

    /// Whether the follow-up input would accept a submission right now.
    pub fn can_submit_follow_up(&self) -> bool {
        match self.store.active_id() {
            Some(id) => !self.ui.follow_up.trim().is_empty() && !self.is_thinking(id),
            None => false,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.ui.status = Some(message.into());
    }

    pub(crate) fn begin_fan_out(&mut self, session_id: SessionId) {
        *self.pending.entry(session_id).or_insert(0) += 1;
    }

    pub(crate) fn finish_fan_out(&mut self, session_id: SessionId) {
        if let Some(count) = self.pending.get_mut(&session_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.pending.remove(&session_id);
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(MentorRegistry::builtin(), MentorOrder::default())
    }
}

/// Shared handle to the app state used by the event loop and background
/// fan-out tasks. The lock is never held across network I/O.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(app: App) -> Self {
        Self {
            inner: Arc::new(Mutex::new(app)),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, App> {
        self.inner.lock().await
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
