//! In-memory chat store
//!
//! Owns every [`ChatSession`] for the lifetime of the process and the pointer
//! to the one currently displayed. The active view is always resolved through
//! the store so there is exactly one copy of each session. Appends address a
//! session by id, never through the active pointer, so replies that land
//! after the user navigates away still reach their own thread.

use thiserror::Error;
use tracing::debug;

use crate::core::message::{MessageDraft, MessageId};
use crate::core::session::{ChatSession, FailedReply, SessionId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("select at least one mentor")]
    NoMentors,
    #[error("unknown chat session {0}")]
    UnknownSession(SessionId),
}

#[derive(Debug, Default)]
pub struct ChatStore {
    /// Most recent first.
    sessions: Vec<ChatSession>,
    active: Option<SessionId>,
    next_session_id: u64,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for `question`, make it active and put it at the top
    /// of the history list.
    pub fn create_session(
        &mut self,
        question: &str,
        mentor_ids: Vec<String>,
    ) -> Result<SessionId, StoreError> {
        if question.trim().is_empty() {
            return Err(StoreError::EmptyQuestion);
        }
        if mentor_ids.is_empty() {
            return Err(StoreError::NoMentors);
        }

        self.next_session_id += 1;
        let id = SessionId(self.next_session_id);
        let session = ChatSession::new(id, question, mentor_ids);
        debug!(session = %id, title = %session.title, "created chat session");

        self.sessions.insert(0, session);
        self.active = Some(id);
        Ok(id)
    }

    pub fn append_message(
        &mut self,
        session_id: SessionId,
        message: MessageDraft,
    ) -> Result<MessageId, StoreError> {
        let session = self
            .session_mut(session_id)
            .ok_or(StoreError::UnknownSession(session_id))?;
        let message_id = session.push(message);
        debug!(
            session = %session_id,
            message_id,
            count = session.message_count(),
            "appended message"
        );
        Ok(message_id)
    }

    pub fn record_failure(
        &mut self,
        session_id: SessionId,
        failure: FailedReply,
    ) -> Result<(), StoreError> {
        let session = self
            .session_mut(session_id)
            .ok_or(StoreError::UnknownSession(session_id))?;
        session.push_failure(failure);
        Ok(())
    }

    pub fn set_active(&mut self, session_id: Option<SessionId>) -> Result<(), StoreError> {
        if let Some(id) = session_id {
            if self.session(id).is_none() {
                return Err(StoreError::UnknownSession(id));
            }
        }
        self.active = session_id;
        Ok(())
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active.and_then(|id| self.session(id))
    }

    pub fn session(&self, session_id: SessionId) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    fn session_mut(&mut self, session_id: SessionId) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == session_id)
    }

    /// Sessions, most recent first.
    pub fn list_sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Index of the active session within [`Self::list_sessions`].
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active?;
        self.sessions.iter().position(|s| s.id == active)
    }
}
