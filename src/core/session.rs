use chrono::{DateTime, Local};

use crate::api::HistoryEntry;
use crate::core::message::{Message, MessageDraft, MessageId};

/// Titles longer than this many characters are truncated.
pub const TITLE_MAX_CHARS: usize = 50;
pub const TITLE_ELLIPSIS: &str = "...";

/// Process-unique session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mentor whose completion failed for one submission. Kept out of the
/// message sequence; the transcript shows it as a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedReply {
    pub mentor_id: String,
    pub mentor_name: String,
    pub error: String,
    pub timestamp: DateTime<Local>,
    /// Number of messages in the session when the failure was recorded.
    pub after_message_count: usize,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: SessionId,
    pub title: String,
    pub question: String,
    pub selected_mentors: Vec<String>,
    pub created_at: DateTime<Local>,
    messages: Vec<Message>,
    failed_replies: Vec<FailedReply>,
    next_message_id: MessageId,
}

/// Derive a session title from the question text.
pub fn derive_title(question: &str) -> String {
    let trimmed = question.trim();
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        return trimmed.to_string();
    }
    let mut title: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
    title.push_str(TITLE_ELLIPSIS);
    title
}

impl ChatSession {
    /// Build a session whose transcript starts with the user's question.
    pub(crate) fn new(id: SessionId, question: &str, selected_mentors: Vec<String>) -> Self {
        let question = question.trim().to_string();
        let created_at = Local::now();
        let mut session = Self {
            id,
            title: derive_title(&question),
            question: question.clone(),
            selected_mentors,
            created_at,
            messages: Vec::new(),
            failed_replies: Vec::new(),
            next_message_id: 1,
        };
        session.push(MessageDraft::user(question));
        session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn failed_replies(&self) -> &[FailedReply] {
        &self.failed_replies
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub(crate) fn push(&mut self, draft: MessageDraft) -> MessageId {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(draft.into_message(id, Local::now()));
        id
    }

    pub(crate) fn push_failure(&mut self, failure: FailedReply) {
        self.failed_replies.push(failure);
    }

    /// The private dialogue between the user and one mentor, as replayed to
    /// that mentor. Other mentors' replies are never included.
    pub fn history_for(&self, mentor_id: &str) -> Vec<HistoryEntry> {
        self.history_before(mentor_id, self.messages.len())
    }

    /// Like [`Self::history_for`], restricted to the first `end` messages.
    pub fn history_before(&self, mentor_id: &str, end: usize) -> Vec<HistoryEntry> {
        self.messages[..end.min(self.messages.len())]
            .iter()
            .filter(|m| m.is_visible_to(mentor_id))
            .map(|m| HistoryEntry {
                role: m.sender.to_api_role().to_string(),
                content: m.content.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Sender;

    fn mentor_draft(id: &str, content: &str) -> MessageDraft {
        MessageDraft {
            sender: Sender::Mentor(id.to_string()),
            sender_name: id.to_uppercase(),
            content: content.to_string(),
            avatar: None,
        }
    }

    #[test]
    fn short_titles_are_kept_verbatim() {
        assert_eq!(derive_title("How do I scale?"), "How do I scale?");
        let exactly_fifty = "a".repeat(50);
        assert_eq!(derive_title(&exactly_fifty), exactly_fifty);
    }

    #[test]
    fn long_titles_are_truncated_with_ellipsis() {
        let question = "b".repeat(51);
        let title = derive_title(&question);
        assert_eq!(title, format!("{}...", "b".repeat(50)));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let question = "é".repeat(60);
        let title = derive_title(&question);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn title_ignores_surrounding_whitespace() {
        let padded = format!("   {}   ", "c".repeat(50));
        assert_eq!(derive_title(&padded), "c".repeat(50));
    }

    #[test]
    fn new_session_starts_with_user_message() {
        let session = ChatSession::new(SessionId(1), "  Hello there  ", vec!["a".into()]);
        assert_eq!(session.question, "Hello there");
        assert_eq!(session.message_count(), 1);
        let first = &session.messages()[0];
        assert!(first.is_user());
        assert_eq!(first.sender_name, "You");
        assert_eq!(first.content, "Hello there");
    }

    #[test]
    fn message_ids_increase_in_append_order() {
        let mut session = ChatSession::new(SessionId(1), "q", vec!["a".into()]);
        let a = session.push(mentor_draft("a", "one"));
        let b = session.push(MessageDraft::user("two"));
        assert!(a < b);
        let ids: Vec<_> = session.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn history_contains_only_user_and_target_mentor() {
        let mut session = ChatSession::new(SessionId(1), "q1", vec!["a".into(), "b".into()]);
        session.push(mentor_draft("a", "a1"));
        session.push(mentor_draft("b", "b1"));
        session.push(MessageDraft::user("q2"));
        session.push(mentor_draft("b", "b2"));

        let history = session.history_for("a");
        let pairs: Vec<(&str, &str)> = history
            .iter()
            .map(|h| (h.role.as_str(), h.content.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("user", "q1"), ("assistant", "a1"), ("user", "q2")]
        );

        let history_b = session.history_for("b");
        assert!(history_b.iter().all(|h| h.content != "a1"));
        assert_eq!(history_b.len(), 4);
    }
}
