use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::mentors::Mentor;

/// Sender sentinel stored for user-authored messages.
pub const USER_SENDER: &str = "user";
/// Display name shown for user-authored messages.
pub const USER_DISPLAY_NAME: &str = "You";

/// Per-session message identifier, assigned in append order.
pub type MessageId = u64;

/// Who wrote a message: the user, or a mentor referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sender {
    User,
    Mentor(String),
}

impl Sender {
    pub fn as_str(&self) -> &str {
        match self {
            Sender::User => USER_SENDER,
            Sender::Mentor(id) => id,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Sender::User)
    }

    pub fn mentor_id(&self) -> Option<&str> {
        match self {
            Sender::User => None,
            Sender::Mentor(id) => Some(id),
        }
    }

    /// Role used on the wire when replaying history to a mentor.
    pub fn to_api_role(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Mentor(_) => "assistant",
        }
    }
}

impl From<String> for Sender {
    fn from(value: String) -> Self {
        if value == USER_SENDER {
            Sender::User
        } else {
            Sender::Mentor(value)
        }
    }
}

impl From<&str> for Sender {
    fn from(value: &str) -> Self {
        Sender::from(value.to_string())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        match value {
            Sender::User => USER_SENDER.to_string(),
            Sender::Mentor(id) => id,
        }
    }
}

/// An immutable transcript entry inside a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub sender_name: String,
    pub content: String,
    pub timestamp: DateTime<Local>,
    pub avatar: Option<String>,
}

impl Message {
    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    /// True when this message belongs to the private dialogue between the user
    /// and `mentor_id`.
    pub fn is_visible_to(&self, mentor_id: &str) -> bool {
        match &self.sender {
            Sender::User => true,
            Sender::Mentor(id) => id == mentor_id,
        }
    }
}

/// Message contents before the owning session assigns an id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub sender: Sender,
    pub sender_name: String,
    pub content: String,
    pub avatar: Option<String>,
}

impl MessageDraft {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            sender_name: USER_DISPLAY_NAME.to_string(),
            content: content.into(),
            avatar: None,
        }
    }

    pub fn mentor(mentor: &Mentor, content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Mentor(mentor.id.clone()),
            sender_name: mentor.name.clone(),
            content: content.into(),
            avatar: Some(mentor.avatar.clone()),
        }
    }

    pub(crate) fn into_message(self, id: MessageId, timestamp: DateTime<Local>) -> Message {
        Message {
            id,
            sender: self.sender,
            sender_name: self.sender_name,
            content: self.content,
            timestamp,
            avatar: self.avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mentors::MentorRegistry;

    #[test]
    fn user_sentinel_round_trips_through_strings() {
        assert_eq!(Sender::from("user"), Sender::User);
        assert_eq!(
            Sender::from("growth-optimizer"),
            Sender::Mentor("growth-optimizer".into())
        );
        assert_eq!(String::from(Sender::User), "user");
    }

    #[test]
    fn api_roles_map_mentors_to_assistant() {
        assert_eq!(Sender::User.to_api_role(), "user");
        assert_eq!(Sender::Mentor("x".into()).to_api_role(), "assistant");
    }

    #[test]
    fn mentor_draft_copies_profile_fields() {
        let registry = MentorRegistry::builtin();
        let mentor = registry.find_mentor("growth-optimizer").unwrap();
        let draft = MessageDraft::mentor(mentor, "Measure first.");
        assert_eq!(draft.sender.mentor_id(), Some("growth-optimizer"));
        assert_eq!(draft.sender_name, "Sarah Thompson");
        assert_eq!(draft.avatar.as_deref(), Some("🚀"));
    }

    #[test]
    fn visibility_excludes_other_mentors() {
        let now = Local::now();
        let user = MessageDraft::user("hi").into_message(1, now);
        let other = MessageDraft {
            sender: Sender::Mentor("b".into()),
            sender_name: "B".into(),
            content: "reply".into(),
            avatar: None,
        }
        .into_message(2, now);

        assert!(user.is_visible_to("a"));
        assert!(!other.is_visible_to("a"));
        assert!(other.is_visible_to("b"));
    }

    #[test]
    fn sender_serializes_as_plain_string() {
        let json = serde_json::to_string(&Sender::Mentor("technical-architect".into())).unwrap();
        assert_eq!(json, "\"technical-architect\"");
        let back: Sender = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(back, Sender::User);
    }
}
