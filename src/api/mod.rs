//! Wire payloads exchanged with the mentor completion endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub mentor_id: String,
    pub mentor_name: String,
    pub question: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    #[serde(default)]
    pub mentor_id: Option<String>,
    #[serde(default)]
    pub mentor_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_snake_case_field_names() {
        let request = CompletionRequest {
            mentor_id: "technical-architect".into(),
            mentor_name: "Marcus Chen".into(),
            question: "How do I scale?".into(),
            conversation_history: vec![HistoryEntry {
                role: "user".into(),
                content: "Earlier question".into(),
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "mentor_id": "technical-architect",
                "mentor_name": "Marcus Chen",
                "question": "How do I scale?",
                "conversation_history": [
                    {"role": "user", "content": "Earlier question"}
                ]
            })
        );
    }

    #[test]
    fn response_tolerates_echoed_mentor_fields() {
        let parsed: CompletionResponse = serde_json::from_value(json!({
            "mentor_id": "growth-optimizer",
            "mentor_name": "Sarah Thompson",
            "content": "Ship, then measure."
        }))
        .unwrap();
        assert_eq!(parsed.content, "Ship, then measure.");
        assert_eq!(parsed.mentor_id.as_deref(), Some("growth-optimizer"));

        let bare: CompletionResponse = serde_json::from_value(json!({"content": "ok"})).unwrap();
        assert!(bare.mentor_name.is_none());
    }
}
