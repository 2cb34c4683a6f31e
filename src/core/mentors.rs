//! Built-in mentor registry
//!
//! Mentor profiles are loaded from the builtin_mentors.toml file embedded at
//! build time. The set is fixed for the lifetime of the process.

use serde::{Deserialize, Serialize};

/// Color tag attached to a mentor profile. The UI maps it to a terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorColor {
    Purple,
    Blue,
    Green,
    Orange,
    Red,
    Teal,
    #[default]
    Gray,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mentor {
    pub id: String,
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub avatar: String,
    #[serde(default)]
    pub color: MentorColor,
}

impl Mentor {
    /// First name, used in compact headers. Honorifics such as "Dr." are
    /// skipped.
    pub fn short_name(&self) -> &str {
        self.name
            .split_whitespace()
            .find(|word| !word.ends_with('.'))
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
struct BuiltinMentorsConfig {
    mentors: Vec<Mentor>,
}

#[derive(Debug, Clone)]
pub struct MentorRegistry {
    mentors: Vec<Mentor>,
}

impl MentorRegistry {
    /// Load the mentors embedded in the binary
    pub fn builtin() -> Self {
        const CONFIG_CONTENT: &str = include_str!("../builtin_mentors.toml");

        let config: BuiltinMentorsConfig =
            toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_mentors.toml");

        Self::from_mentors(config.mentors)
    }

    pub fn from_mentors(mentors: Vec<Mentor>) -> Self {
        Self { mentors }
    }

    pub fn list_mentors(&self) -> &[Mentor] {
        &self.mentors
    }

    pub fn find_mentor(&self, id: &str) -> Option<&Mentor> {
        self.mentors.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.mentors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentors.is_empty()
    }

    /// Return the known ids among `ids`, reordered to match registry order.
    pub fn order_ids(&self, ids: &[String]) -> Vec<String> {
        self.mentors
            .iter()
            .filter(|m| ids.contains(&m.id))
            .map(|m| m.id.clone())
            .collect()
    }
}

impl Default for MentorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_expected_mentors_in_order() {
        let registry = MentorRegistry::builtin();
        let ids: Vec<&str> = registry
            .list_mentors()
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "strategic-visionary",
                "technical-architect",
                "growth-optimizer"
            ]
        );
    }

    #[test]
    fn find_mentor_returns_profile() {
        let registry = MentorRegistry::builtin();
        let mentor = registry
            .find_mentor("technical-architect")
            .expect("mentor should exist");
        assert_eq!(mentor.name, "Marcus Chen");
        assert_eq!(mentor.avatar, "⚡");
        assert_eq!(mentor.color, MentorColor::Blue);
        assert_eq!(mentor.short_name(), "Marcus");
        let mentor = registry.find_mentor("strategic-visionary").unwrap();
        assert_eq!(mentor.short_name(), "Elena");
    }

    #[test]
    fn find_mentor_misses_unknown_ids() {
        let registry = MentorRegistry::builtin();
        assert!(registry.find_mentor("nobody").is_none());
        // Lookups are exact, unlike provider ids.
        assert!(registry.find_mentor("Technical-Architect").is_none());
    }

    #[test]
    fn order_ids_follows_registry_and_drops_unknown() {
        let registry = MentorRegistry::builtin();
        let ordered = registry.order_ids(&[
            "growth-optimizer".to_string(),
            "ghost".to_string(),
            "strategic-visionary".to_string(),
        ]);
        assert_eq!(ordered, vec!["strategic-visionary", "growth-optimizer"]);
    }

    #[test]
    fn missing_color_defaults_to_gray() {
        let parsed: BuiltinMentorsConfig = toml::from_str(
            r#"
            [[mentors]]
            id = "x"
            name = "X"
            title = "t"
            tagline = "g"
            description = "d"
            avatar = "*"
            "#,
        )
        .expect("parse");
        assert_eq!(parsed.mentors[0].color, MentorColor::Gray);
    }
}
