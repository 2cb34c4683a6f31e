use crate::core::mentors::MentorColor;
use ratatui::style::{Color, Modifier, Style};

/// Avatar shown when a message's sender is not in the registry.
pub const FALLBACK_AVATAR: &str = "🤖";

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub mentor_text_style: Style,
    pub failure_style: Style,
    pub timestamp_style: Style,

    // Chrome
    pub title_style: Style,
    pub thinking_indicator_style: Style,
    pub selected_border_style: Style,
    pub border_style: Style,
    pub sidebar_active_style: Style,
    pub status_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_disabled_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            mentor_text_style: Style::default().fg(Color::White),
            failure_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::ITALIC),
            timestamp_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            thinking_indicator_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
            selected_border_style: Style::default().fg(Color::Yellow),
            border_style: Style::default().fg(Color::DarkGray),
            sidebar_active_style: Style::default().add_modifier(Modifier::REVERSED),
            status_style: Style::default().fg(Color::Gray),

            input_text_style: Style::default().fg(Color::Cyan),
            input_disabled_style: Style::default().fg(Color::DarkGray),
        }
    }

    /// Style for a mentor's name and accents.
    pub fn mentor_style(&self, color: MentorColor) -> Style {
        Style::default()
            .fg(mentor_color(color))
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}

pub fn mentor_color(color: MentorColor) -> Color {
    match color {
        MentorColor::Purple => Color::Magenta,
        MentorColor::Blue => Color::Blue,
        MentorColor::Green => Color::Green,
        MentorColor::Orange => Color::Rgb(0xff, 0x98, 0x00),
        MentorColor::Red => Color::Red,
        MentorColor::Teal => Color::Cyan,
        MentorColor::Gray => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentor_colors_map_to_distinct_terminal_colors() {
        assert_eq!(mentor_color(MentorColor::Purple), Color::Magenta);
        assert_eq!(mentor_color(MentorColor::default()), Color::Gray);
        assert_ne!(
            mentor_color(MentorColor::Blue),
            mentor_color(MentorColor::Green)
        );
    }
}
