use crate::core::app::{App, Screen};
use crate::core::mentors::{Mentor, MentorColor};
use crate::core::message::{Message, USER_DISPLAY_NAME};
use crate::core::session::ChatSession;
use crate::ui::theme::{Theme, FALLBACK_AVATAR};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const THINKING_TEXT: &str = "Mentors are thinking...";
pub const NEW_CONSULTATION_LABEL: &str = "+ New Consultation (Ctrl+N)";

const SIDEBAR_WIDTH: u16 = 32;
const CARD_HEIGHT: u16 = 4;
const MAX_COMPOSER_LINES: u16 = 6;
const MAX_FOLLOW_UP_LINES: u16 = 4;
/// Sidebar rows per session: title, metadata, spacer.
const SIDEBAR_ENTRY_HEIGHT: u16 = 3;

struct ScreenAreas {
    sidebar: Option<Rect>,
    main: Rect,
    status: Rect,
}

fn screen_areas(app: &App, area: Rect) -> ScreenAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    // The sidebar only appears once there is history to show
    if app.store.is_empty() {
        return ScreenAreas {
            sidebar: None,
            main: rows[0],
            status: rows[1],
        };
    }
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(rows[0]);
    ScreenAreas {
        sidebar: Some(cols[0]),
        main: cols[1],
        status: rows[1],
    }
}

struct TranscriptAreas {
    header: Rect,
    body: Rect,
    input: Rect,
}

fn transcript_areas(app: &App, area: Rect) -> TranscriptAreas {
    let input_height = input_height(&app.ui.follow_up, area.width, MAX_FOLLOW_UP_LINES);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(input_height),
        ])
        .split(area);
    TranscriptAreas {
        header: chunks[0],
        body: chunks[1],
        input: chunks[2],
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    let theme = Theme::default();
    let areas = screen_areas(app, f.area());

    if let Some(sidebar) = areas.sidebar {
        render_sidebar(f, app, &theme, sidebar);
    }

    match app.screen() {
        Screen::Transcript(id) => match app.store.session(id) {
            Some(session) => render_transcript(f, app, session, &theme, areas.main),
            None => render_home(f, app, &theme, areas.main),
        },
        Screen::Home => render_home(f, app, &theme, areas.main),
    }

    render_status(f, app, &theme, areas.status);
}

/// Pull `transcript_scroll` back inside the range the active transcript can
/// actually scroll when drawn into `area`.
pub fn clamp_transcript_scroll(app: &mut App, area: Rect) {
    let max_scroll = match app.active_session() {
        Some(session) => {
            let body = transcript_areas(app, screen_areas(app, area).main).body;
            let lines = transcript_lines(app, session, &Theme::default());
            wrapped_height(&lines, body.width).saturating_sub(body.height)
        }
        None => 0,
    };
    app.ui.transcript_scroll = app.ui.transcript_scroll.min(max_scroll);
}

fn render_sidebar(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style)
        .title("Recent Chats");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            NEW_CONSULTATION_LABEL,
            theme.title_style,
        ))),
        chunks[0],
    );

    let list_area = chunks[1];
    let inner_width = list_area.width as usize;
    let active = app.store.active_id();
    let mut lines = Vec::new();

    for session in app.store.list_sessions() {
        let style = if Some(session.id) == active {
            theme.sidebar_active_style.add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let count = session.message_count();
        let meta = format!(
            "{} · {} {}",
            session.created_at.format("%b %d %H:%M"),
            count,
            if count == 1 { "message" } else { "messages" }
        );
        lines.push(Line::from(Span::styled(
            truncate_to_width(&session.title, inner_width),
            style,
        )));
        lines.push(Line::from(Span::styled(
            truncate_to_width(&meta, inner_width),
            theme.timestamp_style,
        )));
        lines.push(Line::from(""));
    }

    let offset = sidebar_scroll(app.store.active_index(), list_area.height);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), list_area);
}

/// Rows to scroll the recent-chats list so the active entry's title and
/// metadata are both visible.
fn sidebar_scroll(active_index: Option<usize>, height: u16) -> u16 {
    let Some(index) = active_index else {
        return 0;
    };
    let rows_needed = (index as u16)
        .saturating_mul(SIDEBAR_ENTRY_HEIGHT)
        .saturating_add(SIDEBAR_ENTRY_HEIGHT - 1);
    rows_needed.saturating_sub(height)
}

fn render_home(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let composer_height = input_height(&app.ui.draft, area.width, MAX_COMPOSER_LINES);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(composer_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let composer_focused = !app.ui.gallery_focused;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if composer_focused {
            theme.selected_border_style
        } else {
            theme.border_style
        })
        .title("What would you like to ask? (Enter to consult, Alt+Enter for new line)");
    render_input(
        f,
        &app.ui.draft,
        block,
        theme.input_text_style,
        composer_focused,
        chunks[0],
    );

    let summary = Paragraph::new(Line::from(Span::styled(
        app.picker.summary(),
        theme.status_style,
    )));
    f.render_widget(summary, chunks[1]);

    render_gallery(f, app, theme, chunks[2]);
}

fn render_gallery(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mentors = app.registry.list_mentors();

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(mentors.iter().map(|_| Constraint::Length(CARD_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let hint = Paragraph::new(Line::from(Span::styled(
        "Choose your mentors (Tab/←/→ to focus, Space to select, Esc back to question)",
        theme.title_style,
    )));
    f.render_widget(hint, chunks[0]);

    for (index, mentor) in mentors.iter().enumerate() {
        let focused = app.ui.gallery_focused && index == app.picker.cursor();
        let card = mentor_card(mentor, app.picker.is_selected(&mentor.id), focused, theme);
        f.render_widget(card, chunks[index + 1]);
    }
}

fn mentor_card<'a>(mentor: &'a Mentor, selected: bool, focused: bool, theme: &Theme) -> Paragraph<'a> {
    let checkbox = if selected { "[x]" } else { "[ ]" };
    let border_style = if focused {
        theme.selected_border_style
    } else {
        theme.border_style
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{checkbox} {} ", mentor.avatar)),
            Span::styled(mentor.name.as_str(), theme.mentor_style(mentor.color)),
            Span::styled(format!("  {}", mentor.title), theme.timestamp_style),
        ]),
        Line::from(Span::styled(
            format!("\"{}\"", mentor.tagline),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    )
}

fn render_transcript(f: &mut Frame, app: &App, session: &ChatSession, theme: &Theme, area: Rect) {
    let areas = transcript_areas(app, area);

    let consulting = session
        .selected_mentors
        .iter()
        .map(|id| {
            app.registry
                .find_mentor(id)
                .map(|m| m.short_name().to_string())
                .unwrap_or_else(|| id.clone())
        })
        .collect::<Vec<_>>()
        .join(", ");
    let header = Paragraph::new(vec![
        Line::from(Span::styled(session.title.as_str(), theme.title_style)),
        Line::from(Span::styled(
            format!("Consulting with: {consulting}"),
            theme.timestamp_style,
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style),
    );
    f.render_widget(header, areas.header);

    let body = areas.body;
    let lines = transcript_lines(app, session, theme);
    let total = wrapped_height(&lines, body.width);
    let max_offset = total.saturating_sub(body.height);
    // transcript_scroll counts up from the bottom
    let scroll_offset = max_offset.saturating_sub(app.ui.transcript_scroll.min(max_offset));
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, body);

    let thinking = app.is_thinking(session.id);
    let (input_title, input_style) = if thinking {
        ("Waiting for mentors...", theme.input_disabled_style)
    } else {
        (
            "Ask a follow-up (Enter to send, Esc for a new consultation)",
            theme.input_text_style,
        )
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style)
        .title(input_title);
    render_input(
        f,
        &app.ui.follow_up,
        block,
        input_style,
        !thinking,
        areas.input,
    );
}

/// Message bubbles in append order, each failure marker placed after the
/// message that preceded it, then the thinking indicator if a fan-out for
/// this session is outstanding.
pub fn transcript_lines(app: &App, session: &ChatSession, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let failures = session.failed_replies();

    for (index, message) in session.messages().iter().enumerate() {
        push_message_lines(&mut lines, app, message, theme);
        for failure in failures
            .iter()
            .filter(|failure| failure.after_message_count == index + 1)
        {
            lines.push(Line::from(Span::styled(
                format!(
                    "⚠ {} could not respond: {}",
                    failure.mentor_name, failure.error
                ),
                theme.failure_style,
            )));
            lines.push(Line::from(""));
        }
    }

    if app.is_thinking(session.id) {
        lines.push(Line::from(Span::styled(
            THINKING_TEXT,
            theme.thinking_indicator_style,
        )));
    }

    lines
}

fn push_message_lines(lines: &mut Vec<Line<'static>>, app: &App, message: &Message, theme: &Theme) {
    let time = message.timestamp.format("%H:%M").to_string();

    if message.is_user() {
        lines.push(
            Line::from(vec![
                Span::styled(format!("{time}  "), theme.timestamp_style),
                Span::styled(USER_DISPLAY_NAME, theme.user_prefix_style),
            ])
            .alignment(Alignment::Right),
        );
        for content_line in message.content.lines() {
            lines.push(
                Line::from(Span::styled(content_line.to_string(), theme.user_text_style))
                    .alignment(Alignment::Right),
            );
        }
    } else {
        let mentor = message
            .sender
            .mentor_id()
            .and_then(|id| app.registry.find_mentor(id));
        let avatar = message
            .avatar
            .clone()
            .or_else(|| mentor.map(|m| m.avatar.clone()))
            .unwrap_or_else(|| FALLBACK_AVATAR.to_string());
        let name_style = theme.mentor_style(mentor.map(|m| m.color).unwrap_or(MentorColor::Gray));

        lines.push(Line::from(vec![
            Span::raw(format!("{avatar} ")),
            Span::styled(message.sender_name.clone(), name_style),
            Span::styled(format!("  {time}"), theme.timestamp_style),
        ]));
        for content_line in message.content.lines() {
            lines.push(Line::from(Span::styled(
                content_line.to_string(),
                theme.mentor_text_style,
            )));
        }
    }

    lines.push(Line::from(""));
}

fn render_status(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let text = match &app.ui.status {
        Some(status) => status.clone(),
        None => match app.screen() {
            Screen::Home => format!(
                "Tribe v{} • Space select • Enter consult • Ctrl+C quit",
                env!("CARGO_PKG_VERSION")
            ),
            Screen::Transcript(_) => {
                "PgUp/PgDn scroll • Ctrl+↑/↓ switch chat • Ctrl+N new • Ctrl+C quit".to_string()
            }
        },
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text, theme.status_style))),
        area,
    );
}

/// Input text broken into rows of at most `width` columns. The cursor sits
/// after the last character.
#[derive(Debug, PartialEq, Eq)]
struct InputLayout {
    rows: Vec<String>,
    cursor_row: u16,
    cursor_col: u16,
}

fn layout_input(text: &str, width: u16) -> InputLayout {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();

    for hard_line in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;
        for ch in hard_line.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if row_width + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(ch);
            row_width += w;
        }
        rows.push(row);
    }

    // A full last row pushes the cursor onto a fresh one.
    let last_width = rows.last().map_or(0, |row| UnicodeWidthStr::width(row.as_str()));
    if last_width >= width {
        rows.push(String::new());
    }

    let cursor_row = rows.len().saturating_sub(1).min(u16::MAX as usize) as u16;
    let cursor_col = rows
        .last()
        .map_or(0, |row| UnicodeWidthStr::width(row.as_str()))
        .min(u16::MAX as usize) as u16;
    InputLayout {
        rows,
        cursor_row,
        cursor_col,
    }
}

/// Outer height of a bordered input box `width` columns wide holding `text`.
fn input_height(text: &str, width: u16, max_lines: u16) -> u16 {
    let rows = layout_input(text, width.saturating_sub(2)).rows.len();
    (rows.min(max_lines as usize) as u16).max(1) + 2
}

/// Draw `text` inside `block`, scrolled so the row holding the cursor stays
/// visible.
fn render_input(
    f: &mut Frame,
    text: &str,
    block: Block<'_>,
    style: Style,
    show_cursor: bool,
    area: Rect,
) {
    let inner = block.inner(area);
    let InputLayout {
        rows,
        cursor_row,
        cursor_col,
    } = layout_input(text, inner.width);
    let scroll = cursor_row.saturating_sub(inner.height.saturating_sub(1));

    let input = Paragraph::new(rows.into_iter().map(Line::from).collect::<Vec<_>>())
        .style(style)
        .block(block)
        .scroll((scroll, 0));
    f.render_widget(input, area);

    if show_cursor && inner.width > 0 && inner.height > 0 {
        let x = cursor_col.min(inner.width - 1);
        let y = (cursor_row - scroll).min(inner.height - 1);
        f.set_cursor_position((inner.x + x, inner.y + y));
    }
}

/// Rows `lines` occupy when wrapped to `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    if width == 0 {
        return lines.len() as u16;
    }
    let width = width as usize;
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction};
    use crate::core::session::SessionId;
    use ratatui::{backend::TestBackend, Terminal};

    const WIDTH: u16 = 110;
    const HEIGHT: u16 = 36;

    fn render_columns(app: &App, columns: std::ops::Range<u16>) -> String {
        let backend = TestBackend::new(WIDTH, HEIGHT);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| ui(f, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in columns.clone() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(app: &App) -> String {
        render_columns(app, 0..WIDTH)
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn submitted_app(mentors: &[&str], question: &str) -> (App, SessionId) {
        let mut app = App::default();
        for id in mentors {
            apply_action(
                &mut app,
                AppAction::ToggleMentor {
                    mentor_id: id.to_string(),
                },
            );
        }
        apply_action(
            &mut app,
            AppAction::InsertIntoInput {
                text: question.to_string(),
            },
        );
        assert!(apply_action(&mut app, AppAction::SubmitQuestion).is_some());
        let id = app.store.active_id().expect("active session");
        (app, id)
    }

    #[test]
    fn home_screen_shows_gallery_without_sidebar() {
        let app = App::default();
        let screen = render(&app);
        assert!(screen.contains("Select at least one mentor below"));
        assert!(screen.contains("Marcus Chen"));
        assert!(screen.contains("Sarah Thompson"));
        assert!(!screen.contains("Recent Chats"));
    }

    #[test]
    fn selected_cards_are_checked() {
        let mut app = App::default();
        apply_action(
            &mut app,
            AppAction::ToggleMentor {
                mentor_id: "technical-architect".into(),
            },
        );
        let screen = render(&app);
        assert!(screen.contains("1 mentor selected"));
        assert!(screen.contains("[x]"));
    }

    #[test]
    fn transcript_shows_thinking_then_failure_marker() {
        let (mut app, id) = submitted_app(&["technical-architect"], "How do I scale?");
        let screen = render(&app);
        assert!(screen.contains(THINKING_TEXT));
        assert!(screen.contains("Consulting with: Marcus"));
        assert!(screen.contains("Recent Chats"));
        assert!(screen.contains("New Consultation"));
        assert!(screen.contains("Waiting for mentors"));

        apply_action(
            &mut app,
            AppAction::MentorFailed {
                session_id: id,
                mentor_id: "technical-architect".into(),
                error: "timed out".into(),
            },
        );
        apply_action(&mut app, AppAction::FanOutFinished { session_id: id });

        let screen = render(&app);
        assert!(!screen.contains(THINKING_TEXT));
        assert!(screen.contains("Marcus Chen could not respond: timed out"));
        assert!(screen.contains("Ask a follow-up"));
    }

    #[test]
    fn failure_markers_follow_the_message_they_trail() {
        let (mut app, id) = submitted_app(
            &["strategic-visionary", "technical-architect"],
            "Where next?",
        );
        apply_action(
            &mut app,
            AppAction::MentorFailed {
                session_id: id,
                mentor_id: "strategic-visionary".into(),
                error: "boom".into(),
            },
        );
        apply_action(
            &mut app,
            AppAction::MentorReplied {
                session_id: id,
                mentor_id: "technical-architect".into(),
                content: "Shard it.".into(),
            },
        );
        apply_action(&mut app, AppAction::FanOutFinished { session_id: id });

        let session = app.store.session(id).unwrap();
        let texts: Vec<String> = transcript_lines(&app, session, &Theme::default())
            .iter()
            .map(line_text)
            .filter(|t| !t.is_empty())
            .collect();

        let question = texts.iter().position(|t| t == "Where next?").unwrap();
        let failure = texts
            .iter()
            .position(|t| t.contains("could not respond"))
            .unwrap();
        let reply = texts.iter().position(|t| t == "Shard it.").unwrap();
        assert!(question < failure && failure < reply);
        assert!(texts[0].ends_with(USER_DISPLAY_NAME));
    }

    #[test]
    fn unknown_sender_uses_fallback_avatar() {
        let (mut app, id) = submitted_app(&["technical-architect"], "q");
        apply_action(
            &mut app,
            AppAction::MentorReplied {
                session_id: id,
                mentor_id: "ghost".into(),
                content: "boo".into(),
            },
        );
        let session = app.store.session(id).unwrap();
        let lines = transcript_lines(&app, session, &Theme::default());
        assert!(lines
            .iter()
            .map(line_text)
            .any(|t| t.starts_with(FALLBACK_AVATAR) && t.contains("ghost")));
    }

    #[test]
    fn long_question_wraps_inside_the_composer() {
        let mut app = App::default();
        let question = format!("{} finale", "x".repeat(193));
        assert_eq!(question.chars().count(), 200);
        apply_action(&mut app, AppAction::InsertIntoInput { text: question });

        let screen = render(&app);
        assert!(screen.contains("finale"));
        assert!(screen.contains(&"x".repeat(108)));
    }

    #[test]
    fn tall_draft_scrolls_to_the_line_being_typed() {
        let mut app = App::default();
        let draft = (0..10)
            .map(|i| format!("draft line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        apply_action(&mut app, AppAction::InsertIntoInput { text: draft });

        let screen = render(&app);
        assert!(screen.contains("draft line 9"));
        assert!(screen.contains("draft line 4"));
        assert!(!screen.contains("draft line 3"));
    }

    #[test]
    fn follow_up_input_wraps_and_grows() {
        let (mut app, id) = submitted_app(&["technical-architect"], "q");
        apply_action(&mut app, AppAction::FanOutFinished { session_id: id });
        let follow_up = format!("{} tailword", "y".repeat(150));
        apply_action(&mut app, AppAction::InsertIntoInput { text: follow_up });

        let screen = render(&app);
        assert!(screen.contains("tailword"));
    }

    #[test]
    fn input_layout_breaks_rows_at_width() {
        assert_eq!(
            layout_input("abcdef", 4),
            InputLayout {
                rows: vec!["abcd".into(), "ef".into()],
                cursor_row: 1,
                cursor_col: 2,
            }
        );
        assert_eq!(
            layout_input("abcd", 4),
            InputLayout {
                rows: vec!["abcd".into(), String::new()],
                cursor_row: 1,
                cursor_col: 0,
            }
        );
        assert_eq!(layout_input("a\nb", 4).rows, vec!["a", "b"]);
        assert_eq!(layout_input("", 4).rows, vec![""]);
        assert_eq!(layout_input("🎯🎯🎯", 5).rows, vec!["🎯🎯", "🎯"]);
    }

    #[test]
    fn input_height_is_capped() {
        assert_eq!(input_height("", 20, 4), 3);
        assert_eq!(input_height(&"z".repeat(40), 20, 4), 5);
        assert_eq!(input_height(&"z".repeat(400), 20, 4), 6);
    }

    #[test]
    fn sidebar_scrolls_to_keep_the_active_chat_visible() {
        let mut app = App::default();
        for i in 0..20 {
            apply_action(
                &mut app,
                AppAction::ToggleMentor {
                    mentor_id: "growth-optimizer".into(),
                },
            );
            apply_action(
                &mut app,
                AppAction::InsertIntoInput {
                    text: format!("Topic {i:02}"),
                },
            );
            assert!(apply_action(&mut app, AppAction::SubmitQuestion).is_some());
            apply_action(&mut app, AppAction::NewSession);
        }

        let sidebar = render_columns(&app, 0..SIDEBAR_WIDTH);
        assert!(sidebar.contains("Topic 19"));
        assert!(!sidebar.contains("Topic 00"));

        // From the home screen, stepping back lands on the oldest chat.
        apply_action(&mut app, AppAction::SelectAdjacentSession { delta: -1 });
        let sidebar = render_columns(&app, 0..SIDEBAR_WIDTH);
        assert!(sidebar.contains("Topic 00"));
        assert!(sidebar.contains(NEW_CONSULTATION_LABEL));
        assert!(!sidebar.contains("Topic 19"));
    }

    #[test]
    fn sidebar_scroll_only_moves_past_the_fold() {
        assert_eq!(sidebar_scroll(None, 10), 0);
        assert_eq!(sidebar_scroll(Some(0), 10), 0);
        assert_eq!(sidebar_scroll(Some(3), 10), 1);
    }

    #[test]
    fn transcript_scroll_is_clamped_to_the_content() {
        let (mut app, id) = submitted_app(&["technical-architect"], "short");
        apply_action(&mut app, AppAction::FanOutFinished { session_id: id });
        for _ in 0..5 {
            apply_action(&mut app, AppAction::ScrollTranscript { lines: 10 });
        }
        assert_eq!(app.ui.transcript_scroll, 50);

        let area = Rect::new(0, 0, WIDTH, HEIGHT);
        clamp_transcript_scroll(&mut app, area);
        assert_eq!(app.ui.transcript_scroll, 0);

        let long_reply = (0..80)
            .map(|i| format!("point {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        apply_action(
            &mut app,
            AppAction::MentorReplied {
                session_id: id,
                mentor_id: "technical-architect".into(),
                content: long_reply,
            },
        );
        for _ in 0..20 {
            apply_action(&mut app, AppAction::ScrollTranscript { lines: 10 });
        }
        clamp_transcript_scroll(&mut app, area);
        let max_scroll = app.ui.transcript_scroll;
        assert!(max_scroll > 0 && max_scroll < 200);

        // One page down from the top is visible immediately.
        apply_action(&mut app, AppAction::ScrollTranscript { lines: -10 });
        clamp_transcript_scroll(&mut app, area);
        assert_eq!(app.ui.transcript_scroll, max_scroll - 10);
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_to_width("🎯🎯🎯", 4), "🎯…");
    }

    #[test]
    fn wrapped_height_counts_blank_lines() {
        let lines = vec![Line::from("x".repeat(25)), Line::from("")];
        assert_eq!(wrapped_height(&lines, 10), 4);
        assert_eq!(wrapped_height(&lines, 0), 2);
    }
}
