use chrono::Local;
use tracing::{debug, warn};

use super::{App, Screen};
use crate::core::fan_out::FanOutPlan;
use crate::core::message::{MessageDraft, Sender};
use crate::core::session::{FailedReply, SessionId};

#[derive(Debug)]
pub enum AppAction {
    ToggleMentor {
        mentor_id: String,
    },
    MovePickerCursor {
        delta: i32,
    },
    ToggleMentorAtCursor,
    FocusComposer,
    InsertIntoInput {
        text: String,
    },
    InputBackspace,
    SubmitQuestion,
    SubmitFollowUp,
    MentorReplied {
        session_id: SessionId,
        mentor_id: String,
        content: String,
    },
    MentorFailed {
        session_id: SessionId,
        mentor_id: String,
        error: String,
    },
    FanOutFinished {
        session_id: SessionId,
    },
    SelectAdjacentSession {
        delta: i32,
    },
    NewSession,
    ScrollTranscript {
        lines: i32,
    },
    SetStatus {
        message: String,
    },
    ClearStatus,
    Quit,
}

#[derive(Debug)]
pub enum AppCommand {
    RunFanOut(FanOutPlan),
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::ToggleMentor { mentor_id } => {
            if app.registry.find_mentor(&mentor_id).is_some() {
                app.picker.toggle(&mentor_id);
            }
            None
        }
        AppAction::MovePickerCursor { delta } => {
            let len = app.registry.len();
            app.picker.move_cursor(delta, len);
            app.ui.gallery_focused = true;
            None
        }
        AppAction::ToggleMentorAtCursor => {
            let id = app
                .registry
                .list_mentors()
                .get(app.picker.cursor())
                .map(|m| m.id.clone());
            if let Some(id) = id {
                app.picker.toggle(&id);
            }
            None
        }
        AppAction::FocusComposer => {
            app.ui.gallery_focused = false;
            None
        }
        AppAction::InsertIntoInput { text } => {
            app.ui.gallery_focused = false;
            if let Some(input) = editable_input(app) {
                input.push_str(&text);
            }
            None
        }
        AppAction::InputBackspace => {
            app.ui.gallery_focused = false;
            if let Some(input) = editable_input(app) {
                input.pop();
            }
            None
        }
        AppAction::SubmitQuestion => submit_question(app),
        AppAction::SubmitFollowUp => submit_follow_up(app),
        AppAction::MentorReplied {
            session_id,
            mentor_id,
            content,
        } => {
            let draft = match app.registry.find_mentor(&mentor_id) {
                Some(mentor) => MessageDraft::mentor(mentor, content),
                None => MessageDraft {
                    sender: Sender::Mentor(mentor_id.clone()),
                    sender_name: mentor_id.clone(),
                    content,
                    avatar: None,
                },
            };
            if let Err(err) = app.store.append_message(session_id, draft) {
                warn!(session = %session_id, mentor = %mentor_id, error = %err, "dropping mentor reply");
            }
            None
        }
        AppAction::MentorFailed {
            session_id,
            mentor_id,
            error,
        } => {
            let mentor_name = app
                .registry
                .find_mentor(&mentor_id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| mentor_id.clone());
            let after_message_count = app
                .store
                .session(session_id)
                .map(|s| s.message_count())
                .unwrap_or(0);
            let failure = FailedReply {
                mentor_id,
                mentor_name,
                error,
                timestamp: Local::now(),
                after_message_count,
            };
            if let Err(err) = app.store.record_failure(session_id, failure) {
                warn!(session = %session_id, error = %err, "dropping failure marker");
            }
            None
        }
        AppAction::FanOutFinished { session_id } => {
            app.finish_fan_out(session_id);
            debug!(session = %session_id, "fan-out finished");
            None
        }
        AppAction::SelectAdjacentSession { delta } => {
            let sessions = app.store.list_sessions();
            if sessions.is_empty() {
                return None;
            }
            let len = sessions.len() as i64;
            let next = match app.store.active_index() {
                Some(index) => (index as i64 + delta as i64).rem_euclid(len),
                None if delta < 0 => len - 1,
                None => 0,
            };
            let session_id = sessions[next as usize].id;
            select_session(app, session_id);
            None
        }
        AppAction::NewSession => {
            // Unset is always accepted.
            let _ = app.store.set_active(None);
            app.picker.clear();
            app.ui.gallery_focused = false;
            app.ui.draft.clear();
            app.ui.follow_up.clear();
            app.ui.transcript_scroll = 0;
            app.ui.status = None;
            None
        }
        AppAction::ScrollTranscript { lines } => {
            app.ui.transcript_scroll = if lines >= 0 {
                app.ui.transcript_scroll.saturating_add(lines as u16)
            } else {
                app.ui
                    .transcript_scroll
                    .saturating_sub(lines.unsigned_abs() as u16)
            };
            None
        }
        AppAction::SetStatus { message } => {
            app.set_status(message);
            None
        }
        AppAction::ClearStatus => {
            app.ui.status = None;
            None
        }
        AppAction::Quit => {
            app.ui.exit_requested = true;
            None
        }
    }
}

/// The input box on the visible screen, or `None` while the follow-up box
/// is locked by an outstanding fan-out.
fn editable_input(app: &mut App) -> Option<&mut String> {
    match app.screen() {
        Screen::Home => Some(&mut app.ui.draft),
        Screen::Transcript(id) if app.is_thinking(id) => None,
        Screen::Transcript(_) => Some(&mut app.ui.follow_up),
    }
}

fn select_session(app: &mut App, session_id: SessionId) {
    match app.store.set_active(Some(session_id)) {
        Ok(()) => {
            app.ui.follow_up.clear();
            app.ui.transcript_scroll = 0;
        }
        Err(err) => app.set_status(err.to_string()),
    }
}

fn submit_question(app: &mut App) -> Option<AppCommand> {
    if !app.can_submit_question() {
        app.set_status("Type a question and select at least one mentor");
        return None;
    }

    let question = app.ui.draft.trim().to_string();
    let mentor_ids = app.picker.selected().to_vec();
    let session_id = match app.store.create_session(&question, mentor_ids) {
        Ok(id) => id,
        Err(err) => {
            app.set_status(err.to_string());
            return None;
        }
    };

    app.ui.draft.clear();
    app.ui.gallery_focused = false;
    app.ui.transcript_scroll = 0;
    app.ui.status = None;
    plan_fan_out(app, session_id)
}

fn submit_follow_up(app: &mut App) -> Option<AppCommand> {
    let session_id = app.store.active_id()?;
    if app.is_thinking(session_id) {
        app.set_status("Mentors are still answering");
        return None;
    }
    let text = app.ui.follow_up.trim().to_string();
    if text.is_empty() {
        return None;
    }

    if let Err(err) = app
        .store
        .append_message(session_id, MessageDraft::user(text))
    {
        app.set_status(err.to_string());
        return None;
    }

    app.ui.follow_up.clear();
    app.ui.transcript_scroll = 0;
    plan_fan_out(app, session_id)
}

fn plan_fan_out(app: &mut App, session_id: SessionId) -> Option<AppCommand> {
    let plan = {
        let session = app.store.session(session_id)?;
        FanOutPlan::for_latest_question(session, &app.registry, app.mentor_order)
    };
    app.begin_fan_out(session_id);
    Some(AppCommand::RunFanOut(plan))
}
