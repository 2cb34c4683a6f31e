//! TUI-less "ask" command
//!
//! Runs one consultation through the same reducer and fan-out runner as the
//! interactive UI, printing each reply as it is appended.

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::app::{apply_action, App, AppAction, AppCommand, AppHandle};
use crate::core::completion::{CompletionService, HttpCompletionClient};
use crate::core::config::ResolvedSettings;
use crate::core::fan_out::{FanOutEvent, FanOutMode, FanOutRunner, MentorOrder};
use crate::core::mentors::MentorRegistry;
use crate::core::session::SessionId;
use crate::utils::logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AskSummary {
    pub replied: usize,
    pub failed: usize,
}

pub async fn run_ask(
    mentors: Vec<String>,
    question: Vec<String>,
    settings: ResolvedSettings,
) -> Result<(), Box<dyn Error>> {
    // A subscriber may already be installed by an embedding binary.
    let _ = logging::init_stderr_logging();

    let question = question.join(" ");
    if question.trim().is_empty() {
        eprintln!("Usage: tribe ask -m <mentor> <question>");
        std::process::exit(2);
    }

    let registry = MentorRegistry::builtin();
    let mentor_ids = known_mentors(&registry, &mentors);
    for id in mentors.iter().filter(|id| registry.find_mentor(id).is_none()) {
        eprintln!("⚠️  Unknown mentor: {id}");
    }
    if mentor_ids.is_empty() {
        let available: Vec<&str> = registry.list_mentors().iter().map(|m| m.id.as_str()).collect();
        eprintln!("❌ No valid mentor given. Available: {}", available.join(", "));
        std::process::exit(2);
    }

    let client = HttpCompletionClient::new(settings.endpoint.clone(), settings.request_timeout)?;
    let stdout = io::stdout();
    let stderr = io::stderr();
    consult(
        Arc::new(client),
        registry,
        settings.fan_out,
        settings.mentor_order,
        mentor_ids,
        question,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
    .await?;

    Ok(())
}

/// Ids from `requested` that exist in `registry`, first occurrence kept.
pub fn known_mentors(registry: &MentorRegistry, requested: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in requested {
        if registry.find_mentor(id).is_some() && !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

#[allow(clippy::too_many_arguments)]
pub async fn consult<O: Write, E: Write>(
    service: Arc<dyn CompletionService>,
    registry: MentorRegistry,
    mode: FanOutMode,
    order: MentorOrder,
    mentor_ids: Vec<String>,
    question: String,
    out: &mut O,
    err: &mut E,
) -> Result<AskSummary, Box<dyn Error>> {
    let mut app = App::new(registry, order);
    for mentor_id in mentor_ids {
        apply_action(&mut app, AppAction::ToggleMentor { mentor_id });
    }
    apply_action(&mut app, AppAction::InsertIntoInput { text: question });

    let plan = match apply_action(&mut app, AppAction::SubmitQuestion) {
        Some(AppCommand::RunFanOut(plan)) => plan,
        None => {
            let reason = app
                .ui
                .status
                .take()
                .unwrap_or_else(|| "Nothing to ask".to_string());
            return Err(reason.into());
        }
    };
    let session_id = plan.session_id;

    let handle = AppHandle::new(app);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = FanOutRunner::new(service, mode)
        .with_events(tx)
        .spawn(handle.clone(), plan);

    let mut summary = AskSummary::default();
    while let Some(event) = rx.recv().await {
        match event {
            FanOutEvent::Replied { mentor_id, .. } => {
                if let Some((header, content)) = latest_reply(&handle, session_id, &mentor_id).await {
                    writeln!(out, "{header}:")?;
                    writeln!(out, "{content}")?;
                    writeln!(out)?;
                    out.flush()?;
                }
                summary.replied += 1;
            }
            FanOutEvent::Failed {
                mentor_id, error, ..
            } => {
                let name = handle
                    .read(|app| {
                        app.registry
                            .find_mentor(&mentor_id)
                            .map(|m| m.name.clone())
                    })
                    .await
                    .unwrap_or(mentor_id);
                writeln!(err, "⚠️  {name} could not respond: {error}")?;
                summary.failed += 1;
            }
            FanOutEvent::Finished { .. } => break,
        }
    }

    task.await?;
    Ok(summary)
}

async fn latest_reply(
    handle: &AppHandle,
    session_id: SessionId,
    mentor_id: &str,
) -> Option<(String, String)> {
    handle
        .read(|app| {
            let session = app.store.session(session_id)?;
            let message = session
                .messages()
                .iter()
                .rev()
                .find(|m| m.sender.mentor_id() == Some(mentor_id))?;
            let header = match &message.avatar {
                Some(avatar) => format!("{avatar} {}", message.sender_name),
                None => message.sender_name.clone(),
            };
            Some((header, message.content.clone()))
        })
        .await
}
