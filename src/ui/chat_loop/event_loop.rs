//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input is read on a background task and resolved into
//! [`AppAction`]s. Commands returned by the reducer (fan-outs) run as
//! their own tasks and report progress over a channel so the loop knows
//! when to redraw.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::core::app::{apply_actions, App, AppAction, AppCommand, AppHandle};
use crate::core::completion::HttpCompletionClient;
use crate::core::config::ResolvedSettings;
use crate::core::fan_out::{FanOutEvent, FanOutRunner};
use crate::core::mentors::MentorRegistry;
use crate::ui::renderer::{clamp_transcript_scroll, ui};
use crate::utils::logging;

use super::keybindings::{map_key_event, KeyContext, KeyResult};
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    let without_crlf = text.replace("\r\n", "\n");
    let without_cr = without_crlf.replace('\r', "\n");
    let expanded_tabs = without_cr.replace('\t', "    ");
    expanded_tabs
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

/// Apply `actions` and start any work the reducer asked for.
pub(crate) async fn dispatch_actions(
    app: &AppHandle,
    runner: &FanOutRunner,
    actions: Vec<AppAction>,
) {
    let commands = app.update(|app| apply_actions(app, actions)).await;
    for cmd in commands {
        match cmd {
            AppCommand::RunFanOut(plan) => {
                debug!(session = %plan.session_id, mentors = plan.targets.len(), "spawning fan-out");
                runner.spawn(app.clone(), plan);
            }
        }
    }
}

async fn process_ui_events(
    app: &AppHandle,
    runner: &FanOutRunner,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> bool {
    let mut events_processed = false;

    while let Ok(ev) = event_rx.try_recv() {
        events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let context = app.read(KeyContext::from_app).await;
                if let KeyResult::Handled(actions) = map_key_event(&key, context) {
                    dispatch_actions(app, runner, actions).await;
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                let text = sanitize_pasted_text(&text);
                if !text.is_empty() {
                    dispatch_actions(app, runner, vec![AppAction::InsertIntoInput { text }]).await;
                }
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    events_processed
}

/// Outcomes are already applied by the runner; this only tells the loop
/// that something changed.
fn drain_fan_out_events(rx: &mut mpsc::UnboundedReceiver<FanOutEvent>) -> bool {
    let mut received_any = false;
    while let Ok(event) = rx.try_recv() {
        debug!(?event, "fan-out progress");
        received_any = true;
    }
    received_any
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    let size = terminal_guard.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    app.update(|app| {
        clamp_transcript_scroll(app, area);
        terminal_guard.draw(|f| ui(f, app)).map(|_| ())
    })
    .await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(settings: ResolvedSettings) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &settings.log_file {
        logging::init_file_logging(path)?;
    }
    info!(
        endpoint = %settings.endpoint,
        fan_out = settings.fan_out.as_str(),
        mentor_order = settings.mentor_order.as_str(),
        "starting interactive session"
    );

    let client = HttpCompletionClient::new(settings.endpoint.clone(), settings.request_timeout)?;
    let (fan_out_tx, mut fan_out_rx) = mpsc::unbounded_channel::<FanOutEvent>();
    let runner = FanOutRunner::new(Arc::new(client), settings.fan_out).with_events(fan_out_tx);
    let app = AppHandle::new(App::new(MentorRegistry::builtin(), settings.mentor_order));

    let terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = loop {
        if app.read(|app| app.ui.exit_requested).await {
            break Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break Err(err.into());
        }

        let events_processed = process_ui_events(&app, &runner, &mut event_rx).await;
        let fan_out_progress = drain_fan_out_events(&mut fan_out_rx);

        if events_processed || fan_out_progress {
            request_redraw = true;
        } else if !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&terminal).await?;
    info!("interactive session closed");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CompletionRequest;
    use crate::core::completion::{CompletionError, CompletionService};
    use crate::core::fan_out::FanOutMode;
    use async_trait::async_trait;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct Echo;

    #[async_trait]
    impl CompletionService for Echo {
        async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
            Ok(format!("{} heard: {}", request.mentor_name, request.question))
        }
    }

    fn send_key(tx: &mpsc::UnboundedSender<UiEvent>, code: KeyCode) {
        tx.send(UiEvent::Crossterm(Event::Key(KeyEvent::new(
            code,
            KeyModifiers::NONE,
        ))))
        .unwrap();
    }

    async fn wait_for_finish(rx: &mut mpsc::UnboundedReceiver<FanOutEvent>) {
        loop {
            match rx.recv().await {
                Some(FanOutEvent::Finished { .. }) => return,
                Some(_) => continue,
                None => panic!("fan-out channel closed"),
            }
        }
    }

    #[test]
    fn sanitize_pasted_text_normalizes_line_endings_and_tabs() {
        assert_eq!(sanitize_pasted_text("a\r\nb\rc\td"), "a\nb\nc    d");
        assert_eq!(sanitize_pasted_text("bell\u{7}"), "bell");
    }

    #[test]
    fn drain_reports_whether_anything_arrived() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(!drain_fan_out_events(&mut rx));
        tx.send(FanOutEvent::Finished {
            session_id: crate::core::session::SessionId(1),
        })
        .unwrap();
        assert!(drain_fan_out_events(&mut rx));
        assert!(!drain_fan_out_events(&mut rx));
    }

    #[tokio::test]
    async fn keyboard_submission_runs_the_fan_out() {
        let app = AppHandle::new(App::default());
        let (fan_out_tx, mut fan_out_rx) = mpsc::unbounded_channel();
        let runner = FanOutRunner::new(Arc::new(Echo), FanOutMode::Sequential)
            .with_events(fan_out_tx);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        // Focus the second card, select it, then type and submit.
        for code in [
            KeyCode::Tab,
            KeyCode::Char(' '),
            KeyCode::Char('h'),
            KeyCode::Char('i'),
            KeyCode::Enter,
        ] {
            send_key(&event_tx, code);
        }

        assert!(process_ui_events(&app, &runner, &mut event_rx).await);
        wait_for_finish(&mut fan_out_rx).await;

        let contents = app
            .read(|app| {
                app.active_session()
                    .map(|s| s.messages().iter().map(|m| m.content.clone()).collect())
                    .unwrap_or_else(Vec::new)
            })
            .await;
        assert_eq!(contents, vec!["hi", "Marcus Chen heard: hi"]);
        assert!(!app.read(|app| app.has_pending_work()).await);
    }

    #[tokio::test]
    async fn paste_lands_in_the_composer() {
        let app = AppHandle::new(App::default());
        let runner = FanOutRunner::new(Arc::new(Echo), FanOutMode::Sequential);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        event_tx
            .send(UiEvent::Crossterm(Event::Paste("line one\r\nline two".into())))
            .unwrap();

        assert!(process_ui_events(&app, &runner, &mut event_rx).await);
        let draft = app.read(|app| app.ui.draft.clone()).await;
        assert_eq!(draft, "line one\nline two");
    }
}
