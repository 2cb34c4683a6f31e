//! Per-mentor completion fan-out
//!
//! A submission (initial question or follow-up) produces one [`FanOutPlan`]:
//! one target per mentor, each carrying the history that mentor is allowed
//! to see. The runner issues the completions and applies every outcome to
//! the shared app state by session id as soon as it resolves.
//!
//! In [`FanOutMode::Sequential`] call N+1 is not issued until the outcome of
//! call N has been applied, so replies land in mentor iteration order. In
//! [`FanOutMode::Concurrent`] all calls are in flight at once and replies
//! land in arrival order.

use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::{CompletionRequest, HistoryEntry};
use crate::core::app::{apply_action, AppAction, AppHandle};
use crate::core::completion::{CompletionError, CompletionService};
use crate::core::mentors::MentorRegistry;
use crate::core::session::{ChatSession, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanOutMode {
    #[default]
    Sequential,
    Concurrent,
}

impl FanOutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FanOutMode::Sequential => "sequential",
            FanOutMode::Concurrent => "concurrent",
        }
    }
}

impl std::str::FromStr for FanOutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(FanOutMode::Sequential),
            "concurrent" => Ok(FanOutMode::Concurrent),
            other => Err(format!(
                "invalid fan-out mode '{other}' (expected sequential or concurrent)"
            )),
        }
    }
}

/// Order in which a session's mentors are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorOrder {
    /// The order the user picked them in.
    #[default]
    Selection,
    /// Gallery order.
    Registry,
}

impl MentorOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            MentorOrder::Selection => "selection",
            MentorOrder::Registry => "registry",
        }
    }
}

impl std::str::FromStr for MentorOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selection" => Ok(MentorOrder::Selection),
            "registry" => Ok(MentorOrder::Registry),
            other => Err(format!(
                "invalid mentor order '{other}' (expected selection or registry)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FanOutTarget {
    pub mentor_id: String,
    pub mentor_name: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FanOutPlan {
    pub session_id: SessionId,
    pub question: String,
    pub targets: Vec<FanOutTarget>,
}

impl FanOutPlan {
    /// Plan completions for the question that was just appended as the last
    /// message of `session`. That message is excluded from the replayed
    /// history since it travels as `question`.
    pub fn for_latest_question(
        session: &ChatSession,
        registry: &MentorRegistry,
        order: MentorOrder,
    ) -> Self {
        let question = session
            .last_message()
            .map(|m| m.content.clone())
            .unwrap_or_else(|| session.question.clone());
        let end = session.message_count().saturating_sub(1);

        let mentor_ids = match order {
            MentorOrder::Selection => session.selected_mentors.clone(),
            MentorOrder::Registry => registry.order_ids(&session.selected_mentors),
        };

        let targets = mentor_ids
            .iter()
            .map(|id| FanOutTarget {
                mentor_id: id.clone(),
                mentor_name: registry
                    .find_mentor(id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| id.clone()),
                history: session.history_before(id, end),
            })
            .collect();

        Self {
            session_id: session.id,
            question,
            targets,
        }
    }

    fn request_for(&self, target: &FanOutTarget) -> CompletionRequest {
        CompletionRequest {
            mentor_id: target.mentor_id.clone(),
            mentor_name: target.mentor_name.clone(),
            question: self.question.clone(),
            conversation_history: target.history.clone(),
        }
    }
}

/// Progress notifications for observers such as the UI redraw loop or the
/// headless `ask` printer. Sent after the outcome has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum FanOutEvent {
    Replied {
        session_id: SessionId,
        mentor_id: String,
    },
    Failed {
        session_id: SessionId,
        mentor_id: String,
        error: String,
    },
    Finished {
        session_id: SessionId,
    },
}

#[derive(Clone)]
pub struct FanOutRunner {
    service: Arc<dyn CompletionService>,
    mode: FanOutMode,
    events: Option<mpsc::UnboundedSender<FanOutEvent>>,
}

impl FanOutRunner {
    pub fn new(service: Arc<dyn CompletionService>, mode: FanOutMode) -> Self {
        Self {
            service,
            mode,
            events: None,
        }
    }

    pub fn with_events(mut self, tx: mpsc::UnboundedSender<FanOutEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn spawn(&self, app: AppHandle, plan: FanOutPlan) -> JoinHandle<()> {
        let runner = self.clone();
        tokio::spawn(async move { runner.run(app, plan).await })
    }

    pub async fn run(&self, app: AppHandle, plan: FanOutPlan) {
        debug!(
            session = %plan.session_id,
            mentors = plan.targets.len(),
            mode = self.mode.as_str(),
            "starting fan-out"
        );

        match self.mode {
            FanOutMode::Sequential => {
                for target in &plan.targets {
                    let result = self.service.complete(plan.request_for(target)).await;
                    self.apply_outcome(&app, plan.session_id, target, result).await;
                }
            }
            FanOutMode::Concurrent => {
                let mut in_flight: FuturesUnordered<_> = plan
                    .targets
                    .iter()
                    .map(|target| {
                        let request = plan.request_for(target);
                        let service = Arc::clone(&self.service);
                        async move { (target, service.complete(request).await) }
                    })
                    .collect();

                while let Some((target, result)) = in_flight.next().await {
                    self.apply_outcome(&app, plan.session_id, target, result).await;
                }
            }
        }

        let session_id = plan.session_id;
        app.update(|app| apply_action(app, AppAction::FanOutFinished { session_id }))
            .await;
        self.notify(FanOutEvent::Finished { session_id });
    }

    async fn apply_outcome(
        &self,
        app: &AppHandle,
        session_id: SessionId,
        target: &FanOutTarget,
        result: Result<String, CompletionError>,
    ) {
        let mentor_id = target.mentor_id.clone();
        match result {
            Ok(content) => {
                app.update(|app| {
                    apply_action(
                        app,
                        AppAction::MentorReplied {
                            session_id,
                            mentor_id: mentor_id.clone(),
                            content,
                        },
                    )
                })
                .await;
                self.notify(FanOutEvent::Replied {
                    session_id,
                    mentor_id,
                });
            }
            Err(err) => {
                warn!(session = %session_id, mentor = %mentor_id, error = %err, "mentor completion failed");
                let error = err.to_string();
                app.update(|app| {
                    apply_action(
                        app,
                        AppAction::MentorFailed {
                            session_id,
                            mentor_id: mentor_id.clone(),
                            error: error.clone(),
                        },
                    )
                })
                .await;
                self.notify(FanOutEvent::Failed {
                    session_id,
                    mentor_id,
                    error,
                });
            }
        }
    }

    fn notify(&self, event: FanOutEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}
