//! Completion client for the mentor endpoint
//!
//! One request per mentor: the question plus that mentor's private history
//! with the user. Failures are returned to the caller, which decides how to
//! surface them; nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::api::{CompletionRequest, CompletionResponse};
use crate::utils::url::construct_api_url;

/// Default completion endpoint base address.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

const ERROR_BODY_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("completion endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not decode completion response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Anything that can turn a [`CompletionRequest`] into mentor text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Clone)]
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCompletionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, CompletionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| CompletionError::Other(format!("failed to build HTTP client: {err}")))?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn chat_url(&self) -> String {
        construct_api_url(&self.endpoint, "chat")
    }
}

#[async_trait]
impl CompletionService for HttpCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let url = self.chat_url();
        debug!(
            mentor = %request.mentor_id,
            history = request.conversation_history.len(),
            %url,
            "requesting completion"
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|source| CompletionError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Status {
                status,
                body: excerpt(&body),
            });
        }

        let parsed = response
            .json::<CompletionResponse>()
            .await
            .map_err(CompletionError::Decode)?;
        Ok(parsed.content)
    }
}

fn excerpt(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= ERROR_BODY_EXCERPT_CHARS {
        return collapsed;
    }
    let mut short: String = collapsed.chars().take(ERROR_BODY_EXCERPT_CHARS).collect();
    short.push('…');
    short
}
