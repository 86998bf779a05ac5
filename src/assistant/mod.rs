//! Client for the Mintlify documentation assistant.
//!
//! Builds the upstream request for a project, question and prior history,
//! sends it, and reduces the streamed body to a plain-text answer.
//!
//! # Upstream contract
//!
//! ```text
//! POST {base_url}/api/assistant/{project_id}/message
//! Origin:  https://{domain}
//! Referer: https://{domain}/
//!
//! { "id": "<project_id>", "fp": "<project_id>", "messages": [Turn, ...] }
//! ```
//!
//! The response is buffered in full and decoded by [`stream::decode_response`].

pub mod error;
pub mod projects;
pub mod stream;

pub use error::AssistantError;
pub use projects::{KnownProject, ProjectEntry, ProjectRegistry};
pub use stream::{NO_RESPONSE_MESSAGE, decode_response};

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, ORIGIN, REFERER};
use serde::Serialize;
use url::Url;

use crate::session::Turn;

/// Default upstream host.
pub const DEFAULT_BASE_URL: &str = "https://leaves.mintlify.com";

/// Connection settings for the assistant API.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    /// Scheme and host of the assistant API.
    pub base_url: String,
    /// Whole-request timeout; `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

/// Body of a message request.
///
/// The upstream expects the project id twice, as `id` and as `fp`.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantRequest {
    pub id: String,
    pub fp: String,
    pub messages: Vec<Turn>,
}

impl AssistantRequest {
    /// History followed by a fresh user turn for `question`.
    #[must_use]
    pub fn new(project_id: &str, question: &str, history: &[Turn]) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(Turn::user(history.len() + 1, question));
        Self {
            id: project_id.to_string(),
            fp: project_id.to_string(),
            messages,
        }
    }
}

/// HTTP client for the assistant API.
#[derive(Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: Url,
    projects: Arc<ProjectRegistry>,
}

impl std::fmt::Debug for AssistantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantClient")
            .field("base_url", &self.base_url.as_str())
            .field("project_count", &self.projects.len())
            .finish()
    }
}

impl AssistantClient {
    /// Create a client for the given settings and project registry.
    pub fn new(
        settings: &AssistantSettings,
        projects: ProjectRegistry,
    ) -> Result<Self, AssistantError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| AssistantError::InvalidBaseUrl(format!("{}: {e}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(AssistantError::InvalidBaseUrl(settings.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            projects: Arc::new(projects),
        })
    }

    /// Projects known to this client.
    #[must_use]
    pub fn projects(&self) -> &ProjectRegistry {
        &self.projects
    }

    /// `{base_url}/api/assistant/{project_id}/message`, with the id encoded
    /// as a single path segment.
    pub fn message_url(&self, project_id: &str) -> Result<Url, AssistantError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AssistantError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "assistant", project_id, "message"]);
        Ok(url)
    }

    /// Ask `question` about `project_id`, replaying `history` as context.
    ///
    /// Returns the decoded answer text. An empty upstream answer is not an
    /// error; it decodes to [`NO_RESPONSE_MESSAGE`].
    pub async fn ask(
        &self,
        project_id: &str,
        question: &str,
        history: &[Turn],
    ) -> Result<String, AssistantError> {
        let project = self.projects.resolve(project_id);
        let url = self.message_url(project_id)?;
        let body = AssistantRequest::new(project_id, question, history);

        tracing::info!(
            name: "assistant.request",
            project = %project_id,
            domain = %project.domain,
            messages = body.messages.len(),
            "Sending question to docs assistant"
        );

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ORIGIN, project.origin())
            .header(REFERER, project.referer())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                name: "assistant.error",
                project = %project_id,
                status = status.as_u16(),
                "Docs assistant rejected the request"
            );
            return Err(AssistantError::upstream(status));
        }

        let text = response.text().await?;
        let answer = decode_response(&text);

        tracing::info!(
            name: "assistant.response",
            project = %project_id,
            body_bytes = text.len(),
            answer_chars = answer.chars().count(),
            "Docs assistant answered"
        );

        Ok(answer)
    }
}
