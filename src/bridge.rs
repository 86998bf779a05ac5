//! Question workflow shared by every tool surface.
//!
//! [`DocsBridge`] ties the assistant client to the conversation store: it
//! picks or resets the project's history, asks the assistant, and records
//! the exchange. Each exchange runs under the project's lock, so concurrent
//! MCP sessions asking about the same project never interleave turns.

use crate::assistant::{AssistantClient, AssistantError, ProjectRegistry};
use crate::session::ConversationStore;

/// Assistant client plus the conversation history it replays.
#[derive(Debug, Clone)]
pub struct DocsBridge {
    client: AssistantClient,
    conversations: ConversationStore,
}

impl DocsBridge {
    #[must_use]
    pub fn new(client: AssistantClient) -> Self {
        Self {
            client,
            conversations: ConversationStore::new(),
        }
    }

    #[must_use]
    pub fn projects(&self) -> &ProjectRegistry {
        self.client.projects()
    }

    #[must_use]
    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Ask `question` about `project_id`.
    ///
    /// Unless `continue_conversation` is set the project's history is reset
    /// first. The exchange is recorded only when the assistant answered.
    pub async fn ask(
        &self,
        project_id: &str,
        question: &str,
        continue_conversation: bool,
    ) -> Result<String, AssistantError> {
        let _guard = self.conversations.lock(project_id).await;

        let history = self
            .conversations
            .get_or_create(project_id, !continue_conversation);
        tracing::debug!(
            project = %project_id,
            continued = continue_conversation,
            prior_turns = history.len(),
            "Resolved conversation"
        );

        let answer = self
            .client
            .ask(project_id, question, history.messages())
            .await?;
        self.conversations
            .append_exchange(project_id, question, &answer);

        Ok(answer)
    }

    /// Forget the conversation for `project_id`. Returns whether one existed.
    pub async fn clear(&self, project_id: &str) -> bool {
        let _guard = self.conversations.lock(project_id).await;
        let existed = self.conversations.clear(project_id);
        tracing::info!(
            name: "conversation.cleared",
            project = %project_id,
            existed,
            "Conversation cleared"
        );
        existed
    }

    /// Markdown listing of the known projects. Makes no network calls.
    #[must_use]
    pub fn list_projects(&self) -> String {
        self.projects().render_list()
    }
}
