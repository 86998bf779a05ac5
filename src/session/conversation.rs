//! Conversation turns and the per-project conversation store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;

/// Guard held for the duration of one exchange with a project.
///
/// Dropping it releases the project's lock and forgets the lock entirely
/// once no other caller holds or waits on it.
#[derive(Debug)]
#[must_use = "the project lock is released when the guard is dropped"]
pub struct ProjectGuard {
    guard: Option<OwnedMutexGuard<()>>,
    store: Arc<StoreInner>,
    project_id: String,
}

impl Drop for ProjectGuard {
    fn drop(&mut self) {
        // Release first so the map holds the last reference to an idle lock.
        drop(self.guard.take());

        let mut locks = self
            .store
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.project_id)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
        {
            locks.remove(&self.project_id);
        }
    }
}

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A content part of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnPart {
    /// Plain text.
    Text {
        /// The text content.
        text: String,
    },
}

/// One message of a conversation, in the shape the assistant API expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    /// 1-based position in the conversation, as a string.
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub parts: Vec<TurnPart>,
}

impl Turn {
    /// Create a turn at 1-based position `ordinal`, stamped now.
    #[must_use]
    pub fn new(ordinal: usize, role: Role, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: ordinal.to_string(),
            role,
            parts: vec![TurnPart::Text {
                text: content.clone(),
            }],
            content,
            created_at: Utc::now(),
        }
    }

    /// A user question.
    #[must_use]
    pub fn user(ordinal: usize, content: impl Into<String>) -> Self {
        Self::new(ordinal, Role::User, content)
    }

    /// An assistant answer.
    #[must_use]
    pub fn assistant(ordinal: usize, content: impl Into<String>) -> Self {
        Self::new(ordinal, Role::Assistant, content)
    }
}

/// Ordered history of one project's conversation.
///
/// Always an alternating user/assistant sequence starting with a user turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversationState {
    messages: Vec<Turn>,
}

impl ConversationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All turns, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Turn] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a question and its answer as two consecutive turns.
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let next = self.messages.len() + 1;
        self.messages.push(Turn::user(next, question));
        self.messages.push(Turn::assistant(next + 1, answer));
    }
}

/// Thread-safe store of conversations keyed by project id.
///
/// Lives for the whole process; nothing is persisted. Cloning shares the
/// underlying map.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    conversations: RwLock<HashMap<String, ConversationState>>,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exchange lock for `project_id`.
    ///
    /// Hold the guard across `get_or_create`, the upstream call and
    /// `append_exchange` so concurrent questions about the same project
    /// cannot interleave their turns. Other projects are not blocked.
    pub async fn lock(&self, project_id: &str) -> ProjectGuard {
        let mutex = {
            let mut locks = self
                .inner
                .locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(project_id.to_string()).or_default())
        };
        ProjectGuard {
            guard: Some(mutex.lock_owned().await),
            store: Arc::clone(&self.inner),
            project_id: project_id.to_string(),
        }
    }

    /// Return the conversation for `project_id`.
    ///
    /// A fresh empty conversation replaces any existing one when `reset` is
    /// set, and is created when none exists yet.
    pub fn get_or_create(&self, project_id: &str, reset: bool) -> ConversationState {
        let mut guard = self
            .inner
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if reset {
            guard.insert(project_id.to_string(), ConversationState::new());
        }
        guard.entry(project_id.to_string()).or_default().clone()
    }

    /// Append a user turn for `question` then an assistant turn for `answer`.
    pub fn append_exchange(&self, project_id: &str, question: &str, answer: &str) {
        let mut guard = self
            .inner
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard
            .entry(project_id.to_string())
            .or_default()
            .push_exchange(question, answer);
    }

    /// Drop the conversation for `project_id`. Returns whether one existed.
    pub fn clear(&self, project_id: &str) -> bool {
        self.inner
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(project_id)
            .is_some()
    }

    /// Current conversation for `project_id`, if any, without creating one.
    #[must_use]
    pub fn get(&self, project_id: &str) -> Option<ConversationState> {
        self.inner
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(project_id)
            .cloned()
    }

    /// Number of projects with a conversation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Project ids that currently have a conversation, sorted.
    #[must_use]
    pub fn project_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .inner
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
