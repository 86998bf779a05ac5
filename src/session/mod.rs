//! Per-project conversation history.
//!
//! Each documentation project has at most one conversation. Its turns are
//! replayed to the assistant on follow-up questions so answers can build on
//! earlier ones. History lives in process memory only.
//!
//! # Architecture
//!
//! - [`Turn`]: a single user question or assistant answer
//! - [`ConversationState`]: the ordered turns of one project
//! - [`ConversationStore`]: thread-safe map of project id to conversation
//!
//! # Example
//!
//! ```rust
//! use mintlify_mcp::session::ConversationStore;
//!
//! let store = ConversationStore::new();
//! let history = store.get_or_create("agno-v2", false);
//! assert!(history.is_empty());
//!
//! store.append_exchange("agno-v2", "What is Agno?", "A framework.");
//! assert_eq!(store.get_or_create("agno-v2", false).len(), 2);
//! ```

mod conversation;

pub use conversation::{
    ConversationState, ConversationStore, ProjectGuard, Role, Turn, TurnPart,
};
