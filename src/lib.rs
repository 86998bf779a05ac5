//! Mintlify documentation assistant over MCP.
//!
//! A Model Context Protocol server that forwards questions to the assistant
//! built into Mintlify documentation sites and relays the answers back to
//! the calling agent as plain text.
//!
//! # Architecture
//!
//! - **MCP surface**: rmcp `ServerHandler` with an open and a locked tool set
//! - **Bridge**: per-question workflow with per-project locking
//! - **Assistant client**: request construction and response decoding
//! - **Conversation store**: in-memory history replayed on follow-ups
//!
//! # Modules
//!
//! - [`assistant`]: upstream client, project registry, response decoder
//! - [`bridge`]: question workflow shared by both tool sets
//! - [`config`]: command line and layered configuration
//! - [`mcp`]: tool definitions and server handler
//! - [`server`]: stdio and streamable HTTP transports
//! - [`session`]: per-project conversation history

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::default_trait_access)]

pub mod assistant;
pub mod bridge;
pub mod config;
pub mod mcp;
pub mod server;
pub mod session;
pub mod telemetry;

use crate::assistant::{AssistantClient, AssistantError};
use crate::bridge::DocsBridge;
use crate::config::AppConfig;
use crate::mcp::DocsServer;

/// Build the MCP server described by `config`.
pub fn build_server(config: &AppConfig) -> Result<DocsServer, AssistantError> {
    let registry = config.project_registry();
    let mode = config.tool_mode(&registry);
    let client = AssistantClient::new(&config.assistant_settings(), registry)?;
    Ok(DocsServer::new(DocsBridge::new(client), mode))
}
