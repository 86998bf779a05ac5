//! Model Context Protocol (MCP) server surface.
//!
//! Exposes the documentation assistant to MCP clients (Claude Desktop,
//! Cursor, ...) as a small set of tools.
//!
//! # Tool sets
//!
//! - Open mode: `ask_docs(project_id, question, continue_conversation?)`,
//!   `list_docs()`, `clear_conversation(project_id)`
//! - Locked mode (`--project <id>`): `ask(question)`, `clear_history()`
//!
//! # Client configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "mintlify": {
//!       "command": "mintlify-mcp",
//!       "args": ["--project", "agno-v2", "--name", "Agno"]
//!     }
//!   }
//! }
//! ```

pub mod server;
pub mod tools;

pub use server::{DocsServer, ToolError};
pub use tools::ToolMode;
