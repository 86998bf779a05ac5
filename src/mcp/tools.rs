//! Tool definitions and argument types.
//!
//! Two tool sets exist. The open set lets the caller pick any project per
//! call; the locked set is bound to one project chosen at startup and drops
//! the `project_id` parameter entirely.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::assistant::KnownProject;

pub const ASK_DOCS: &str = "ask_docs";
pub const LIST_DOCS: &str = "list_docs";
pub const CLEAR_CONVERSATION: &str = "clear_conversation";
pub const ASK: &str = "ask";
pub const CLEAR_HISTORY: &str = "clear_history";

/// Which tool set the server exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolMode {
    /// `ask_docs`, `list_docs`, `clear_conversation`.
    Open,
    /// `ask`, `clear_history`, bound to one project.
    Locked(KnownProject),
}

/// Arguments of `ask_docs`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskDocsArgs {
    pub project_id: String,
    pub question: String,
    #[serde(default)]
    pub continue_conversation: Option<bool>,
}

/// Arguments of `clear_conversation`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearConversationArgs {
    pub project_id: String,
}

/// Arguments of the locked-mode `ask`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskArgs {
    pub question: String,
}

/// Deserialize tool arguments; a missing argument object counts as empty.
pub fn parse_args<T: DeserializeOwned>(arguments: Option<JsonObject>) -> Result<T, String> {
    let value = serde_json::Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Tool definitions advertised for `mode`.
#[must_use]
pub fn definitions(mode: &ToolMode) -> Vec<Tool> {
    match mode {
        ToolMode::Open => vec![
            tool(
                ASK_DOCS,
                "Ask a question about a documentation site powered by Mintlify. \
                 Use list_docs to see known project ids; any other Mintlify \
                 project id works too. The conversation is reset unless \
                 continue_conversation is true.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "project_id": {
                            "type": "string",
                            "description": "Mintlify assistant project id, e.g. \"agno-v2\""
                        },
                        "question": {
                            "type": "string",
                            "description": "Question about the documentation"
                        },
                        "continue_conversation": {
                            "type": "boolean",
                            "description": "Keep previous questions and answers for this project as context",
                            "default": false
                        }
                    },
                    "required": ["project_id", "question"]
                }),
            ),
            tool(
                LIST_DOCS,
                "List the documentation projects known to this server.",
                serde_json::json!({ "type": "object", "properties": {} }),
            ),
            tool(
                CLEAR_CONVERSATION,
                "Forget the conversation history for a documentation project.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "project_id": {
                            "type": "string",
                            "description": "Project whose history should be cleared"
                        }
                    },
                    "required": ["project_id"]
                }),
            ),
        ],
        ToolMode::Locked(project) => vec![
            tool(
                ASK,
                &format!(
                    "Ask a question about the {} documentation. Follow-up \
                     questions keep the earlier conversation as context; call \
                     clear_history to start over.",
                    project.name
                ),
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "question": {
                            "type": "string",
                            "description": format!("Question about the {} documentation", project.name)
                        }
                    },
                    "required": ["question"]
                }),
            ),
            tool(
                CLEAR_HISTORY,
                &format!(
                    "Forget the conversation history with the {} documentation assistant.",
                    project.name
                ),
                serde_json::json!({ "type": "object", "properties": {} }),
            ),
        ],
    }
}

fn tool(name: &'static str, description: &str, schema: serde_json::Value) -> Tool {
    let input_schema = match schema {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::new(),
    };
    Tool {
        name: name.into(),
        description: Some(description.to_string().into()),
        input_schema: Arc::new(input_schema),
        title: None,
        output_schema: None,
        annotations: None,
        icons: None,
        meta: None,
    }
}
