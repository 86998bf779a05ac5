//! rmcp server handler exposing the documentation tools.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};

use super::tools::{
    self, ASK, ASK_DOCS, AskArgs, AskDocsArgs, CLEAR_CONVERSATION, CLEAR_HISTORY,
    ClearConversationArgs, LIST_DOCS, ToolMode, parse_args,
};
use crate::assistant::AssistantError;
use crate::bridge::DocsBridge;

/// Failures reported back to the caller as error tool results.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The requested tool is not part of the active tool set.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments were missing or malformed.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The assistant could not answer.
    #[error(transparent)]
    Assistant(#[from] AssistantError),
}

/// MCP server answering documentation questions through a [`DocsBridge`].
///
/// Cheap to clone; clones share the bridge and its conversation history,
/// which lets every HTTP session see the same store.
#[derive(Debug, Clone)]
pub struct DocsServer {
    bridge: DocsBridge,
    mode: ToolMode,
}

impl DocsServer {
    #[must_use]
    pub fn new(bridge: DocsBridge, mode: ToolMode) -> Self {
        Self { bridge, mode }
    }

    #[must_use]
    pub fn mode(&self) -> &ToolMode {
        &self.mode
    }

    #[must_use]
    pub fn bridge(&self) -> &DocsBridge {
        &self.bridge
    }

    /// Run tool `name` and wrap the outcome as a tool result.
    ///
    /// Every failure becomes an error result carrying a readable message;
    /// none of them is a protocol fault.
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.run(name, arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                tracing::warn!(name: "tool.failed", tool = %name, error = %e, "Tool call failed");
                CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
            }
        }
    }

    async fn run(&self, name: &str, arguments: Option<JsonObject>) -> Result<String, ToolError> {
        tracing::info!(name: "tool.called", tool = %name, "Tool called");

        match (&self.mode, name) {
            (ToolMode::Open, ASK_DOCS) => {
                let args: AskDocsArgs = parse_args(arguments).map_err(ToolError::InvalidArguments)?;
                let project_id = required(&args.project_id, "project_id")?;
                let question = required(&args.question, "question")?;
                let continue_conversation = args.continue_conversation.unwrap_or(false);
                Ok(self
                    .bridge
                    .ask(project_id, question, continue_conversation)
                    .await?)
            }
            (ToolMode::Open, LIST_DOCS) => Ok(self.bridge.list_projects()),
            (ToolMode::Open, CLEAR_CONVERSATION) => {
                let args: ClearConversationArgs =
                    parse_args(arguments).map_err(ToolError::InvalidArguments)?;
                let project_id = required(&args.project_id, "project_id")?;
                self.bridge.clear(project_id).await;
                Ok(format!("Conversation history for {project_id} cleared."))
            }
            (ToolMode::Locked(project), ASK) => {
                let args: AskArgs = parse_args(arguments).map_err(ToolError::InvalidArguments)?;
                let question = required(&args.question, "question")?;
                Ok(self.bridge.ask(&project.id, question, true).await?)
            }
            (ToolMode::Locked(project), CLEAR_HISTORY) => {
                self.bridge.clear(&project.id).await;
                Ok(format!("Conversation history for {} cleared.", project.name))
            }
            _ => Err(ToolError::UnknownTool(name.to_string())),
        }
    }

    fn instructions(&self) -> String {
        match &self.mode {
            ToolMode::Open => "Answers questions about documentation sites powered by Mintlify. \
                 Call list_docs to find a project id, then ask_docs with your question. \
                 Pass continue_conversation=true for follow-up questions."
                .to_string(),
            ToolMode::Locked(project) => format!(
                "Answers questions about the {} documentation ({}). \
                 Use ask for questions and clear_history to start a new conversation.",
                project.name, project.domain
            ),
        }
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, ToolError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::InvalidArguments(format!("{field} must not be empty")));
    }
    Ok(value)
}

impl ServerHandler for DocsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(self.instructions()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(tools::definitions(
            &self.mode,
        )))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call(&request.name, request.arguments).await)
    }
}
