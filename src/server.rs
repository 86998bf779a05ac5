//! MCP transports: stdio and streamable HTTP.

use std::sync::Arc;

use axum::{Router, routing::get};
use rmcp::{
    ServiceExt,
    transport::{
        stdio,
        streamable_http_server::{
            StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
        },
    },
};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::mcp::DocsServer;

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn serve_stdio(server: DocsServer) -> anyhow::Result<()> {
    info!(name: "server.started", transport = "stdio", "MCP server started");

    let running = server
        .serve(stdio())
        .await
        .map_err(|e| anyhow::anyhow!("MCP server init error: {e}"))?;
    let quit_reason = running.waiting().await?;

    info!(name: "server.stopped", reason = ?quit_reason, "MCP server stopped");
    Ok(())
}

/// Router with the MCP endpoint at `/mcp` and a `/health` check.
///
/// Every HTTP session gets its own clone of `server`; clones share the
/// conversation store. Cancelling `shutdown` closes all open MCP sessions
/// and their event streams.
pub fn router(server: DocsServer, shutdown: &CancellationToken) -> Router {
    let config = StreamableHttpServerConfig {
        cancellation_token: shutdown.child_token(),
        ..Default::default()
    };
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        config,
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve MCP over streamable HTTP on `addr` until `shutdown` is cancelled.
pub async fn serve_http(
    server: DocsServer,
    addr: &str,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_listener(server, listener, shutdown).await
}

/// Serve MCP over streamable HTTP on an already bound `listener`.
pub async fn serve_listener(
    server: DocsServer,
    listener: tokio::net::TcpListener,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(
        name: "server.started",
        transport = "http",
        address = %addr,
        "MCP server started"
    );

    let app = router(server, &shutdown);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!(name: "server.stopped", transport = "http", "MCP server stopped");
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}
