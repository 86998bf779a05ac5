//! Mintlify documentation MCP server.
//!
//! Entry point: parses flags, loads configuration, and serves the tools over
//! the configured transport.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mintlify_mcp::config::{AppConfig, Cli, Transport};
use mintlify_mcp::mcp::ToolMode;
use mintlify_mcp::{build_server, server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before clap reads env fallbacks
    let _ = dotenv();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli).context("failed to load configuration")?;

    telemetry::init(config.logging.format);

    let server = build_server(&config).context("failed to create assistant client")?;
    match server.mode() {
        ToolMode::Open => {
            if config.locked.name.is_some() {
                warn!("--name has no effect without --project");
            }
            info!(
                name: "config.loaded",
                mode = "open",
                base_url = %config.upstream.base_url,
                projects = server.bridge().projects().len(),
                "Configuration loaded"
            );
        }
        ToolMode::Locked(project) => info!(
            name: "config.loaded",
            mode = "locked",
            base_url = %config.upstream.base_url,
            project = %project.id,
            project_name = %project.name,
            domain = %project.domain,
            "Configuration loaded"
        ),
    }

    match config.server.transport {
        Transport::Stdio => server::serve_stdio(server).await,
        Transport::Http => {
            let shutdown = CancellationToken::new();
            let trigger = shutdown.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Shutdown signal received");
                        trigger.cancel();
                    }
                    Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
                }
            });
            server::serve_http(server, &config.bind_address(), shutdown).await
        }
    }
}
