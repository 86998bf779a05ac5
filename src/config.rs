//! Command line and layered configuration.
//!
//! Priority, highest first: CLI flag, the flag's env var, prefixed
//! environment (`MINTLIFY_MCP__SECTION__KEY`), config file, defaults.

use std::collections::HashMap;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::assistant::{AssistantSettings, DEFAULT_BASE_URL, ProjectEntry, ProjectRegistry};
use crate::mcp::ToolMode;

/// Prefix of structured environment overrides.
pub const ENV_PREFIX: &str = "MINTLIFY_MCP";

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_NAME: &str = "mintlify-mcp";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "MCP server that answers questions using Mintlify documentation assistants",
    long_about = None
)]
pub struct Cli {
    /// Lock the server to one project id (exposes `ask` and `clear_history`)
    #[arg(short, long, env = "MINTLIFY_PROJECT")]
    pub project: Option<String>,

    /// Display name of the locked project
    #[arg(short, long, env = "MINTLIFY_PROJECT_NAME")]
    pub name: Option<String>,

    /// Config file path (yaml, toml or json)
    #[arg(short, long, env = "MINTLIFY_MCP_CONFIG")]
    pub config: Option<String>,

    /// Transport to serve MCP over
    #[arg(long, value_enum, env = "MINTLIFY_MCP_TRANSPORT")]
    pub transport: Option<Transport>,

    /// Address to bind the HTTP transport to
    #[arg(long, env = "MINTLIFY_MCP_HOST")]
    pub host: Option<String>,

    /// Port for the HTTP transport
    #[arg(long, env = "MINTLIFY_MCP_PORT")]
    pub port: Option<u16>,

    /// Assistant API base URL
    #[arg(long, env = "MINTLIFY_BASE_URL")]
    pub base_url: Option<String>,
}

/// MCP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Line-delimited JSON-RPC over stdin/stdout.
    Stdio,
    /// Streamable HTTP at `/mcp`.
    Http,
}

impl Transport {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub locked: LockedConfig,
    /// Extra projects, merged over the built-in registry.
    #[serde(default)]
    pub projects: HashMap<String, ProjectEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Whole-request timeout in seconds; `0` disables it.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LockedConfig {
    pub project: Option<String>,
    pub name: Option<String>,
}

impl AppConfig {
    /// Parse `args` as a command line and build the configuration.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Build the configuration from already parsed flags.
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("upstream.base_url", DEFAULT_BASE_URL)?
            .set_default("upstream.timeout_secs", 60)?
            .set_default("server.transport", Transport::Stdio.as_str())?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.format", "text")?;

        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        // E.g. MINTLIFY_MCP__UPSTREAM__BASE_URL=http://localhost:4000
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        // CLI flags (and their env fallbacks, handled by clap) win over everything.
        if let Some(project) = &cli.project {
            builder = builder.set_override("locked.project", project.as_str())?;
        }
        if let Some(name) = &cli.name {
            builder = builder.set_override("locked.name", name.as_str())?;
        }
        if let Some(transport) = cli.transport {
            builder = builder.set_override("server.transport", transport.as_str())?;
        }
        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(base_url) = &cli.base_url {
            builder = builder.set_override("upstream.base_url", base_url.as_str())?;
        }

        builder.build()?.try_deserialize()
    }

    /// Settings for the assistant HTTP client.
    #[must_use]
    pub fn assistant_settings(&self) -> AssistantSettings {
        AssistantSettings {
            base_url: self.upstream.base_url.clone(),
            timeout: (self.upstream.timeout_secs > 0)
                .then(|| Duration::from_secs(self.upstream.timeout_secs)),
        }
    }

    /// Built-in projects plus the configured ones.
    #[must_use]
    pub fn project_registry(&self) -> ProjectRegistry {
        ProjectRegistry::builtin().with_entries(&self.projects)
    }

    /// Tool set to expose: locked when a project is configured.
    #[must_use]
    pub fn tool_mode(&self, registry: &ProjectRegistry) -> ToolMode {
        let Some(id) = self
            .locked
            .project
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            return ToolMode::Open;
        };

        let mut project = registry.resolve(id);
        if let Some(name) = self.locked.name.as_deref().filter(|n| !n.trim().is_empty()) {
            project.name = name.trim().to_string();
        }
        ToolMode::Locked(project)
    }

    /// `host:port` for the HTTP transport.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
