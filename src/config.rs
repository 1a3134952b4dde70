//! Configuration handling for the ADX MCP Server.
//!
//! The server reads its connection parameters from CLI arguments with
//! environment fallbacks. Missing values become empty strings; validation is
//! deferred to each tool call so the server can start and report a useful
//! error through the protocol.

use crate::error::{AdxError, AdxResult};
use clap::{Parser, ValueEnum};
use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

pub const ENV_CLUSTER_URL: &str = "ADX_CLUSTER_URL";
pub const ENV_DATABASE: &str = "ADX_DATABASE";
pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const ENV_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Connection parameters for one Azure Data Explorer database.
///
/// Built once at startup and shared read-only between tool invocations.
#[derive(Debug)]
pub struct AdxConfig {
    pub cluster_url: String,
    pub database: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub authority_host: String,
}

/// Borrowed service principal credentials, only handed out when complete.
#[derive(Debug, Clone, Copy)]
pub struct ClientCredentials<'a> {
    pub tenant_id: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a SecretString,
    pub authority_host: &'a str,
}

impl AdxConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Absent keys become empty strings.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        let authority_host = lookup(ENV_AUTHORITY_HOST)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string());

        Self {
            cluster_url: get(ENV_CLUSTER_URL),
            database: get(ENV_DATABASE),
            tenant_id: get(ENV_TENANT_ID),
            client_id: get(ENV_CLIENT_ID),
            client_secret: SecretString::from(get(ENV_CLIENT_SECRET)),
            authority_host,
        }
    }

    /// Ensure cluster URL and database are set.
    pub fn ensure_connection(&self) -> AdxResult<()> {
        if self.cluster_url.is_empty() || self.database.is_empty() {
            return Err(AdxError::connection_missing());
        }
        Ok(())
    }

    /// Credentials for the client factory. Partial credentials count as absent.
    pub fn credentials(&self) -> AdxResult<ClientCredentials<'_>> {
        if self.tenant_id.is_empty()
            || self.client_id.is_empty()
            || self.client_secret.expose_secret().is_empty()
        {
            return Err(AdxError::credentials_missing());
        }
        Ok(ClientCredentials {
            tenant_id: &self.tenant_id,
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            authority_host: &self.authority_host,
        })
    }
}

impl Default for AdxConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Configuration for the ADX MCP Server.
///
/// Not `Debug`: it holds the client secret in plain text until
/// [`Config::adx_config`] moves it into a `SecretString`.
#[derive(Clone, Parser)]
#[command(
    name = "adx-mcp-server",
    about = "MCP server for Azure Data Explorer - enables AI assistants to run KQL queries",
    version,
    author
)]
pub struct Config {
    /// Cluster URL, e.g. https://mycluster.westeurope.kusto.windows.net
    #[arg(long, env = ENV_CLUSTER_URL, default_value = "")]
    pub cluster_url: String,

    /// Database to run queries against
    #[arg(long, env = ENV_DATABASE, default_value = "")]
    pub database: String,

    /// Azure AD tenant of the service principal
    #[arg(long, env = ENV_TENANT_ID, default_value = "")]
    pub tenant_id: String,

    /// Application (client) id of the service principal
    #[arg(long, env = ENV_CLIENT_ID, default_value = "")]
    pub client_id: String,

    /// Client secret of the service principal
    #[arg(long, env = ENV_CLIENT_SECRET, default_value = "", hide_env_values = true)]
    pub client_secret: String,

    /// Azure AD authority host
    #[arg(long, env = ENV_AUTHORITY_HOST, default_value = DEFAULT_AUTHORITY_HOST)]
    pub authority_host: String,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "ADX_MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "ADX_MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "ADX_MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "ADX_MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "ADX_MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "ADX_MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            cluster_url: String::new(),
            database: String::new(),
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Connection parameters for the query adapter.
    pub fn adx_config(&self) -> AdxConfig {
        let authority_host = if self.authority_host.is_empty() {
            DEFAULT_AUTHORITY_HOST.to_string()
        } else {
            self.authority_host.clone()
        };
        AdxConfig {
            cluster_url: self.cluster_url.clone(),
            database: self.database.clone(),
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: SecretString::from(self.client_secret.clone()),
            authority_host,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
