//! Error types for the ADX MCP Server.
//!
//! Two kinds of failure reach a tool caller: configuration errors, raised
//! locally before any network call, and execution errors, which are whatever
//! the Kusto client reported and are passed through unchanged.

use thiserror::Error;

/// Errors raised by the Kusto client collaborator.
#[derive(Error, Debug)]
pub enum KustoError {
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Kusto request failed with HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Failed to decode Kusto response: {message}")]
    Decode { message: String },

    #[error("Invalid cluster URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl KustoError {
    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a query error reported by the service.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a response decoding error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an invalid cluster URL error.
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// True when the service rejected the query text itself.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            Self::Query { .. } | Self::Http { status: 400, .. }
        )
    }
}

impl From<reqwest::Error> for KustoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            KustoError::decode(err.to_string())
        } else if let Some(status) = err.status() {
            KustoError::http(status.as_u16(), err.to_string())
        } else {
            KustoError::connection(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum AdxError {
    #[error("{message}")]
    Configuration { message: String, suggestion: String },

    #[error(transparent)]
    Execution(#[from] KustoError),

    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl AdxError {
    /// Create a configuration error with a helpful suggestion.
    pub fn configuration(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Cluster URL or database is not set.
    pub fn connection_missing() -> Self {
        Self::configuration(
            "Azure Data Explorer configuration is missing. Please set ADX_CLUSTER_URL and ADX_DATABASE environment variables.",
            "Set ADX_CLUSTER_URL (e.g. https://mycluster.westeurope.kusto.windows.net) and ADX_DATABASE",
        )
    }

    /// Tenant, client or secret is not set.
    pub fn credentials_missing() -> Self {
        Self::configuration(
            "Client credentials are missing. Please set AZURE_TENANT_ID, AZURE_CLIENT_ID, and AZURE_CLIENT_SECRET environment variables.",
            "Register an Azure AD application with access to the database and export its tenant id, client id and secret",
        )
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Configuration { suggestion, .. } => Some(suggestion),
            Self::Execution(KustoError::Auth { .. }) => {
                Some("Check that the application has viewer rights on the database")
            }
            Self::Execution(err) if err.is_query_error() => {
                Some("Check the KQL syntax and the referenced tables and columns")
            }
            _ => None,
        }
    }
}

/// Result type alias for ADX operations.
pub type AdxResult<T> = Result<T, AdxError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert AdxError to MCP ErrorData.
/// Includes the suggestion field in the `data` object when available.
impl From<AdxError> for rmcp::ErrorData {
    fn from(err: AdxError) -> Self {
        let data = suggestion_data(err.suggestion());
        match &err {
            AdxError::Execution(kusto) if kusto.is_query_error() => {
                rmcp::ErrorData::invalid_params(err.to_string(), data)
            }
            _ => rmcp::ErrorData::internal_error(err.to_string(), data),
        }
    }
}
