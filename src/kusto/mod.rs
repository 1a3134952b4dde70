//! Azure Data Explorer (Kusto) client.
//!
//! The query adapter only sees the [`KustoClient`] and [`ClientFactory`]
//! traits. [`HttpClientFactory`] is the production implementation talking
//! to the Kusto REST API; tests plug in their own factories.

pub mod client;
pub mod response;
pub mod token;
pub mod value;

pub use client::{HttpClientFactory, HttpKustoClient};
pub use value::{ColumnKind, KustoValue};

use crate::config::ClientCredentials;
use crate::error::KustoError;
use async_trait::async_trait;

/// Column metadata of a result table.
#[derive(Debug, Clone, PartialEq)]
pub struct KustoColumn {
    pub column_name: String,
    pub column_type: String,
}

impl KustoColumn {
    pub fn new(column_name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            column_type: column_type.into(),
        }
    }
}

/// One tabular result. Each row is aligned positionally with `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KustoTable {
    pub table_name: String,
    pub columns: Vec<KustoColumn>,
    pub rows: Vec<Vec<KustoValue>>,
}

/// The tables a query produced that hold its actual results.
///
/// Service-side metadata tables (query properties, completion information)
/// are dropped while the response is parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KustoResultSet {
    pub primary_results: Vec<KustoTable>,
}

impl KustoResultSet {
    pub fn new(primary_results: Vec<KustoTable>) -> Self {
        Self { primary_results }
    }

    /// The first primary table, if any.
    pub fn primary(&self) -> Option<&KustoTable> {
        self.primary_results.first()
    }
}

/// An authenticated handle able to run queries and control commands.
#[async_trait]
pub trait KustoClient: Send + Sync {
    /// Run `query` against `database`. Text starting with `.` is a control command.
    async fn execute(&self, database: &str, query: &str) -> Result<KustoResultSet, KustoError>;
}

/// Builds a fresh client handle for every tool invocation.
pub trait ClientFactory: Send + Sync {
    fn create(
        &self,
        cluster_url: &str,
        credentials: ClientCredentials<'_>,
    ) -> Result<Box<dyn KustoClient>, KustoError>;
}

/// Control commands start with a dot and go to the management endpoint.
pub fn is_control_command(query: &str) -> bool {
    query.trim_start().starts_with('.')
}
