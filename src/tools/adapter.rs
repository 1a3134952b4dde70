//! Query adapter shared by all tools.
//!
//! Every operation follows the same path: check the connection settings,
//! obtain a fresh client, build the KQL text, execute it against the
//! configured database and normalize the primary result table.

use crate::config::AdxConfig;
use crate::error::AdxResult;
use crate::kusto::{ClientFactory, KustoClient};
use crate::models::{Record, normalize};
use std::sync::Arc;
use tracing::debug;

/// Rows returned by `sample_table_data` when no size is given.
pub const DEFAULT_SAMPLE_SIZE: i64 = 10;

/// Control command listing the tables of the current database.
pub const LIST_TABLES_QUERY: &str = ".show tables | project TableName, Folder, DatabaseName";

/// Schema command for `table_name`. The name is inserted as given.
pub fn table_schema_query(table_name: &str) -> String {
    format!(".show table {} | getschema", table_name)
}

/// Random sample of `sample_size` rows from `table_name`. Both are inserted as given;
/// Kusto rejects a negative size.
pub fn sample_query(table_name: &str, sample_size: i64) -> String {
    format!("{} | sample {}", table_name, sample_size)
}

/// Translates tool invocations into Kusto queries.
#[derive(Clone)]
pub struct QueryAdapter {
    config: Arc<AdxConfig>,
    factory: Arc<dyn ClientFactory>,
}

impl QueryAdapter {
    pub fn new(config: Arc<AdxConfig>, factory: Arc<dyn ClientFactory>) -> Self {
        Self { config, factory }
    }

    /// Build a new authenticated client. No handle is reused across calls.
    pub fn get_client(&self) -> AdxResult<Box<dyn KustoClient>> {
        let credentials = self.config.credentials()?;
        let client = self.factory.create(&self.config.cluster_url, credentials)?;
        Ok(client)
    }

    /// Run a caller-supplied KQL query or control command verbatim.
    pub async fn execute_query(&self, query: &str) -> AdxResult<Vec<Record>> {
        self.run(query).await
    }

    /// List the tables of the configured database.
    pub async fn list_tables(&self) -> AdxResult<Vec<Record>> {
        self.run(LIST_TABLES_QUERY).await
    }

    /// Column names and types of `table_name`.
    pub async fn get_table_schema(&self, table_name: &str) -> AdxResult<Vec<Record>> {
        self.run(&table_schema_query(table_name)).await
    }

    /// Up to `sample_size` random rows from `table_name`.
    pub async fn sample_table_data(
        &self,
        table_name: &str,
        sample_size: i64,
    ) -> AdxResult<Vec<Record>> {
        self.run(&sample_query(table_name, sample_size)).await
    }

    async fn run(&self, query: &str) -> AdxResult<Vec<Record>> {
        self.config.ensure_connection()?;
        let client = self.get_client()?;

        debug!(
            database = %self.config.database,
            query_len = query.len(),
            "Executing Kusto query"
        );
        let result_set = client.execute(&self.config.database, query).await?;
        let records = normalize(Some(&result_set));
        debug!(row_count = records.len(), "Kusto query completed");

        Ok(records)
    }
}
