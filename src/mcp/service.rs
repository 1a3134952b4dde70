//! MCP service implementation using rmcp.
//!
//! This module defines the AdxService struct with the Azure Data Explorer
//! tools exposed via the MCP protocol using the rmcp framework's macros.

use crate::error::AdxResult;
use crate::models::Record;
use crate::tools::{
    ExecuteQueryInput, GetTableSchemaInput, QueryAdapter, RecordsOutput, SampleTableDataInput,
};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AdxService {
    /// Shared query adapter for all tool invocations
    adapter: Arc<QueryAdapter>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl AdxService {
    pub fn new(adapter: Arc<QueryAdapter>) -> Self {
        Self {
            adapter,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_output(result: AdxResult<Vec<Record>>) -> Result<Json<RecordsOutput>, McpError> {
    result.map(|records| Json(records.into())).map_err(McpError::from)
}

#[tool_router]
impl AdxService {
    #[tool(
        description = "Executes a Kusto Query Language (KQL) query against the configured Azure Data Explorer database and returns the results as a list of records.\nControl commands starting with '.' are also accepted."
    )]
    async fn execute_query(
        &self,
        Parameters(input): Parameters<ExecuteQueryInput>,
    ) -> Result<Json<RecordsOutput>, McpError> {
        to_output(self.adapter.execute_query(&input.query).await)
    }

    #[tool(
        description = "Retrieves a list of all tables available in the configured Azure Data Explorer database, including their names, folders, and database associations."
    )]
    async fn list_tables(&self) -> Result<Json<RecordsOutput>, McpError> {
        to_output(self.adapter.list_tables().await)
    }

    #[tool(
        description = "Retrieves the schema information for a specified table in the Azure Data Explorer database, including column names, data types, and other schema-related metadata."
    )]
    async fn get_table_schema(
        &self,
        Parameters(input): Parameters<GetTableSchemaInput>,
    ) -> Result<Json<RecordsOutput>, McpError> {
        to_output(self.adapter.get_table_schema(&input.table_name).await)
    }

    #[tool(
        description = "Retrieves a random sample of rows from the specified table in the Azure Data Explorer database. The sample_size parameter controls how many rows to return (default: 10)."
    )]
    async fn sample_table_data(
        &self,
        Parameters(input): Parameters<SampleTableDataInput>,
    ) -> Result<Json<RecordsOutput>, McpError> {
        to_output(
            self.adapter
                .sample_table_data(&input.table_name, input.sample_size)
                .await,
        )
    }
}

#[tool_handler]
impl ServerHandler for AdxService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "adx-mcp-server".to_owned(),
                title: Some("Azure Data Explorer MCP".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only tools for an Azure Data Explorer (Kusto) database.\n\
                \n\
                ## Workflow\n\
                1. Call `list_tables` to discover tables\n\
                2. Call `get_table_schema` to see column names and types\n\
                3. Call `sample_table_data` to look at a few rows\n\
                4. Use `execute_query` for KQL, e.g. `StormEvents | summarize count() by State | top 5 by count_`\n\
                \n\
                ## Notes\n\
                - Every tool returns `records` (one object per row) and `row_count`\n\
                - Queries run against the database configured on the server; there is no database parameter\n\
                - Prefer `take`/`top`/`summarize` to keep result sets small; results are not paginated"
                    .to_string(),
            ),
        }
    }
}
