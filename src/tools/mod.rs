//! MCP tool implementations.
//!
//! - `execute_query`: Run a KQL query or control command
//! - `list_tables`: List tables in the configured database
//! - `get_table_schema`: Column names and types of a table
//! - `sample_table_data`: Random rows from a table
//!
//! All four go through [`QueryAdapter`].

pub mod adapter;
pub mod query;
pub mod schema;

pub use adapter::{DEFAULT_SAMPLE_SIZE, QueryAdapter};
pub use query::{ExecuteQueryInput, RecordsOutput};
pub use schema::{GetTableSchemaInput, SampleTableDataInput};
