//! Query execution tool.
//!
//! This module defines the input of the `execute_query` MCP tool and the
//! output shape shared by every tool.

use crate::models::Record;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input for the execute_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteQueryInput {
    /// KQL query or control command (starting with '.') to run against the configured database
    pub query: String,
}

/// Output of every tool: the normalized rows of the primary result table.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RecordsOutput {
    /// One object per row, keys in column order
    pub records: Vec<Record>,
    /// Number of records returned
    pub row_count: usize,
}

impl From<Vec<Record>> for RecordsOutput {
    fn from(records: Vec<Record>) -> Self {
        let row_count = records.len();
        Self { records, row_count }
    }
}
