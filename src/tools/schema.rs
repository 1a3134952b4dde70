//! Schema introspection tools.
//!
//! Inputs for the `get_table_schema` and `sample_table_data` MCP tools.
//! `list_tables` takes no parameters.

use crate::tools::DEFAULT_SAMPLE_SIZE;
use schemars::JsonSchema;
use serde::Deserialize;

/// Input for the get_table_schema tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTableSchemaInput {
    /// Name of the table to describe
    pub table_name: String,
}

/// Input for the sample_table_data tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SampleTableDataInput {
    /// Name of the table to sample
    pub table_name: String,
    /// Number of rows to return. Default: 10
    #[serde(default = "default_sample_size")]
    pub sample_size: i64,
}

fn default_sample_size() -> i64 {
    DEFAULT_SAMPLE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sample_size_defaults_to_ten() {
        let input: SampleTableDataInput =
            serde_json::from_value(json!({"table_name": "StormEvents"})).unwrap();
        assert_eq!(input.table_name, "StormEvents");
        assert_eq!(input.sample_size, 10);
    }

    #[test]
    fn test_sample_size_provided() {
        let input: SampleTableDataInput =
            serde_json::from_value(json!({"table_name": "T", "sample_size": 5})).unwrap();
        assert_eq!(input.sample_size, 5);
    }

    #[test]
    fn test_negative_sample_size_forwarded() {
        let input: SampleTableDataInput =
            serde_json::from_value(json!({"table_name": "T", "sample_size": -1})).unwrap();
        assert_eq!(input.sample_size, -1);
    }

    #[test]
    fn test_null_sample_size_rejected() {
        let result: Result<SampleTableDataInput, _> =
            serde_json::from_value(json!({"table_name": "T", "sample_size": null}));
        assert!(result.is_err());
    }

    #[test]
    fn test_table_name_required() {
        let result: Result<GetTableSchemaInput, _> = serde_json::from_value(json!({}));
        assert!(result.is_err());
    }
}
