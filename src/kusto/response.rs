//! Kusto REST response parsing.
//!
//! Queries use the v2 endpoint, which answers with a JSON array of frames.
//! Control commands use the v1 management endpoint, which answers with a
//! single object holding a `Tables` array.

use crate::error::KustoError;
use crate::kusto::{ColumnKind, KustoColumn, KustoResultSet, KustoTable, KustoValue};
use serde::Deserialize;
use serde_json::Value as JsonValue;

const PRIMARY_RESULT_KIND: &str = "PrimaryResult";

#[derive(Debug, Deserialize)]
#[serde(tag = "FrameType")]
enum Frame {
    DataTable(DataTableFrame),
    DataSetCompletion(CompletionFrame),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DataTableFrame {
    table_kind: String,
    table_name: String,
    columns: Vec<RawColumn>,
    rows: Vec<JsonValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CompletionFrame {
    #[serde(default)]
    has_errors: bool,
    #[serde(default)]
    cancelled: bool,
    #[serde(default)]
    one_api_errors: Vec<JsonValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawColumn {
    column_name: String,
    #[serde(default)]
    column_type: Option<String>,
    /// v1 only: .NET type name
    #[serde(default)]
    data_type: Option<String>,
}

impl RawColumn {
    fn into_column(self) -> KustoColumn {
        let column_type = self
            .column_type
            .or(self.data_type)
            .unwrap_or_else(|| "string".to_string());
        KustoColumn::new(self.column_name, column_type)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct V1Response {
    tables: Vec<V1Table>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct V1Table {
    table_name: String,
    columns: Vec<RawColumn>,
    rows: Vec<JsonValue>,
}

/// Parse a v2 query response body.
pub fn parse_v2(body: &str) -> Result<KustoResultSet, KustoError> {
    let frames: Vec<Frame> = serde_json::from_str(body)
        .map_err(|e| KustoError::decode(format!("invalid v2 response: {e}")))?;

    let mut primary_results = Vec::new();
    for frame in frames {
        match frame {
            Frame::DataTable(table) if table.table_kind == PRIMARY_RESULT_KIND => {
                primary_results.push(build_table(
                    table.table_name,
                    table.columns,
                    table.rows,
                    KustoValue::from_json,
                )?);
            }
            Frame::DataSetCompletion(completion) => {
                if completion.cancelled {
                    return Err(KustoError::query("query was cancelled"));
                }
                if completion.has_errors {
                    let message = completion
                        .one_api_errors
                        .first()
                        .and_then(one_api_message)
                        .unwrap_or_else(|| "query completed with errors".to_string());
                    return Err(KustoError::query(message));
                }
            }
            _ => {}
        }
    }

    Ok(KustoResultSet::new(primary_results))
}

/// Parse a v1 management response body. Every table counts as primary.
pub fn parse_v1(body: &str) -> Result<KustoResultSet, KustoError> {
    let response: V1Response = serde_json::from_str(body)
        .map_err(|e| KustoError::decode(format!("invalid v1 response: {e}")))?;

    let primary_results = response
        .tables
        .into_iter()
        .map(|t| {
            build_table(
                t.table_name,
                t.columns,
                t.rows,
                KustoValue::from_v1_json,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(KustoResultSet::new(primary_results))
}

/// Extract the most descriptive message from a service error body.
///
/// Handles both the `{"error": {...}}` envelope and a bare OneApi error.
pub fn error_message(body: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    one_api_message(&value)
}

fn one_api_message(value: &JsonValue) -> Option<String> {
    let error = value.get("error").unwrap_or(value);
    ["@message", "message"]
        .iter()
        .find_map(|key| error.get(key).and_then(JsonValue::as_str))
        .map(str::to_string)
}

fn build_table(
    table_name: String,
    columns: Vec<RawColumn>,
    raw_rows: Vec<JsonValue>,
    decode: fn(ColumnKind, JsonValue) -> KustoValue,
) -> Result<KustoTable, KustoError> {
    let columns: Vec<KustoColumn> = columns.into_iter().map(RawColumn::into_column).collect();
    let kinds: Vec<ColumnKind> = columns
        .iter()
        .map(|c| ColumnKind::from_type_name(&c.column_type))
        .collect();

    let mut rows = Vec::with_capacity(raw_rows.len());
    for raw in raw_rows {
        let cells = match raw {
            JsonValue::Array(cells) => cells,
            // Errors raised mid-stream are reported as an object in place of a row
            other => {
                let message = one_api_message(&other)
                    .or_else(|| {
                        other
                            .get("OneApiErrors")
                            .and_then(|errs| errs.get(0))
                            .and_then(one_api_message)
                    })
                    .unwrap_or_else(|| format!("unexpected row in table {table_name}"));
                return Err(KustoError::query(message));
            }
        };

        if cells.len() != columns.len() {
            return Err(KustoError::decode(format!(
                "row has {} cells but table {} has {} columns",
                cells.len(),
                table_name,
                columns.len()
            )));
        }

        rows.push(
            cells
                .into_iter()
                .zip(&kinds)
                .map(|(cell, kind)| decode(*kind, cell))
                .collect(),
        );
    }

    Ok(KustoTable {
        table_name,
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v2_body(frames: JsonValue) -> String {
        frames.to_string()
    }

    #[test]
    fn test_parse_v2_keeps_only_primary_results() {
        let body = v2_body(json!([
            {"FrameType": "DataSetHeader", "IsProgressive": false, "Version": "v2.0"},
            {"FrameType": "DataTable", "TableId": 0, "TableKind": "QueryProperties",
             "TableName": "@ExtendedProperties",
             "Columns": [{"ColumnName": "TableId", "ColumnType": "int"}],
             "Rows": [[1]]},
            {"FrameType": "DataTable", "TableId": 1, "TableKind": "PrimaryResult",
             "TableName": "PrimaryResult",
             "Columns": [
                {"ColumnName": "State", "ColumnType": "string"},
                {"ColumnName": "Count", "ColumnType": "long"}
             ],
             "Rows": [["TEXAS", 4701], ["KANSAS", 3166]]},
            {"FrameType": "DataTable", "TableId": 2, "TableKind": "QueryCompletionInformation",
             "TableName": "QueryCompletionInformation",
             "Columns": [{"ColumnName": "Level", "ColumnType": "int"}],
             "Rows": [[4]]},
            {"FrameType": "DataSetCompletion", "HasErrors": false, "Cancelled": false}
        ]));

        let set = parse_v2(&body).unwrap();
        assert_eq!(set.primary_results.len(), 1);
        let table = set.primary().unwrap();
        assert_eq!(table.columns[0].column_name, "State");
        assert_eq!(table.columns[1].column_type, "long");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], KustoValue::from("TEXAS"));
        assert_eq!(table.rows[1][1], KustoValue::Long(3166));
    }

    #[test]
    fn test_parse_v2_completion_errors() {
        let body = v2_body(json!([
            {"FrameType": "DataSetHeader", "IsProgressive": false, "Version": "v2.0"},
            {"FrameType": "DataSetCompletion", "HasErrors": true, "Cancelled": false,
             "OneApiErrors": [{"error": {
                "code": "LimitsExceeded",
                "message": "Request is invalid and cannot be executed.",
                "@message": "Query result set has exceeded the internal record count limit."
             }}]}
        ]));

        let err = parse_v2(&body).unwrap_err();
        assert!(matches!(err, KustoError::Query { .. }));
        assert!(err.to_string().contains("record count limit"));
    }

    #[test]
    fn test_parse_v2_inline_row_error() {
        let body = v2_body(json!([
            {"FrameType": "DataTable", "TableId": 1, "TableKind": "PrimaryResult",
             "TableName": "PrimaryResult",
             "Columns": [{"ColumnName": "x", "ColumnType": "long"}],
             "Rows": [[1], {"OneApiErrors": [{"error": {"message": "partial query failure"}}]}]}
        ]));

        let err = parse_v2(&body).unwrap_err();
        assert!(err.to_string().contains("partial query failure"));
    }

    #[test]
    fn test_parse_v2_ignores_unknown_frames() {
        let body = v2_body(json!([
            {"FrameType": "TableProgress", "TableId": 1, "TableProgress": 50.0},
            {"FrameType": "DataSetCompletion", "HasErrors": false, "Cancelled": false}
        ]));
        assert!(parse_v2(&body).unwrap().primary_results.is_empty());
    }

    #[test]
    fn test_parse_v2_rejects_garbage() {
        let err = parse_v2("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, KustoError::Decode { .. }));
    }

    #[test]
    fn test_parse_v2_rejects_ragged_rows() {
        let body = v2_body(json!([
            {"FrameType": "DataTable", "TableId": 1, "TableKind": "PrimaryResult",
             "TableName": "PrimaryResult",
             "Columns": [{"ColumnName": "a", "ColumnType": "long"},
                         {"ColumnName": "b", "ColumnType": "long"}],
             "Rows": [[1]]}
        ]));
        assert!(matches!(
            parse_v2(&body).unwrap_err(),
            KustoError::Decode { .. }
        ));
    }

    #[test]
    fn test_parse_v1_show_tables() {
        let body = json!({
            "Tables": [{
                "TableName": "Table_0",
                "Columns": [
                    {"ColumnName": "TableName", "DataType": "String", "ColumnType": "string"},
                    {"ColumnName": "Folder", "DataType": "String", "ColumnType": "string"},
                    {"ColumnName": "DatabaseName", "DataType": "String", "ColumnType": "string"}
                ],
                "Rows": [
                    ["StormEvents", "Samples", "Samples"],
                    ["PopulationData", null, "Samples"]
                ]
            }]
        })
        .to_string();

        let set = parse_v1(&body).unwrap();
        let table = set.primary().unwrap();
        assert_eq!(table.table_name, "Table_0");
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.rows[0][0], KustoValue::from("StormEvents"));
        assert!(table.rows[1][1].is_null());
    }

    #[test]
    fn test_parse_v1_falls_back_to_data_type() {
        let body = json!({
            "Tables": [{
                "TableName": "Table_0",
                "Columns": [{"ColumnName": "Count", "DataType": "Int64"}],
                "Rows": [[12]]
            }]
        })
        .to_string();

        let set = parse_v1(&body).unwrap();
        let table = set.primary().unwrap();
        assert_eq!(table.columns[0].column_type, "Int64");
        assert_eq!(table.rows[0][0], KustoValue::Long(12));
    }

    #[test]
    fn test_parse_v2_dynamic_strings_pass_through() {
        let body = v2_body(json!([
            {"FrameType": "DataTable", "TableId": 1, "TableKind": "PrimaryResult",
             "TableName": "PrimaryResult",
             "Columns": [{"ColumnName": "Payload", "ColumnType": "dynamic"}],
             "Rows": [["123"], ["true"], [{"tags": ["a"]}]]},
            {"FrameType": "DataSetCompletion", "HasErrors": false, "Cancelled": false}
        ]));

        let set = parse_v2(&body).unwrap();
        let rows = &set.primary().unwrap().rows;
        assert_eq!(rows[0][0], KustoValue::Dynamic(json!("123")));
        assert_eq!(rows[1][0], KustoValue::Dynamic(json!("true")));
        assert_eq!(rows[2][0], KustoValue::Dynamic(json!({"tags": ["a"]})));
        assert_eq!(serde_json::to_value(&rows[0][0]).unwrap(), json!("123"));
    }

    #[test]
    fn test_parse_v1_dynamic_text_is_parsed() {
        let body = json!({
            "Tables": [{
                "TableName": "Table_0",
                "Columns": [{"ColumnName": "Policy", "DataType": "Object", "ColumnType": "dynamic"}],
                "Rows": [["{\"SoftDeletePeriod\":\"365.00:00:00\"}"], ["123"]]
            }]
        })
        .to_string();

        let set = parse_v1(&body).unwrap();
        let rows = &set.primary().unwrap().rows;
        assert_eq!(
            rows[0][0],
            KustoValue::Dynamic(json!({"SoftDeletePeriod": "365.00:00:00"}))
        );
        assert_eq!(rows[1][0], KustoValue::Dynamic(json!(123)));
    }

    #[test]
    fn test_error_message_prefers_detailed_message() {
        let body = json!({"error": {
            "code": "BadRequest_SyntaxError",
            "message": "Request is invalid and cannot be executed.",
            "@message": "Syntax error: Query could not be parsed"
        }})
        .to_string();
        assert_eq!(
            error_message(&body).as_deref(),
            Some("Syntax error: Query could not be parsed")
        );
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("Service Unavailable"), None);
    }
}
