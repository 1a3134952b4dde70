//! Normalized query records.
//!
//! A result table is turned into a sequence of [`Record`]s, each mapping
//! column name to value in source column order.

use crate::kusto::{KustoResultSet, KustoValue};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;

/// One normalized row. Keys keep the order of the source columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, KustoValue)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&KustoValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, KustoValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, KustoValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl JsonSchema for Record {
    fn schema_name() -> Cow<'static, str> {
        "Record".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "description": "One result row: column name to value (string, number, boolean, null, or nested JSON for dynamic columns)",
            "additionalProperties": true
        })
    }
}

/// Normalize a result set into records.
///
/// Only the first primary table is consumed. A missing result set or one
/// without primary tables yields an empty vector.
pub fn normalize(result_set: Option<&KustoResultSet>) -> Vec<Record> {
    let Some(table) = result_set.and_then(KustoResultSet::primary) else {
        return Vec::new();
    };

    let columns: Vec<&str> = table
        .columns
        .iter()
        .map(|c| c.column_name.as_str())
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .zip(row)
                .map(|(name, value)| (*name, value.clone()))
                .collect::<Record>()
        })
        .collect()
}
