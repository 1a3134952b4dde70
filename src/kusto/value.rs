//! Kusto scalar values.
//!
//! Cells arrive as JSON and are decoded according to the declared column
//! type into a [`KustoValue`], which serializes back to plain JSON scalars.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// A single cell value from a Kusto result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KustoValue {
    Null,
    Bool(bool),
    /// `int` and `long` columns
    Long(i64),
    /// `real` columns
    Real(f64),
    /// `decimal` columns, kept in the exact textual form the service sent
    Decimal(String),
    /// `string` and `guid` columns
    String(String),
    /// `datetime` columns
    DateTime(DateTime<Utc>),
    /// `timespan` columns, e.g. `1.02:03:04.5000000`
    Timespan(String),
    /// `dynamic` columns and cells that do not match their declared type
    Dynamic(JsonValue),
}

/// Logical Kusto column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    Long,
    Real,
    Decimal,
    String,
    DateTime,
    Timespan,
    Dynamic,
}

impl ColumnKind {
    /// Classify a Kusto type name. Accepts both the `ColumnType` names
    /// (`long`, `datetime`) and the .NET `DataType` names (`Int64`, `DateTime`).
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name.to_ascii_lowercase().as_str() {
            "bool" | "boolean" | "sbyte" => Self::Bool,
            "int" | "long" | "int32" | "int64" => Self::Long,
            "real" | "double" => Self::Real,
            "decimal" | "sqldecimal" => Self::Decimal,
            "datetime" | "date" => Self::DateTime,
            "timespan" | "time" => Self::Timespan,
            "dynamic" | "object" => Self::Dynamic,
            // string, guid, uniqueid and anything we do not know
            _ => Self::String,
        }
    }
}

impl KustoValue {
    /// Decode a v2 cell according to its column type.
    ///
    /// `dynamic` cells are native JSON here, so a string stays a string.
    pub fn from_json(kind: ColumnKind, raw: JsonValue) -> Self {
        if raw.is_null() {
            return Self::Null;
        }

        match (kind, raw) {
            (ColumnKind::Bool, JsonValue::Bool(b)) => Self::Bool(b),
            // v1 management responses may encode booleans as 0/1
            (ColumnKind::Bool, JsonValue::Number(n)) if n.as_i64().is_some() => {
                Self::Bool(n.as_i64() != Some(0))
            }
            (ColumnKind::Long, JsonValue::Number(n)) => match n.as_i64() {
                Some(v) => Self::Long(v),
                None => Self::Dynamic(JsonValue::Number(n)),
            },
            (ColumnKind::Real, JsonValue::Number(n)) => match n.as_f64() {
                Some(v) => Self::Real(v),
                None => Self::Dynamic(JsonValue::Number(n)),
            },
            // NaN and infinities arrive as strings
            (ColumnKind::Real, JsonValue::String(s)) => match parse_special_real(&s) {
                Some(v) => Self::Real(v),
                None => Self::String(s),
            },
            (ColumnKind::Decimal, JsonValue::String(s)) => Self::Decimal(s),
            (ColumnKind::Decimal, JsonValue::Number(n)) => Self::Decimal(n.to_string()),
            (ColumnKind::DateTime, JsonValue::String(s)) => {
                match DateTime::parse_from_rfc3339(&s) {
                    Ok(dt) => Self::DateTime(dt.with_timezone(&Utc)),
                    Err(_) => Self::String(s),
                }
            }
            (ColumnKind::Timespan, JsonValue::String(s)) => Self::Timespan(s),
            (ColumnKind::String, JsonValue::String(s)) => Self::String(s),
            (_, other) => Self::Dynamic(other),
        }
    }

    /// Decode a v1 management cell. `dynamic` values arrive as JSON text.
    pub fn from_v1_json(kind: ColumnKind, raw: JsonValue) -> Self {
        match (kind, raw) {
            (ColumnKind::Dynamic, JsonValue::String(s)) => {
                match serde_json::from_str::<JsonValue>(&s) {
                    Ok(parsed) => Self::Dynamic(parsed),
                    Err(_) => Self::String(s),
                }
            }
            (kind, raw) => Self::from_json(kind, raw),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the value as a string slice for string-like variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Decimal(s) | Self::Timespan(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }
}

fn parse_special_real(s: &str) -> Option<f64> {
    match s {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => s.parse().ok(),
    }
}

impl From<&str> for KustoValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for KustoValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for KustoValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for KustoValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for KustoValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<DateTime<Utc>> for KustoValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}
