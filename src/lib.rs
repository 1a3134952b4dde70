//! ADX MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to query an Azure Data Explorer (Kusto) database: run KQL, list tables,
//! inspect schemas and sample rows.

pub mod config;
pub mod error;
pub mod kusto;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::{AdxConfig, Config};
pub use error::{AdxError, KustoError};
pub use mcp::AdxService;
pub use tools::QueryAdapter;
