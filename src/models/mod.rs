//! Data models for the ADX MCP Server.
//!
//! This module contains the normalized record type returned by every tool.

pub mod record;

pub use record::{Record, normalize};
