//! MCP Tools
//!
//! Tool implementations for the milkstd MCP server.

pub mod calculator;
pub mod diagram;
pub mod reports;
pub mod status;
