//! Milk Standardization Manager (milkstd) Library
//!
//! Pearson Square milk fat standardization with printable reports.

pub mod build_info;
pub mod config;
pub mod mcp;
pub mod models;
pub mod standardization;
pub mod tools;
