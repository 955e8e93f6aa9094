//! New Relic MCP server - NRQL tools for logs and APM data.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod mcp;
pub mod newrelic;
pub mod nrql;
pub mod tools;
