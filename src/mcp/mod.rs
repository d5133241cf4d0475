//! Model Context Protocol (MCP) server implementation
//!
//! This module provides an MCP server using the Streamable HTTP transport.
//! Every planner operation is exposed as one MCP tool.
//!
//! - **server**: [`McpServer`], the tool router over a shared [`Planner`](crate::planner::Planner)
//! - **service**: Streamable HTTP service construction for mounting in axum

pub mod server;
mod service;

#[cfg(test)]
mod server_test;

pub use server::McpServer;
pub use service::create_mcp_service;
