//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the directive engine to AI assistants over stdio.
//!
//! ## Module Structure
//!
//! - `server`: MCP server and its tools
//! - `types`: Tool parameter and result types

mod server;
pub mod types;

pub use server::{IfdefMcpServer, run_server};
