//! MCP tool handlers.

pub mod find;
pub mod index_status;
pub mod reload_index;
