//! MCP module
//!
//! Stdio tool server wrapping a [`crate::tools::Session`].

mod server;

pub use server::DietLogService;
