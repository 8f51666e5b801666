//! Diet Log Library
//!
//! Food, recipe, exercise and daily log tracking backed by plain text files.

pub mod build_info;
pub mod mcp;
pub mod models;
pub mod store;
pub mod tools;
