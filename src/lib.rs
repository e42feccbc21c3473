//! Copy image files to the system clipboard, directly or through a method
//! channel (`copyImage`) and an MCP tool.

pub mod bridge;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod image_copy;
pub mod mcp;
pub mod utils;
