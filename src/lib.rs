//! screencap-mcp: macOS screenshot MCP server
//!
//! This library provides Model Context Protocol (MCP) server functionality
//! for capturing macOS screenshots. Each tool call shells out to the system
//! `screencapture` utility and persists the result under a fixed output
//! directory; a listing tool reports previously saved captures.

pub mod capture;
pub mod error;
pub mod mcp;
pub mod model;
pub mod output;
