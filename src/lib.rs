//! design-system-mcp: MCP server exposing a component design system to AI assistants
//!
//! The server reads a React/Tailwind design system straight from its sources
//! and answers questions about it: which components exist, their props and
//! variants, the theme's design tokens. It also generates the files a consumer
//! project needs to adopt the theme or copy components.
//!
//! Nothing is written to disk. Generated files are returned to the client,
//! which decides what to do with them.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`design_system`]: Component and token extraction from source text
//! - [`error`]: Configuration error types
//! - [`integration`]: Theme and component file generation
//! - [`mcp`]: MCP protocol implementation

pub mod config;
pub mod design_system;
pub mod error;
pub mod integration;
pub mod mcp;
