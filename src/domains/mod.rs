//! Domains module containing business logic organized by bounded contexts.
//!
//! - `tools` - the MCP tools and their dispatch
//! - `resources` - readable resources (the insights memo)
//! - `prompts` - prompt templates
//! - `insights` - in-process memo shared by a tool and a resource
//! - `stats` - pure guess statistics
//! - `models` - row records and response views

pub mod insights;
pub mod models;
pub mod prompts;
pub mod resources;
pub mod stats;
pub mod tools;
