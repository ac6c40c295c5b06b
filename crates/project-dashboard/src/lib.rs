//! Project Dashboard
//!
//! Multi-source project status aggregation. For one configured project it queries GitHub,
//! Heroku and arbitrary HTTP endpoints concurrently, contains each source's failure and
//! merges whatever succeeded into a single document.
//!
//! # Surfaces
//! - MCP server over stdio (`mcp`)
//! - HTTP API (`handler`)
//! - CLI one-shots (the `project-dashboard` binary)
//!
//! # Design Principles
//! - Partial success: one source failing never hides the others
//! - Stateless: nothing is cached or persisted between calls
//! - Explicit configuration: the environment is read once, by the binary

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod mapper;
pub mod mcp;
pub mod registry;
pub mod telemetry;
pub mod tools;

// Re-export contracts
#[path = "../contracts/mod.rs"]
pub mod contracts;

pub use config::{Credentials, DashboardConfig};
pub use contracts::*;
pub use engine::{ItemState, StatusEngine};
pub use error::{DashboardError, Result};
