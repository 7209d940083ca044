//! # EyeCare App
//!
//! Application layer - commands and the command-line entry point.
//!
//! This crate contains:
//! - Commands (the boundary the CLI, or any other front end, calls)
//! - Application context (dependency injection)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use utils::logging::init_tracing;
