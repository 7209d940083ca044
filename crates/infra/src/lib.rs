//! # EyeCare Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The HTTP client for the portal backend
//! - Session store implementations (in-memory and SQLite)
//! - Configuration loading from the environment and files
//!
//! ## Architecture
//! - Implements traits defined in `eyecare-core`
//! - Contains all "impure" code (I/O, network, filesystem)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod storage;

// Re-export commonly used items
pub use api::PortalApiClient;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use storage::{open_store, MemoryStore, SqliteStore};
