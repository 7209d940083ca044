//! # EyeCare Domain
//!
//! Business domain types and models for the eye-care portal client.
//!
//! This crate contains:
//! - Directory and account records (Doctor, Patient, MedicalRecord, User)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other EyeCare crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
