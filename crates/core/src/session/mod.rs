//! Login session and account operations

pub mod service;

pub use service::{RoleProfile, SessionService};
