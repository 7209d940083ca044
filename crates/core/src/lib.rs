//! # EyeCare Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Response shape normalization
//! - Port/adapter interfaces (traits) for the backend and session store
//! - Directory and session services
//!
//! ## Architecture Principles
//! - Only depends on `eyecare-common` and `eyecare-domain`
//! - No database or HTTP code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod directory;
pub mod fetch;
pub mod normalize;
pub mod ports;
pub mod session;

// Re-export specific items to avoid ambiguity
pub use directory::{DirectoryService, ResultSource, SearchOutcome};
pub use fetch::{Fetcher, TransientErrors};
pub use normalize::{
    accepted, decode_record, detect_shape, normalize_list, normalize_records, single_record,
    EnvelopeShape, RecordKind,
};
pub use ports::{KeyValueStore, PortalApi};
pub use session::{RoleProfile, SessionService};
