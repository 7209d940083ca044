//! Commands - the application's entry points
//!
//! Each command times and logs itself and returns `Result<T, String>`, with
//! the domain error rendered through its `Display` form.

mod directory;
mod session;

pub use directory::*;
pub use session::*;
