//! Command helpers and logging setup

pub mod command_helpers;
pub mod logging;
