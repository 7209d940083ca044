//! Doctor and patient directory
//!
//! Every read goes through the retry policy and then the response
//! normalizer, so callers receive decoded records regardless of envelope.

pub mod service;

pub use service::{
    filter_doctors, filter_patients, rank_by_rating, DirectoryService, ResultSource,
    SearchOutcome,
};
