//! Response shape normalization
//!
//! The backend wraps record lists in several envelope shapes: a bare array,
//! `{data: [...]}`, `{success, data: [...]}`, `{data: {doctors: [...]}}` and
//! a few more. [`normalize_list`] locates the list in any of them and falls
//! back to an empty list when nothing matches, so callers never branch on the
//! envelope themselves.
//!
//! Detection order is fixed; see [`EnvelopeShape`]. Single records and
//! write acknowledgements are handled in [`entity`].

pub mod entity;
pub mod shape;

pub use entity::{accepted, decode_record, single_record};

pub use shape::{
    detect_shape, is_truthy, normalize_list, normalize_records, EnvelopeShape, RecordKind,
};
