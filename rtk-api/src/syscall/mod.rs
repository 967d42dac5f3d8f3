//! System call boundary types
//!
//! Raw slots, the packing kinds that describe how typed arguments map onto
//! them, and the wide-scalar split used for 64-bit arguments.

pub mod types;
pub mod wide;

pub use types::*;
pub use wide::{WIDE_HALF_MASK, join_wide, split_wide};
