//! Wide scalar packing
//!
//! A 64-bit argument always travels as two consecutive slots, low half
//! first, and each slot carries 32 significant bits. The layout is the same
//! whatever the native word size, so a stub built for a 32-bit caller and a
//! 64-bit kernel agree on it.

use crate::core::types::Word;

/// Bits of a slot that belong to one half of a wide scalar
pub const WIDE_HALF_MASK: u64 = 0xffff_ffff;

/// Split a wide scalar into its `(lo, hi)` slots
#[inline]
pub const fn split_wide(value: u64) -> (Word, Word) {
    let lo = (value & WIDE_HALF_MASK) as Word;
    let hi = ((value >> 32) & WIDE_HALF_MASK) as Word;
    (lo, hi)
}

/// Rebuild a wide scalar from its `(lo, hi)` slots
///
/// Bits above the low 32 of either slot are not part of the value.
#[inline]
pub const fn join_wide(lo: Word, hi: Word) -> u64 {
    (((hi as u64) & WIDE_HALF_MASK) << 32) | ((lo as u64) & WIDE_HALF_MASK)
}
