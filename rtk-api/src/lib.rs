//! RTK API - Core types shared across the user/kernel syscall boundary
//!
//! This crate provides the types both sides of a system call agree on:
//! raw argument words, the typed arguments they decode into, the packing
//! scheme for wide scalars, error codes and the kernel version record.
//!
//! # Architecture
//!
//! - **Core**: Fundamental identifier types and errno codes
//! - **Error**: Common error type and `Result` alias
//! - **Syscall**: Argument slots, packing kinds and return values
//! - **Version**: Build-time kernel version metadata
//!
//! # Usage
//!
//! ```rust
//! use rtk_api::syscall::{join_wide, split_wide};
//!
//! let (lo, hi) = split_wide(1_000_000);
//! assert_eq!(join_wide(lo, hi), 1_000_000);
//! ```

#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

// Core modules
pub mod core;
pub mod error;
pub mod syscall;
pub mod version;

// Re-export commonly used types
pub use crate::core::types::*;
pub use crate::error::{Error, Result};
pub use crate::version::{KernelVersion, get_version};
