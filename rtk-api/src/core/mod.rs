//! Core types used on both sides of the syscall boundary

pub mod types;
