//! System call identifier definitions
//!
//! Identifiers are dense: each one is the index of its descriptor in
//! [`crate::SYSCALL_TABLE`].

use rtk_api::SyscallId;

/// Kernel object permission calls
pub const SYS_K_OBJECT_ACCESS_GRANT: SyscallId = 0;
pub const SYS_K_OBJECT_RELEASE: SyscallId = 1;

/// Counter driver calls
pub const SYS_COUNTER_START: SyscallId = 2;
pub const SYS_COUNTER_STOP: SyscallId = 3;
pub const SYS_COUNTER_READ: SyscallId = 4;
pub const SYS_COUNTER_GET_FREQUENCY: SyscallId = 5;
pub const SYS_COUNTER_US_TO_TICKS: SyscallId = 6;
pub const SYS_COUNTER_TICKS_TO_US: SyscallId = 7;
pub const SYS_COUNTER_GET_MAX_TOP_VALUE: SyscallId = 8;
pub const SYS_COUNTER_GET_NUM_OF_CHANNELS: SyscallId = 9;
pub const SYS_COUNTER_GET_PENDING_INT: SyscallId = 10;
pub const SYS_COUNTER_GET_GUARD_PERIOD: SyscallId = 11;
pub const SYS_COUNTER_SET_GUARD_PERIOD: SyscallId = 12;

/// Number of system calls; every identifier below this is valid
pub const NR_SYSCALLS: usize = 13;
