//! The kernel's system call table
//!
//! Adding a call means adding its identifier in [`crate::types`], a
//! verification function, and one line here describing its arguments.

use rtk_api::syscall::ArgKind::{Pointer, Scalar, Wide};
use rtk_api::syscall::RetKind;
use static_assertions::{const_assert, const_assert_eq};

use crate::core::{CallDescriptor, SyscallTable};
use crate::types::*;
use crate::{counter, kobject};

const DESCRIPTORS: &[CallDescriptor] = &[
    CallDescriptor::new(SYS_K_OBJECT_ACCESS_GRANT, "k_object_access_grant", &[Pointer, Pointer], RetKind::Void, kobject::syscalls::verify_access_grant),
    CallDescriptor::new(SYS_K_OBJECT_RELEASE, "k_object_release", &[Pointer], RetKind::Void, kobject::syscalls::verify_release),
    CallDescriptor::new(SYS_COUNTER_START, "counter_start", &[Pointer], RetKind::I32, counter::verify_start),
    CallDescriptor::new(SYS_COUNTER_STOP, "counter_stop", &[Pointer], RetKind::I32, counter::verify_stop),
    CallDescriptor::new(SYS_COUNTER_READ, "counter_read", &[Pointer], RetKind::U32, counter::verify_read),
    CallDescriptor::new(SYS_COUNTER_GET_FREQUENCY, "counter_get_frequency", &[Pointer], RetKind::U32, counter::verify_get_frequency),
    CallDescriptor::new(SYS_COUNTER_US_TO_TICKS, "counter_us_to_ticks", &[Pointer, Wide], RetKind::U32, counter::verify_us_to_ticks),
    CallDescriptor::new(SYS_COUNTER_TICKS_TO_US, "counter_ticks_to_us", &[Pointer, Scalar], RetKind::U64, counter::verify_ticks_to_us),
    CallDescriptor::new(SYS_COUNTER_GET_MAX_TOP_VALUE, "counter_get_max_top_value", &[Pointer], RetKind::U32, counter::verify_get_max_top_value),
    CallDescriptor::new(SYS_COUNTER_GET_NUM_OF_CHANNELS, "counter_get_num_of_channels", &[Pointer], RetKind::U32, counter::verify_get_num_of_channels),
    CallDescriptor::new(SYS_COUNTER_GET_PENDING_INT, "counter_get_pending_int", &[Pointer], RetKind::I32, counter::verify_get_pending_int),
    CallDescriptor::new(SYS_COUNTER_GET_GUARD_PERIOD, "counter_get_guard_period", &[Pointer, Scalar], RetKind::U32, counter::verify_get_guard_period),
    CallDescriptor::new(SYS_COUNTER_SET_GUARD_PERIOD, "counter_set_guard_period", &[Pointer, Scalar, Scalar], RetKind::I32, counter::verify_set_guard_period),
];

const_assert_eq!(DESCRIPTORS.len(), NR_SYSCALLS);
const_assert!(SyscallTable::is_well_formed(DESCRIPTORS));

/// System call table
pub static SYSCALL_TABLE: SyscallTable = SyscallTable::new(DESCRIPTORS);
