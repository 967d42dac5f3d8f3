//! RTK System Calls
//!
//! This crate provides the user/kernel boundary of the RTK kernel: the
//! static call descriptor table, the marshaller that turns raw argument
//! slots into typed arguments, and the dispatcher that routes a trap to the
//! right verification function.
//!
//! # Architecture
//!
//! - **Core**: Descriptor table, marshaller, dispatcher and execution context
//! - **Kobject**: Kernel object registry and per-thread access permissions
//! - **Counter**: Counter driver call family
//! - **Stubs**: Caller-side request builders
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rtk_api::UserPtr;
//! use rtk_api::syscall::{CallFrame, RetVal};
//! use rtk_syscalls::counter::FixedCounter;
//! use rtk_syscalls::kobject::{ObjectFlags, ObjectRegistry};
//! use rtk_syscalls::{Dispatcher, ExecContext, SYSCALL_TABLE, stubs};
//!
//! let objects = ObjectRegistry::new();
//! let dev = UserPtr::from_word(0x2000_1000);
//! objects
//!     .register_counter(dev, Arc::new(FixedCounter::new(32_768)), ObjectFlags::INITIALIZED)
//!     .unwrap();
//! objects.grant(dev, 1).unwrap();
//!
//! let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
//! let mut ctx = ExecContext::new(1);
//! let request = stubs::counter_us_to_ticks(dev, 1_000_000).unwrap();
//! let ret = dispatcher.dispatch_request(&mut ctx, &request, CallFrame::from_addr(0x2000_ff00));
//! assert_eq!(ret, Ok(RetVal::U32(32_768)));
//! ```

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

#[macro_use]
mod logging;

// Core modules
pub mod core;
pub mod types;
pub mod syscall_table;

// Call families
pub mod kobject;
pub mod counter;

pub mod stubs;

// Re-export commonly used items
pub use crate::core::{
    ActiveCall, ArgPacker, CallDescriptor, DispatchState, Dispatcher, DispatcherConfig,
    DispatcherStats, ExecContext, Fault, FaultReport, Invocation, SlotReader, SyscallRequest,
    SyscallTable, ThreadStatus, TypedArgs, VerifyFn, invoke, unmarshal,
};
pub use syscall_table::SYSCALL_TABLE;
pub use types::*;
