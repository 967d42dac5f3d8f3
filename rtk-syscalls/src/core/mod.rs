//! Core system call functionality
//!
//! This module provides the boundary machinery itself: descriptor table,
//! marshaller, dispatcher and the per-thread execution context they share.

pub mod context;
pub mod dispatcher;
pub mod fault;
pub mod marshal;
pub mod table;

// Re-export commonly used items
pub use context::{ActiveCall, DispatchState, ExecContext, FaultReport, ThreadStatus};
pub use dispatcher::{Dispatcher, DispatcherConfig, DispatcherStats};
pub use fault::Fault;
pub use marshal::{ArgPacker, Invocation, SlotReader, SyscallRequest, TypedArgs, invoke, unmarshal};
pub use table::{CallDescriptor, SyscallTable, VerifyFn};
