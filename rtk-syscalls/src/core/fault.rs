//! Faults raised at the syscall boundary
//!
//! A fault is not a return value: it ends the issuing execution context.
//! Ordinary failures of a privileged operation travel back to the caller as
//! negative errno values in the result word instead.

use ::core::fmt;

use rtk_api::{SyscallId, ThreadId};

/// Context-fatal condition detected while handling a system call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Identifier outside the descriptor table
    UnknownSyscall {
        /// Identifier the caller trapped with
        id: SyscallId,
    },
    /// A verification function rejected the call in a way the caller cannot
    /// be told about through the result word
    Oops {
        /// Call that raised the fault
        id: SyscallId,
        /// What the verification function objected to
        reason: &'static str,
    },
    /// Decoded arguments did not have the shape the verification function expects
    BadSignature {
        /// Call with the inconsistent descriptor
        id: SyscallId,
    },
    /// The context was already terminated by an earlier fault
    ContextTerminated {
        /// Terminated thread
        thread: ThreadId,
    },
}

impl Fault {
    /// System call the fault belongs to, if any
    pub const fn syscall(&self) -> Option<SyscallId> {
        match self {
            Fault::UnknownSyscall { id } | Fault::Oops { id, .. } | Fault::BadSignature { id } => {
                Some(*id)
            }
            Fault::ContextTerminated { .. } => None,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::UnknownSyscall { id } => write!(f, "unknown syscall {}", id),
            Fault::Oops { id, reason } => write!(f, "syscall {} oops: {}", id, reason),
            Fault::BadSignature { id } => write!(f, "syscall {} has a bad argument signature", id),
            Fault::ContextTerminated { thread } => write!(f, "thread {} is terminated", thread),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Fault {}
