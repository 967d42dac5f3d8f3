//! Error handling module for RTK

use ::core::fmt;

use crate::core::types::{KernelError, SyscallId};

/// Common error type used throughout RTK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Kernel error
    Kernel(KernelError),
    /// No descriptor for this system call identifier
    UnknownSyscall(SyscallId),
    /// Packed arguments do not follow the call's declared packing scheme
    SignatureMismatch {
        /// Call being packed
        id: SyscallId,
        /// Index of the first offending argument
        position: usize,
    },
    /// More argument slots requested than the register bank holds
    TooManySlots,
    /// Invalid argument
    InvalidArgument(&'static str),
    /// Resource not found
    NotFound(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Kernel(err) => write!(f, "Kernel error: {}", err),
            Error::UnknownSyscall(id) => write!(f, "Unknown system call: {}", id),
            Error::SignatureMismatch { id, position } => {
                write!(f, "Argument {} does not match signature of system call {}", position, id)
            }
            Error::TooManySlots => write!(f, "Too many argument slots"),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl From<KernelError> for Error {
    fn from(err: KernelError) -> Self {
        Error::Kernel(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type for operations that can fail
pub type Result<T> = ::core::result::Result<T, Error>;
