//! Core types used throughout RTK

use ::core::fmt;

/// Machine word carried in one argument slot
pub type Word = usize;

/// System call identifier, dense and used as a descriptor table index
pub type SyscallId = usize;

/// Thread (execution context) identifier
pub type ThreadId = u32;

/// Number of bits in one argument slot
pub const WORD_BITS: u32 = Word::BITS;

static_assertions::assert_eq_size!(Word, *const ());

/// Pointer argument as seen by the kernel
///
/// Holds the caller's pointer bit pattern unchanged. Nothing about the
/// address is checked when one of these is built from a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserPtr(Word);

impl UserPtr {
    /// Null user pointer
    pub const NULL: UserPtr = UserPtr(0);

    /// Wrap a raw slot value
    pub const fn from_word(word: Word) -> Self {
        UserPtr(word)
    }

    /// Wrap the address of a pointer
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        UserPtr(ptr as Word)
    }

    /// Raw bit pattern
    pub const fn as_word(self) -> Word {
        self.0
    }

    /// Whether this is the null pointer
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for UserPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Positive errno value, returned to callers negated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(pub i32);

impl Errno {
    /// Operation not permitted
    pub const EPERM: Errno = Errno(1);
    /// Bad object handle
    pub const EBADF: Errno = Errno(9);
    /// Bad address
    pub const EFAULT: Errno = Errno(14);
    /// No such device
    pub const ENODEV: Errno = Errno(19);
    /// Invalid argument
    pub const EINVAL: Errno = Errno(22);
    /// Operation not supported
    pub const ENOTSUP: Errno = Errno(35);
    /// Function not implemented
    pub const ENOSYS: Errno = Errno(88);

    /// Value placed in the return word, e.g. `-22` for `EINVAL`
    pub const fn to_return(self) -> i32 {
        -self.0
    }

    /// Largest errno a call may return
    pub const MAX_ERRNO: i32 = 4095;

    /// Recover an errno from a signed return value, if it is one
    pub const fn from_return(value: i32) -> Option<Errno> {
        if value < 0 { Some(Errno(-value)) } else { None }
    }

    /// Recover an errno from a raw result word
    ///
    /// Errno returns are sign-extended, so only words in
    /// `-MAX_ERRNO..=-1` read as a signed word are errors. On 64-bit
    /// targets this never misreads a `U32` or `U64` result; on 32-bit
    /// targets results in the top 4095 values of the word are ambiguous.
    pub const fn from_word(word: Word) -> Option<Errno> {
        let value = word as isize;
        if value < 0 && value >= -(Self::MAX_ERRNO as isize) {
            Some(Errno(-(value as i32)))
        } else {
            None
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match KernelError::from_errno(*self) {
            KernelError::Unknown(code) => write!(f, "errno {}", code),
            err => write!(f, "{} (errno {})", err, self.0),
        }
    }
}

/// Represents a kernel error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// Operation not permitted
    PermissionDenied,
    /// Bad object handle
    BadHandle,
    /// Bad address
    BadAddress,
    /// No such device
    NoDevice,
    /// Invalid argument
    InvalidArgument,
    /// Operation not supported
    NotSupported,
    /// Function not implemented
    NotImplemented,
    /// Unknown error
    Unknown(i32),
}

impl KernelError {
    /// Errno code for this error
    pub const fn to_errno(self) -> Errno {
        match self {
            KernelError::PermissionDenied => Errno::EPERM,
            KernelError::BadHandle => Errno::EBADF,
            KernelError::BadAddress => Errno::EFAULT,
            KernelError::NoDevice => Errno::ENODEV,
            KernelError::InvalidArgument => Errno::EINVAL,
            KernelError::NotSupported => Errno::ENOTSUP,
            KernelError::NotImplemented => Errno::ENOSYS,
            KernelError::Unknown(code) => Errno(code),
        }
    }

    /// Map an errno back to a kernel error
    pub const fn from_errno(errno: Errno) -> KernelError {
        match errno.0 {
            1 => KernelError::PermissionDenied,
            9 => KernelError::BadHandle,
            14 => KernelError::BadAddress,
            19 => KernelError::NoDevice,
            22 => KernelError::InvalidArgument,
            35 => KernelError::NotSupported,
            88 => KernelError::NotImplemented,
            code => KernelError::Unknown(code),
        }
    }
}

impl From<Errno> for KernelError {
    fn from(errno: Errno) -> Self {
        KernelError::from_errno(errno)
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::PermissionDenied => write!(f, "Operation not permitted"),
            KernelError::BadHandle => write!(f, "Bad object handle"),
            KernelError::BadAddress => write!(f, "Bad address"),
            KernelError::NoDevice => write!(f, "No such device"),
            KernelError::InvalidArgument => write!(f, "Invalid argument"),
            KernelError::NotSupported => write!(f, "Operation not supported"),
            KernelError::NotImplemented => write!(f, "Function not implemented"),
            KernelError::Unknown(code) => write!(f, "Unknown error: {}", code),
        }
    }
}
