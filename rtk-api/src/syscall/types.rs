//! System call types

use ::core::fmt;

use crate::core::types::{Errno, UserPtr, Word};
use crate::error::{Error, Result};
use super::wide::join_wide;

/// Number of argument slots in the register bank
pub const ARG_SLOTS: usize = 6;

/// Raw argument words handed over by the trap entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyscallWords(pub [Word; ARG_SLOTS]);

impl SyscallWords {
    /// Creates a full slot bank
    pub const fn new(w0: Word, w1: Word, w2: Word, w3: Word, w4: Word, w5: Word) -> Self {
        SyscallWords([w0, w1, w2, w3, w4, w5])
    }

    /// Creates a zeroed slot bank
    pub const fn empty() -> Self {
        SyscallWords([0; ARG_SLOTS])
    }

    /// Creates a slot bank from a prefix, zero-filling the rest
    pub fn from_slice(words: &[Word]) -> Result<Self> {
        if words.len() > ARG_SLOTS {
            return Err(Error::TooManySlots);
        }
        let mut bank = [0; ARG_SLOTS];
        bank[..words.len()].copy_from_slice(words);
        Ok(SyscallWords(bank))
    }

    /// Slot at `index`
    pub fn get(&self, index: usize) -> Option<Word> {
        self.0.get(index).copied()
    }

    /// Overwrite every slot from `from` onwards
    pub fn fill_from(mut self, from: usize, value: Word) -> Self {
        for slot in self.0.iter_mut().skip(from) {
            *slot = value;
        }
        self
    }
}

/// How one logical argument is laid out in the slot bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Word-sized integer
    Scalar,
    /// Pointer, passed as its bit pattern
    Pointer,
    /// 64-bit integer split across two slots, low half first
    Wide,
}

impl ArgKind {
    /// Number of slots the argument occupies
    pub const fn slots(self) -> usize {
        match self {
            ArgKind::Scalar | ArgKind::Pointer => 1,
            ArgKind::Wide => 2,
        }
    }
}

/// A decoded, typed argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// Word-sized integer
    Scalar(Word),
    /// Pointer bit pattern
    Pointer(UserPtr),
    /// Reassembled 64-bit integer
    Wide(u64),
}

impl Arg {
    /// Packing kind of this argument
    pub const fn kind(&self) -> ArgKind {
        match self {
            Arg::Scalar(_) => ArgKind::Scalar,
            Arg::Pointer(_) => ArgKind::Pointer,
            Arg::Wide(_) => ArgKind::Wide,
        }
    }

    /// Decode an argument of `kind` from its slots
    ///
    /// `hi` is only consulted for [`ArgKind::Wide`].
    pub const fn decode(kind: ArgKind, lo: Word, hi: Word) -> Arg {
        match kind {
            ArgKind::Scalar => Arg::Scalar(lo),
            ArgKind::Pointer => Arg::Pointer(UserPtr::from_word(lo)),
            ArgKind::Wide => Arg::Wide(join_wide(lo, hi)),
        }
    }
}

/// Native return type of a verification function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetKind {
    /// No value; the return word carries nothing
    Void,
    /// Unsigned 32-bit
    U32,
    /// Signed 32-bit, negative values are errno codes
    I32,
    /// Unsigned 64-bit
    U64,
    /// Native word
    Word,
}

impl RetKind {
    /// Caller-side reinterpretation of a result word
    pub const fn decode(self, word: Word) -> RetVal {
        match self {
            RetKind::Void => RetVal::Void,
            RetKind::U32 => RetVal::U32(word as u32),
            RetKind::I32 => RetVal::I32(word as u32 as i32),
            RetKind::U64 => RetVal::U64(word as u64),
            RetKind::Word => RetVal::Word(word),
        }
    }
}

/// Value produced by a verification function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetVal {
    /// No value
    Void,
    /// Unsigned 32-bit
    U32(u32),
    /// Signed 32-bit
    I32(i32),
    /// Unsigned 64-bit
    U64(u64),
    /// Native word
    Word(Word),
}

impl RetVal {
    /// Convert to the raw result word
    ///
    /// Unsigned values are zero-extended, signed values sign-extended, and
    /// values wider than a word keep only their low bits. `Void` yields 0.
    pub const fn into_word(self) -> Word {
        match self {
            RetVal::Void => 0,
            RetVal::U32(v) => v as Word,
            RetVal::I32(v) => v as isize as Word,
            RetVal::U64(v) => v as Word,
            RetVal::Word(v) => v,
        }
    }

    /// Kind this value was produced as
    pub const fn kind(self) -> RetKind {
        match self {
            RetVal::Void => RetKind::Void,
            RetVal::U32(_) => RetKind::U32,
            RetVal::I32(_) => RetKind::I32,
            RetVal::U64(_) => RetKind::U64,
            RetVal::Word(_) => RetKind::Word,
        }
    }

    /// Negative errno return, which any non-void call may produce
    pub const fn is_errno(self) -> bool {
        matches!(self, RetVal::I32(v) if v < 0 && v >= -Errno::MAX_ERRNO)
    }

    /// Whether a verification function declared `kind` may return this value
    pub const fn fits(self, kind: RetKind) -> bool {
        match (self.kind(), kind) {
            (RetKind::Void, RetKind::Void)
            | (RetKind::U32, RetKind::U32)
            | (RetKind::I32, RetKind::I32)
            | (RetKind::U64, RetKind::U64)
            | (RetKind::Word, RetKind::Word) => true,
            (_, RetKind::Void) => false,
            _ => self.is_errno(),
        }
    }

    /// Signed view of the value, used by callers checking for errno returns
    pub const fn as_i32(self) -> Option<i32> {
        match self {
            RetVal::I32(v) => Some(v),
            _ => None,
        }
    }
}

/// Opaque handle to the caller's saved stack frame
///
/// Attached to the execution context while a call is in progress so fault
/// reports can unwind from the trap site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallFrame(Word);

impl CallFrame {
    /// Wrap a raw frame address
    pub const fn from_addr(addr: Word) -> Self {
        CallFrame(addr)
    }

    /// Wrap a frame pointer
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        CallFrame(ptr as Word)
    }

    /// Frame address
    pub const fn addr(self) -> Word {
        self.0
    }
}

impl fmt::Display for CallFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame@{:#x}", self.0)
    }
}
