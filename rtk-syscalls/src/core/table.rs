//! Call descriptor table
//!
//! One [`CallDescriptor`] per system call: the verification function plus a
//! declarative description of how its arguments sit in the slot bank. The
//! table is built at compile time and only read afterwards, so concurrent
//! lookups need no locking.

use ::core::fmt;

use rtk_api::syscall::{ARG_SLOTS, ArgKind, RetKind, RetVal};
use rtk_api::{Error, Result, SyscallId};

use super::fault::Fault;
use super::marshal::Invocation;

/// Privileged-side target of a system call
pub type VerifyFn = fn(&Invocation<'_>) -> ::core::result::Result<RetVal, Fault>;

/// Static description of one system call
#[derive(Clone, Copy)]
pub struct CallDescriptor {
    /// Identifier, equal to the descriptor's table index
    pub id: SyscallId,
    /// Name used in logs and fault reports
    pub name: &'static str,
    /// Packing scheme, one entry per logical argument
    pub args: &'static [ArgKind],
    /// Native return type of the verification function
    pub ret: RetKind,
    /// Verification function
    pub verify: VerifyFn,
}

impl CallDescriptor {
    pub const fn new(
        id: SyscallId,
        name: &'static str,
        args: &'static [ArgKind],
        ret: RetKind,
        verify: VerifyFn,
    ) -> Self {
        Self { id, name, args, ret, verify }
    }

    /// Number of slots the call reads
    pub const fn arity(&self) -> usize {
        let mut slots = 0;
        let mut i = 0;
        while i < self.args.len() {
            slots += self.args[i].slots();
            i += 1;
        }
        slots
    }
}

impl fmt::Debug for CallDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("args", &self.args)
            .field("ret", &self.ret)
            .finish()
    }
}

/// Read-only table of call descriptors indexed by identifier
#[derive(Debug)]
pub struct SyscallTable {
    descriptors: &'static [CallDescriptor],
}

impl SyscallTable {
    /// Wrap a descriptor list
    ///
    /// # Panics
    ///
    /// If the list fails [`SyscallTable::is_well_formed`]. In a `static`
    /// initializer this is a compile error.
    pub const fn new(descriptors: &'static [CallDescriptor]) -> Self {
        assert!(
            Self::is_well_formed(descriptors),
            "syscall table must have dense ids and fit every call in the slot bank"
        );
        Self { descriptors }
    }

    /// Dense identifiers and every call fitting in the slot bank
    pub const fn is_well_formed(descriptors: &[CallDescriptor]) -> bool {
        let mut i = 0;
        while i < descriptors.len() {
            if descriptors[i].id != i || descriptors[i].arity() > ARG_SLOTS {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Look up a descriptor
    pub fn lookup(&self, id: SyscallId) -> Result<&'static CallDescriptor> {
        self.get(id).ok_or(Error::UnknownSyscall(id))
    }

    /// Look up a descriptor, `None` if the identifier is out of range
    pub fn get(&self, id: SyscallId) -> Option<&'static CallDescriptor> {
        self.descriptors.get(id)
    }

    /// Look up a descriptor by name
    pub fn by_name(&self, name: &str) -> Option<&'static CallDescriptor> {
        self.descriptors.iter().find(|desc| desc.name == name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static CallDescriptor> {
        self.descriptors.iter()
    }
}
