//! Kernel object registry
//!
//! Verification functions resolve pointer arguments here. Every object is
//! keyed by the address callers know it by and carries the set of threads
//! allowed to use it. The registry is the only shared mutable state behind
//! the syscall boundary; callers get owned handles back so no lock is held
//! while a driver runs.

pub mod syscalls;

use alloc::sync::Arc;
use ::core::fmt;

use bitflags::bitflags;
use hashbrown::{HashMap, HashSet};
use spin::RwLock;

use rtk_api::{Errno, Error, Result, ThreadId, UserPtr};

use crate::counter::CounterDriver;

bitflags! {
    /// Object state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectFlags: u8 {
        /// Object has been initialized and may be used
        const INITIALIZED = 1 << 0;
        /// Any thread may use the object without an explicit grant
        const PUBLIC = 1 << 1;
    }
}

/// Object type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Counter device
    Counter,
    /// Thread
    Thread,
}

/// Initialization requirement of a validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitCheck {
    /// Object must be initialized
    Initialized,
    /// Object must not be initialized yet
    Uninitialized,
    /// Either
    Any,
}

/// Object payload handed back by a successful validation
#[derive(Clone)]
pub enum ObjectBody {
    Counter(Arc<dyn CounterDriver>),
    Thread(ThreadId),
}

impl ObjectBody {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectBody::Counter(_) => ObjectKind::Counter,
            ObjectBody::Thread(_) => ObjectKind::Thread,
        }
    }
}

impl fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectBody::Counter(_) => f.write_str("Counter"),
            ObjectBody::Thread(tid) => write!(f, "Thread({})", tid),
        }
    }
}

struct KernelObject {
    body: ObjectBody,
    flags: ObjectFlags,
    granted: HashSet<ThreadId>,
}

/// Registry of kernel objects reachable from system calls
pub struct ObjectRegistry {
    objects: RwLock<HashMap<UserPtr, KernelObject>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self { objects: RwLock::new(HashMap::new()) }
    }

    fn insert(&self, addr: UserPtr, body: ObjectBody, flags: ObjectFlags) -> Result<()> {
        let mut objects = self.objects.write();
        if objects.contains_key(&addr) {
            return Err(Error::InvalidArgument("object already registered"));
        }
        sys_debug!("kobject {} registered as {:?} ({:?})", addr, body.kind(), flags);
        objects.insert(addr, KernelObject { body, flags, granted: HashSet::new() });
        Ok(())
    }

    /// Register a counter device at `addr`
    pub fn register_counter(&self, addr: UserPtr, driver: Arc<dyn CounterDriver>, flags: ObjectFlags) -> Result<()> {
        self.insert(addr, ObjectBody::Counter(driver), flags)
    }

    /// Register the thread object of `tid` at `addr`
    ///
    /// A thread always has access to its own object.
    pub fn register_thread(&self, addr: UserPtr, tid: ThreadId) -> Result<()> {
        self.insert(addr, ObjectBody::Thread(tid), ObjectFlags::INITIALIZED)?;
        self.grant(addr, tid)
    }

    /// Remove an object
    pub fn unregister(&self, addr: UserPtr) -> Result<()> {
        self.objects
            .write()
            .remove(&addr)
            .map(|_| ())
            .ok_or(Error::NotFound("kernel object"))
    }

    /// Give `tid` access to `addr`
    pub fn grant(&self, addr: UserPtr, tid: ThreadId) -> Result<()> {
        let mut objects = self.objects.write();
        let object = objects.get_mut(&addr).ok_or(Error::NotFound("kernel object"))?;
        object.granted.insert(tid);
        Ok(())
    }

    /// Take access to `addr` away from `tid`
    pub fn revoke(&self, addr: UserPtr, tid: ThreadId) -> Result<()> {
        let mut objects = self.objects.write();
        let object = objects.get_mut(&addr).ok_or(Error::NotFound("kernel object"))?;
        object.granted.remove(&tid);
        Ok(())
    }

    /// Drop every grant held by `tid`
    pub fn revoke_all(&self, tid: ThreadId) {
        for object in self.objects.write().values_mut() {
            object.granted.remove(&tid);
        }
    }

    /// Add flags to an object
    pub fn set_flags(&self, addr: UserPtr, flags: ObjectFlags) -> Result<()> {
        let mut objects = self.objects.write();
        let object = objects.get_mut(&addr).ok_or(Error::NotFound("kernel object"))?;
        object.flags.insert(flags);
        Ok(())
    }

    /// Whether `tid` may use `addr`
    pub fn has_access(&self, addr: UserPtr, tid: ThreadId) -> bool {
        self.objects
            .read()
            .get(&addr)
            .is_some_and(|object| object.flags.contains(ObjectFlags::PUBLIC) || object.granted.contains(&tid))
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Check that `tid` may use the object at `addr`
    ///
    /// Unknown address or wrong kind gives `EBADF`, missing permission
    /// `EPERM`, and a failed initialization check `EINVAL`, in that order.
    /// `kind` of `None` accepts any object type.
    pub fn validate(
        &self,
        addr: UserPtr,
        kind: Option<ObjectKind>,
        tid: ThreadId,
        init: InitCheck,
    ) -> ::core::result::Result<ObjectBody, Errno> {
        let objects = self.objects.read();
        let object = objects.get(&addr).ok_or(Errno::EBADF)?;
        if kind.is_some_and(|kind| object.body.kind() != kind) {
            return Err(Errno::EBADF);
        }
        if !object.flags.contains(ObjectFlags::PUBLIC) && !object.granted.contains(&tid) {
            return Err(Errno::EPERM);
        }
        let initialized = object.flags.contains(ObjectFlags::INITIALIZED);
        let init_ok = match init {
            InitCheck::Initialized => initialized,
            InitCheck::Uninitialized => !initialized,
            InitCheck::Any => true,
        };
        if !init_ok {
            return Err(Errno::EINVAL);
        }
        Ok(object.body.clone())
    }

    /// Resolve an initialized counter `tid` may use
    pub fn counter(&self, addr: UserPtr, tid: ThreadId) -> ::core::result::Result<Arc<dyn CounterDriver>, Errno> {
        match self.validate(addr, Some(ObjectKind::Counter), tid, InitCheck::Initialized)? {
            ObjectBody::Counter(driver) => Ok(driver),
            ObjectBody::Thread(_) => Err(Errno::EBADF),
        }
    }

    /// Resolve a thread object `tid` may use
    pub fn thread(&self, addr: UserPtr, tid: ThreadId) -> ::core::result::Result<ThreadId, Errno> {
        match self.validate(addr, Some(ObjectKind::Thread), tid, InitCheck::Initialized)? {
            ObjectBody::Thread(target) => Ok(target),
            ObjectBody::Counter(_) => Err(Errno::EBADF),
        }
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRegistry").field("objects", &self.len()).finish()
    }
}
