//! System call dispatcher
//!
//! Entry point for a trap from an unprivileged context: look the identifier
//! up, hand the call to the marshaller, and return the result word. A fault
//! ends the issuing context and nothing else.
//!
//! The dispatcher itself is shared by every context and holds no lock; the
//! only per-call state lives in the caller's [`ExecContext`].

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use ::core::sync::atomic::{AtomicU64, Ordering};

use rtk_api::syscall::{CallFrame, RetVal, SyscallWords};
use rtk_api::{SyscallId, Word, get_version};

use super::context::ExecContext;
use super::fault::Fault;
use super::marshal::{SyscallRequest, invoke};
use super::table::SyscallTable;
use crate::kobject::ObjectRegistry;

/// Runtime dispatcher settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Log every call at trace level
    pub trace_calls: bool,
    /// Keep per-call counters
    pub record_stats: bool,
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace_calls(mut self, enabled: bool) -> Self {
        self.trace_calls = enabled;
        self
    }

    pub fn record_stats(mut self, enabled: bool) -> Self {
        self.record_stats = enabled;
        self
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { trace_calls: false, record_stats: true }
    }
}

/// System call statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    /// Calls that reached a verification function
    pub total_calls: u64,
    /// Calls by identifier
    pub calls_by_id: BTreeMap<SyscallId, u64>,
    /// Contexts terminated by a fault
    pub faults: u64,
    /// Faults caused by unknown identifiers
    pub unknown_syscalls: u64,
}

struct CallCounters {
    per_call: Vec<AtomicU64>,
    faults: AtomicU64,
    unknown: AtomicU64,
}

impl CallCounters {
    fn new(calls: usize) -> Self {
        Self {
            per_call: (0..calls).map(|_| AtomicU64::new(0)).collect(),
            faults: AtomicU64::new(0),
            unknown: AtomicU64::new(0),
        }
    }

    fn snapshot(&self) -> DispatcherStats {
        let calls_by_id: BTreeMap<SyscallId, u64> = self
            .per_call
            .iter()
            .enumerate()
            .map(|(id, count)| (id, count.load(Ordering::Relaxed)))
            .filter(|&(_, count)| count > 0)
            .collect();
        DispatcherStats {
            total_calls: calls_by_id.values().sum(),
            calls_by_id,
            faults: self.faults.load(Ordering::Relaxed),
            unknown_syscalls: self.unknown.load(Ordering::Relaxed),
        }
    }
}

/// System call dispatcher
pub struct Dispatcher<'k> {
    table: &'static SyscallTable,
    objects: &'k ObjectRegistry,
    config: DispatcherConfig,
    counters: CallCounters,
}

impl<'k> Dispatcher<'k> {
    /// Create a dispatcher with the default configuration
    pub fn new(table: &'static SyscallTable, objects: &'k ObjectRegistry) -> Self {
        Self::with_config(table, objects, DispatcherConfig::default())
    }

    pub fn with_config(table: &'static SyscallTable, objects: &'k ObjectRegistry, config: DispatcherConfig) -> Self {
        sys_info!(
            "syscall dispatcher ready: kernel {} ({:#x}), {} calls",
            get_version(),
            get_version().code,
            table.len()
        );
        Self { table, objects, config, counters: CallCounters::new(table.len()) }
    }

    pub fn table(&self) -> &'static SyscallTable {
        self.table
    }

    pub fn config(&self) -> DispatcherConfig {
        self.config
    }

    /// Dispatch one trap
    ///
    /// Returns the raw result word, or the fault that terminated `ctx`.
    pub fn dispatch(
        &self,
        ctx: &mut ExecContext,
        id: SyscallId,
        words: &SyscallWords,
        frame: CallFrame,
    ) -> Result<Word, Fault> {
        if !ctx.is_running() {
            return Err(Fault::ContextTerminated { thread: ctx.id() });
        }

        let Some(desc) = self.table.get(id) else {
            self.counters.unknown.fetch_add(1, Ordering::Relaxed);
            return Err(self.fault(ctx, Fault::UnknownSyscall { id }, frame));
        };

        if self.config.trace_calls {
            let used = words.0.get(..desc.arity()).unwrap_or(&words.0);
            sys_trace!("thread {} -> {}{:x?} {}", ctx.id(), desc.name, used, frame);
        }

        if self.config.record_stats {
            if let Some(count) = self.counters.per_call.get(id) {
                count.fetch_add(1, Ordering::Relaxed);
            }
        }

        match invoke(desc, self.objects, ctx, words, frame) {
            Ok(word) => {
                if self.config.trace_calls {
                    sys_trace!("thread {} <- {} = {:#x}", ctx.id(), desc.name, word);
                }
                Ok(word)
            }
            Err(fault) => Err(self.fault(ctx, fault, frame)),
        }
    }

    /// Dispatch a packed request and decode the result by its return kind
    pub fn dispatch_request(
        &self,
        ctx: &mut ExecContext,
        request: &SyscallRequest,
        frame: CallFrame,
    ) -> Result<RetVal, Fault> {
        self.dispatch(ctx, request.id, &request.words, frame)
            .map(|word| request.ret.decode(word))
    }

    /// Terminate `ctx` for `fault` and release everything it held
    fn fault(&self, ctx: &mut ExecContext, fault: Fault, frame: CallFrame) -> Fault {
        sys_error!("thread {} terminated: {} at {}", ctx.id(), fault, frame);
        ctx.terminate(fault, Some(frame));
        self.objects.revoke_all(ctx.id());
        self.counters.faults.fetch_add(1, Ordering::Relaxed);
        fault
    }

    /// Snapshot of the call counters
    pub fn stats(&self) -> DispatcherStats {
        self.counters.snapshot()
    }
}
