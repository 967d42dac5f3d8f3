//! Execution context
//!
//! The slice of per-thread state the syscall boundary needs. It is passed
//! explicitly down the dispatch path; there is no ambient "current thread".

use rtk_api::syscall::CallFrame;
use rtk_api::{SyscallId, ThreadId};

use super::fault::Fault;

/// Dispatch state of one execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// No system call in progress
    Idle,
    /// A verification function is running on behalf of this context
    InCall(SyscallId),
}

/// Whether the context may still issue system calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    /// Running normally
    Running,
    /// Ended by a fault at the syscall boundary
    Terminated,
}

/// Diagnostic record left on a context terminated by a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultReport {
    /// Faulting thread
    pub thread: ThreadId,
    /// What went wrong
    pub fault: Fault,
    /// Frame that was attached when the fault was raised
    pub frame: Option<CallFrame>,
}

/// Per-thread execution context
#[derive(Debug)]
pub struct ExecContext {
    id: ThreadId,
    state: DispatchState,
    status: ThreadStatus,
    frame: Option<CallFrame>,
    report: Option<FaultReport>,
    completed: u64,
}

impl ExecContext {
    /// Create a running, idle context for thread `id`
    pub fn new(id: ThreadId) -> Self {
        Self {
            id,
            state: DispatchState::Idle,
            status: ThreadStatus::Running,
            frame: None,
            report: None,
            completed: 0,
        }
    }

    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn status(&self) -> ThreadStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == ThreadStatus::Running
    }

    /// Frame attached for the call in progress
    pub fn frame(&self) -> Option<CallFrame> {
        self.frame
    }

    /// Report left by the fault that terminated this context
    pub fn fault_report(&self) -> Option<&FaultReport> {
        self.report.as_ref()
    }

    /// Number of calls that returned to this context
    pub fn calls_completed(&self) -> u64 {
        self.completed
    }

    /// Attach `frame` and move to `InCall` until the returned guard drops
    pub fn enter(&mut self, id: SyscallId, frame: CallFrame) -> ActiveCall<'_> {
        self.frame = Some(frame);
        self.state = DispatchState::InCall(id);
        ActiveCall { ctx: self }
    }

    /// End this context after a boundary fault
    pub(crate) fn terminate(&mut self, fault: Fault, frame: Option<CallFrame>) {
        self.status = ThreadStatus::Terminated;
        self.state = DispatchState::Idle;
        self.frame = None;
        self.report = Some(FaultReport { thread: self.id, fault, frame });
    }
}

/// A call in progress on an [`ExecContext`]
///
/// Dropping it detaches the frame and returns the context to `Idle`,
/// whichever way the verification function finished.
#[derive(Debug)]
pub struct ActiveCall<'a> {
    ctx: &'a mut ExecContext,
}

impl ActiveCall<'_> {
    /// The calling context, as seen by the verification function
    pub fn context(&self) -> &ExecContext {
        &*self.ctx
    }

    /// Mark the call as having returned normally
    pub fn complete(self) {
        self.ctx.completed += 1;
    }
}

impl Drop for ActiveCall<'_> {
    fn drop(&mut self) {
        self.ctx.frame = None;
        self.ctx.state = DispatchState::Idle;
    }
}
