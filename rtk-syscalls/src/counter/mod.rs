//! Counter driver call family
//!
//! Verification functions for the counter API. Each one resolves the device
//! pointer through the object registry with the caller's identity, reports
//! validation failures as a negative errno in the result word, and forwards
//! to the driver otherwise.

mod fixed;

pub use fixed::FixedCounter;

use rtk_api::Errno;
use rtk_api::syscall::{Arg, RetVal};

use crate::core::{Fault, Invocation};

/// Microseconds per second
pub const USEC_PER_SEC: u64 = 1_000_000;

/// Counter device operations
pub trait CounterDriver: Send + Sync {
    /// Start counting
    fn start(&self) -> Result<(), Errno>;

    /// Stop counting
    fn stop(&self) -> Result<(), Errno>;

    /// Current counter value in ticks
    fn read(&self) -> u32;

    /// Tick frequency in Hz
    fn frequency(&self) -> u32;

    /// Largest top value the hardware supports
    fn max_top_value(&self) -> u32;

    /// Number of alarm channels
    fn channels(&self) -> u8;

    /// Whether a counter interrupt is pending
    fn pending_int(&self) -> bool;

    /// Guard period in ticks for alarms set with `flags`
    fn guard_period(&self, _flags: u32) -> u32 {
        0
    }

    /// Set the guard period in ticks for alarms set with `flags`
    fn set_guard_period(&self, _ticks: u32, _flags: u32) -> Result<(), Errno> {
        Err(Errno::ENOTSUP)
    }
}

/// Convert microseconds to ticks at `frequency` Hz, truncated to 32 bits
pub fn us_to_ticks(frequency: u32, us: u64) -> u32 {
    (us as u128 * frequency as u128 / USEC_PER_SEC as u128) as u32
}

/// Convert ticks at `frequency` Hz to microseconds
pub fn ticks_to_us(frequency: u32, ticks: u32) -> Option<u64> {
    if frequency == 0 {
        return None;
    }
    Some((ticks as u128 * USEC_PER_SEC as u128 / frequency as u128) as u64)
}

fn status(result: Result<(), Errno>) -> RetVal {
    match result {
        Ok(()) => RetVal::I32(0),
        Err(errno) => RetVal::I32(errno.to_return()),
    }
}

/// Resolve the device in the first argument and run `op` on it with the
/// remaining arguments. `op` returns `None` if those do not match its
/// signature.
fn with_counter(
    call: &Invocation<'_>,
    op: impl FnOnce(&dyn CounterDriver, &[Arg]) -> Option<RetVal>,
) -> Result<RetVal, Fault> {
    let Some((Arg::Pointer(dev), rest)) = call.args().split_first() else {
        return Err(call.bad_signature());
    };
    let counter = match call.objects().counter(*dev, call.caller().id()) {
        Ok(counter) => counter,
        Err(errno) => {
            sys_debug!("syscall {}: counter {} rejected for thread {}: {}", call.id(), dev, call.caller().id(), errno);
            return Ok(RetVal::I32(errno.to_return()));
        }
    };
    op(counter.as_ref(), rest).ok_or(call.bad_signature())
}

pub fn verify_start(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| rest.is_empty().then(|| status(counter.start())))
}

pub fn verify_stop(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| rest.is_empty().then(|| status(counter.stop())))
}

pub fn verify_read(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| rest.is_empty().then(|| RetVal::U32(counter.read())))
}

pub fn verify_get_frequency(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| rest.is_empty().then(|| RetVal::U32(counter.frequency())))
}

pub fn verify_us_to_ticks(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| match rest {
        [Arg::Wide(us)] => Some(RetVal::U32(us_to_ticks(counter.frequency(), *us))),
        _ => None,
    })
}

pub fn verify_ticks_to_us(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| match rest {
        [Arg::Scalar(ticks)] => Some(match ticks_to_us(counter.frequency(), *ticks as u32) {
            Some(us) => RetVal::U64(us),
            None => RetVal::I32(Errno::EINVAL.to_return()),
        }),
        _ => None,
    })
}

pub fn verify_get_max_top_value(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| rest.is_empty().then(|| RetVal::U32(counter.max_top_value())))
}

pub fn verify_get_num_of_channels(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| rest.is_empty().then(|| RetVal::U32(counter.channels() as u32)))
}

pub fn verify_get_pending_int(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| rest.is_empty().then(|| RetVal::I32(counter.pending_int() as i32)))
}

pub fn verify_get_guard_period(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| match rest {
        [Arg::Scalar(flags)] => Some(RetVal::U32(counter.guard_period(*flags as u32))),
        _ => None,
    })
}

pub fn verify_set_guard_period(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    with_counter(call, |counter, rest| match rest {
        [Arg::Scalar(ticks), Arg::Scalar(flags)] => {
            Some(status(counter.set_guard_period(*ticks as u32, *flags as u32)))
        }
        _ => None,
    })
}
