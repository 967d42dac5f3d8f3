//! Software counter with a fixed tick rate
//!
//! Ticks only move when [`FixedCounter::advance`] is called, which makes the
//! counter usable wherever no hardware timer is wired up.

use ::core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use rtk_api::Errno;

use super::CounterDriver;

#[derive(Debug)]
pub struct FixedCounter {
    frequency: u32,
    top: u32,
    channels: u8,
    running: AtomicBool,
    ticks: AtomicU32,
    pending: AtomicBool,
    guard: AtomicU32,
}

impl FixedCounter {
    /// Create a stopped 32-bit counter ticking at `frequency` Hz
    pub fn new(frequency: u32) -> Self {
        Self {
            frequency,
            top: u32::MAX,
            channels: 1,
            running: AtomicBool::new(false),
            ticks: AtomicU32::new(0),
            pending: AtomicBool::new(false),
            guard: AtomicU32::new(0),
        }
    }

    /// Wrap at `top` instead of the full 32-bit range
    pub fn with_top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }

    pub fn with_channels(mut self, channels: u8) -> Self {
        self.channels = channels;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Move the counter forward by `ticks` if it is running
    ///
    /// Passing the top value wraps to zero and latches the pending interrupt.
    pub fn advance(&self, ticks: u32) {
        if !self.is_running() {
            return;
        }
        let period = self.top as u64 + 1;
        let now = self.ticks.load(Ordering::Acquire) as u64 + ticks as u64;
        if now >= period {
            self.pending.store(true, Ordering::Release);
        }
        self.ticks.store((now % period) as u32, Ordering::Release);
    }

    /// Acknowledge the pending interrupt
    pub fn clear_pending(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

impl CounterDriver for FixedCounter {
    fn start(&self) -> Result<(), Errno> {
        self.running.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&self) -> Result<(), Errno> {
        self.running.store(false, Ordering::Release);
        Ok(())
    }

    fn read(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn max_top_value(&self) -> u32 {
        self.top
    }

    fn channels(&self) -> u8 {
        self.channels
    }

    fn pending_int(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    fn guard_period(&self, _flags: u32) -> u32 {
        self.guard.load(Ordering::Acquire)
    }

    fn set_guard_period(&self, ticks: u32, _flags: u32) -> Result<(), Errno> {
        if ticks > self.top {
            return Err(Errno::EINVAL);
        }
        self.guard.store(ticks, Ordering::Release);
        Ok(())
    }
}
