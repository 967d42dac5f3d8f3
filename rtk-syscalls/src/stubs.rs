//! Caller-side request builders
//!
//! One function per system call, packing typed arguments into the slot
//! layout the call's descriptor declares.

use rtk_api::{Result, SyscallId, UserPtr, Word};

use crate::core::{ArgPacker, SyscallRequest};
use crate::syscall_table::SYSCALL_TABLE;
use crate::types::*;

fn pack(id: SyscallId, packer: ArgPacker) -> Result<SyscallRequest> {
    packer.finish(SYSCALL_TABLE.lookup(id)?)
}

pub fn k_object_access_grant(object: UserPtr, thread: UserPtr) -> Result<SyscallRequest> {
    pack(SYS_K_OBJECT_ACCESS_GRANT, ArgPacker::new().pointer(object).pointer(thread))
}

pub fn k_object_release(object: UserPtr) -> Result<SyscallRequest> {
    pack(SYS_K_OBJECT_RELEASE, ArgPacker::new().pointer(object))
}

pub fn counter_start(dev: UserPtr) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_START, ArgPacker::new().pointer(dev))
}

pub fn counter_stop(dev: UserPtr) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_STOP, ArgPacker::new().pointer(dev))
}

pub fn counter_read(dev: UserPtr) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_READ, ArgPacker::new().pointer(dev))
}

pub fn counter_get_frequency(dev: UserPtr) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_GET_FREQUENCY, ArgPacker::new().pointer(dev))
}

pub fn counter_us_to_ticks(dev: UserPtr, us: u64) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_US_TO_TICKS, ArgPacker::new().pointer(dev).wide(us))
}

pub fn counter_ticks_to_us(dev: UserPtr, ticks: u32) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_TICKS_TO_US, ArgPacker::new().pointer(dev).scalar(ticks as Word))
}

pub fn counter_get_max_top_value(dev: UserPtr) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_GET_MAX_TOP_VALUE, ArgPacker::new().pointer(dev))
}

pub fn counter_get_num_of_channels(dev: UserPtr) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_GET_NUM_OF_CHANNELS, ArgPacker::new().pointer(dev))
}

pub fn counter_get_pending_int(dev: UserPtr) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_GET_PENDING_INT, ArgPacker::new().pointer(dev))
}

pub fn counter_get_guard_period(dev: UserPtr, flags: u32) -> Result<SyscallRequest> {
    pack(SYS_COUNTER_GET_GUARD_PERIOD, ArgPacker::new().pointer(dev).scalar(flags as Word))
}

pub fn counter_set_guard_period(dev: UserPtr, ticks: u32, flags: u32) -> Result<SyscallRequest> {
    pack(
        SYS_COUNTER_SET_GUARD_PERIOD,
        ArgPacker::new().pointer(dev).scalar(ticks as Word).scalar(flags as Word),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtk_api::syscall::{RetKind, SyscallWords};

    const DEV: UserPtr = UserPtr::from_word(0x2000_1000);

    #[test]
    fn test_us_to_ticks_layout() {
        let request = counter_us_to_ticks(DEV, 1_000_000).unwrap();
        assert_eq!(request.id, SYS_COUNTER_US_TO_TICKS);
        assert_eq!(request.words, SyscallWords::new(0x2000_1000, 0x000F_4240, 0, 0, 0, 0));
        assert_eq!(request.ret, RetKind::U32);
    }

    #[test]
    fn test_set_guard_period_layout() {
        let request = counter_set_guard_period(DEV, 50, 1).unwrap();
        assert_eq!(request.words, SyscallWords::new(0x2000_1000, 50, 1, 0, 0, 0));
        assert_eq!(request.ret, RetKind::I32);
    }

    #[test]
    fn test_every_stub_packs() {
        let thread = UserPtr::from_word(0x2000_2000);
        let requests = [
            k_object_access_grant(DEV, thread),
            k_object_release(DEV),
            counter_start(DEV),
            counter_stop(DEV),
            counter_read(DEV),
            counter_get_frequency(DEV),
            counter_us_to_ticks(DEV, u64::MAX),
            counter_ticks_to_us(DEV, 1),
            counter_get_max_top_value(DEV),
            counter_get_num_of_channels(DEV),
            counter_get_pending_int(DEV),
            counter_get_guard_period(DEV, 0),
            counter_set_guard_period(DEV, 0, 0),
        ];
        for (id, request) in requests.into_iter().enumerate() {
            assert_eq!(request.unwrap().id, id);
        }
    }
}
