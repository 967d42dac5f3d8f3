//! System call tests

use std::sync::Arc;
use std::thread;

use mockall::mock;
use mockall::predicate::*;
use proptest::prelude::*;

use rtk_api::syscall::{ARG_SLOTS, ArgKind, CallFrame, RetKind, RetVal, SyscallWords};
use rtk_api::{Errno, UserPtr, Word};
use rtk_syscalls::counter::{CounterDriver, FixedCounter};
use rtk_syscalls::kobject::{ObjectFlags, ObjectRegistry};
use rtk_syscalls::{
    ArgPacker, CallDescriptor, Dispatcher, ExecContext, Fault, Invocation, NR_SYSCALLS,
    SYSCALL_TABLE, SYS_COUNTER_GET_FREQUENCY, SYS_COUNTER_READ, SYS_COUNTER_START,
    SYS_COUNTER_US_TO_TICKS, SYS_K_OBJECT_RELEASE, SyscallRequest, SyscallTable, counter, stubs,
};

mock! {
    pub Counter {}

    impl CounterDriver for Counter {
        fn start(&self) -> Result<(), Errno>;
        fn stop(&self) -> Result<(), Errno>;
        fn read(&self) -> u32;
        fn frequency(&self) -> u32;
        fn max_top_value(&self) -> u32;
        fn channels(&self) -> u8;
        fn pending_int(&self) -> bool;
        fn guard_period(&self, flags: u32) -> u32;
        fn set_guard_period(&self, ticks: u32, flags: u32) -> Result<(), Errno>;
    }
}

const DEV: UserPtr = UserPtr::from_word(0x2000_1000);
const FRAME: CallFrame = CallFrame::from_addr(0x2000_ff00);

/// Registry with a 32.768 kHz counter at `DEV` that thread 1 may use
fn rtc_registry() -> ObjectRegistry {
    let objects = ObjectRegistry::new();
    objects
        .register_counter(DEV, Arc::new(FixedCounter::new(32_768)), ObjectFlags::INITIALIZED)
        .unwrap();
    objects.grant(DEV, 1).unwrap();
    objects
}

#[test]
fn test_counter_us_to_ticks_scenario() {
    let objects = rtc_registry();
    let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
    let mut ctx = ExecContext::new(1);

    let words = SyscallWords::new(DEV.as_word(), 0x000F_4240, 0x0000_0000, 0, 0, 0);
    let word = dispatcher.dispatch(&mut ctx, SYS_COUNTER_US_TO_TICKS, &words, FRAME).unwrap();

    assert_eq!(word, 32_768);
    assert!(ctx.is_running());
    assert_eq!(ctx.frame(), None);
}

#[test]
fn test_verification_sees_reassembled_arguments() {
    let mut driver = MockCounter::new();
    driver.expect_frequency().times(1).return_const(1_000_000u32);
    let objects = ObjectRegistry::new();
    objects
        .register_counter(DEV, Arc::new(driver), ObjectFlags::INITIALIZED | ObjectFlags::PUBLIC)
        .unwrap();
    let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
    let mut ctx = ExecContext::new(7);

    // At 1 MHz ticks equal microseconds, so the result is the low half of `us`
    let us = 0x0000_0001_0000_2710u64;
    let request = stubs::counter_us_to_ticks(DEV, us).unwrap();
    assert_eq!(request.words.0[1], 0x2710);
    assert_eq!(request.words.0[2], 0x1);
    let ret = dispatcher.dispatch_request(&mut ctx, &request, FRAME).unwrap();
    assert_eq!(ret, RetVal::U32(us as u32));
}

#[test]
fn test_driver_errno_passes_through_unchanged() {
    let mut driver = MockCounter::new();
    driver.expect_start().times(1).returning(|| Err(Errno(5)));
    driver
        .expect_set_guard_period()
        .with(eq(40), eq(2))
        .times(1)
        .returning(|_, _| Err(Errno::ENOTSUP));
    let objects = ObjectRegistry::new();
    objects
        .register_counter(DEV, Arc::new(driver), ObjectFlags::INITIALIZED | ObjectFlags::PUBLIC)
        .unwrap();
    let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
    let mut ctx = ExecContext::new(1);

    let word = dispatcher
        .dispatch(&mut ctx, SYS_COUNTER_START, &SyscallWords::new(DEV.as_word(), 0, 0, 0, 0, 0), FRAME)
        .unwrap();
    assert_eq!(word, (-5isize) as Word);

    let request = stubs::counter_set_guard_period(DEV, 40, 2).unwrap();
    let ret = dispatcher.dispatch_request(&mut ctx, &request, FRAME).unwrap();
    assert_eq!(ret, RetVal::I32(-35));
    assert!(ctx.is_running());
}

#[test]
fn test_permission_failures_are_return_values() {
    let objects = rtc_registry();
    let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
    let mut stranger = ExecContext::new(2);

    let word = dispatcher
        .dispatch(&mut stranger, SYS_COUNTER_READ, &SyscallWords::new(DEV.as_word(), 0, 0, 0, 0, 0), FRAME)
        .unwrap();
    assert_eq!(Errno::from_word(word), Some(Errno::EPERM));

    let ret = dispatcher
        .dispatch_request(&mut stranger, &stubs::counter_read(UserPtr::from_word(0x10)).unwrap(), FRAME)
        .unwrap();
    assert_eq!(ret, RetVal::U32(Errno::EBADF.to_return() as u32));
    assert!(stranger.is_running());
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_large_u64_result_is_not_an_errno() {
    let objects = ObjectRegistry::new();
    objects
        .register_counter(DEV, Arc::new(FixedCounter::new(1_000_000)), ObjectFlags::INITIALIZED | ObjectFlags::PUBLIC)
        .unwrap();
    let stopped = UserPtr::from_word(0x2000_3000);
    objects
        .register_counter(stopped, Arc::new(FixedCounter::new(0)), ObjectFlags::INITIALIZED | ObjectFlags::PUBLIC)
        .unwrap();
    let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
    let mut ctx = ExecContext::new(1);

    let request = stubs::counter_ticks_to_us(DEV, 0xFFFF_FFEA).unwrap();
    let word = dispatcher.dispatch(&mut ctx, request.id, &request.words, FRAME).unwrap();
    assert_eq!(word, 0xFFFF_FFEA);
    assert_eq!(Errno::from_word(word), None);

    let request = stubs::counter_ticks_to_us(stopped, 10).unwrap();
    let word = dispatcher.dispatch(&mut ctx, request.id, &request.words, FRAME).unwrap();
    assert_eq!(Errno::from_word(word), Some(Errno::EINVAL));
}

#[test]
fn test_grant_and_release() {
    let objects = rtc_registry();
    let owner_obj = UserPtr::from_word(0x3000_0001);
    let peer_obj = UserPtr::from_word(0x3000_0002);
    objects.register_thread(owner_obj, 1).unwrap();
    objects.register_thread(peer_obj, 2).unwrap();
    // The owner needs access to the peer's thread object to grant to it
    objects.grant(peer_obj, 1).unwrap();

    let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
    let mut owner = ExecContext::new(1);
    let mut peer = ExecContext::new(2);

    let grant = stubs::k_object_access_grant(DEV, peer_obj).unwrap();
    assert_eq!(dispatcher.dispatch_request(&mut owner, &grant, FRAME), Ok(RetVal::Void));
    assert_eq!(
        dispatcher.dispatch(&mut owner, grant.id, &grant.words, FRAME),
        Ok(0)
    );

    let freq = stubs::counter_get_frequency(DEV).unwrap();
    assert_eq!(dispatcher.dispatch_request(&mut peer, &freq, FRAME), Ok(RetVal::U32(32_768)));

    let release = stubs::k_object_release(DEV).unwrap();
    assert_eq!(dispatcher.dispatch_request(&mut peer, &release, FRAME), Ok(RetVal::Void));
    assert_eq!(
        dispatcher.dispatch_request(&mut peer, &freq, FRAME),
        Ok(RetVal::U32(Errno::EPERM.to_return() as u32))
    );

    // Releasing again is a fault: the object is no longer visible to the peer
    let fault = dispatcher.dispatch_request(&mut peer, &release, FRAME).unwrap_err();
    assert!(matches!(fault, Fault::Oops { id: SYS_K_OBJECT_RELEASE, .. }));
    assert!(!peer.is_running());
    assert!(owner.is_running());
}

#[test]
fn test_counter_family_round_trip() {
    let counter = Arc::new(FixedCounter::new(32_768).with_top(0xffff).with_channels(2));
    let objects = ObjectRegistry::new();
    objects
        .register_counter(DEV, counter.clone(), ObjectFlags::INITIALIZED)
        .unwrap();
    objects.grant(DEV, 1).unwrap();
    let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
    let mut ctx = ExecContext::new(1);
    let mut call = |request: SyscallRequest| dispatcher.dispatch_request(&mut ctx, &request, FRAME).unwrap();

    assert_eq!(call(stubs::counter_start(DEV).unwrap()), RetVal::I32(0));
    counter.advance(0x1_0005);
    assert_eq!(call(stubs::counter_read(DEV).unwrap()), RetVal::U32(5));
    assert_eq!(call(stubs::counter_get_pending_int(DEV).unwrap()), RetVal::I32(1));
    assert_eq!(call(stubs::counter_get_max_top_value(DEV).unwrap()), RetVal::U32(0xffff));
    assert_eq!(call(stubs::counter_get_num_of_channels(DEV).unwrap()), RetVal::U32(2));
    assert_eq!(call(stubs::counter_ticks_to_us(DEV, 16_384).unwrap()), RetVal::U64(500_000));
    assert_eq!(call(stubs::counter_set_guard_period(DEV, 0x1_0000, 0).unwrap()), RetVal::I32(-22));
    assert_eq!(call(stubs::counter_set_guard_period(DEV, 100, 0).unwrap()), RetVal::I32(0));
    assert_eq!(call(stubs::counter_get_guard_period(DEV, 0).unwrap()), RetVal::U32(100));
    assert_eq!(call(stubs::counter_stop(DEV).unwrap()), RetVal::I32(0));
    assert!(!counter.is_running());
}

#[test]
fn test_pure_query_is_idempotent() {
    let objects = rtc_registry();
    let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
    let mut ctx = ExecContext::new(1);
    let request = stubs::counter_us_to_ticks(DEV, 250_000).unwrap();

    let first = dispatcher.dispatch_request(&mut ctx, &request, FRAME);
    let second = dispatcher.dispatch_request(&mut ctx, &request, FRAME);
    assert_eq!(first, Ok(RetVal::U32(8_192)));
    assert_eq!(first, second);
    assert_eq!(ctx.calls_completed(), 2);
    assert_eq!(dispatcher.stats().calls_by_id.get(&SYS_COUNTER_US_TO_TICKS), Some(&2));
}

#[test]
fn test_table_lookup_for_every_id() {
    for id in 0..NR_SYSCALLS {
        let desc = SYSCALL_TABLE.lookup(id).unwrap();
        let expected: usize = desc.args.iter().map(|kind| kind.slots()).sum();
        assert_eq!(desc.arity(), expected);
    }
    assert_eq!(
        SYSCALL_TABLE.lookup(SYS_COUNTER_US_TO_TICKS).unwrap().args,
        &[ArgKind::Pointer, ArgKind::Wide]
    );
    assert!(SYSCALL_TABLE.lookup(NR_SYSCALLS).is_err());
}

#[test]
fn test_unknown_syscall_only_faults_issuing_context() {
    let objects = rtc_registry();
    let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
    let request = stubs::counter_us_to_ticks(DEV, 1_000_000).unwrap();

    thread::scope(|s| {
        let bad = s.spawn(|| {
            let mut ctx = ExecContext::new(9);
            let fault = dispatcher.dispatch(&mut ctx, 0x7fff, &SyscallWords::empty(), FRAME);
            (fault, ctx)
        });
        let good = s.spawn(|| {
            let mut ctx = ExecContext::new(1);
            (0..100)
                .map(|_| dispatcher.dispatch_request(&mut ctx, &request, FRAME))
                .collect::<Vec<_>>()
        });

        let (fault, ctx) = bad.join().unwrap();
        assert_eq!(fault, Err(Fault::UnknownSyscall { id: 0x7fff }));
        assert!(!ctx.is_running());
        assert_eq!(ctx.fault_report().unwrap().fault, Fault::UnknownSyscall { id: 0x7fff });

        for result in good.join().unwrap() {
            assert_eq!(result, Ok(RetVal::U32(32_768)));
        }
    });

    assert_eq!(dispatcher.stats().unknown_syscalls, 1);
}

fn whoami(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    let [rtk_api::syscall::Arg::Wide(tag)] = call.args() else {
        return Err(call.bad_signature());
    };
    let frame = call.caller().frame().ok_or(call.oops("no frame"))?;
    // Thread id in the top byte, frame in the middle, tag in the low bits
    Ok(RetVal::U64(((call.caller().id() as u64) << 56) | ((frame.addr() as u64 & 0xffff) << 32) | (tag & 0xffff_ffff)))
}

static ISOLATION_TABLE: SyscallTable = SyscallTable::new(&[CallDescriptor::new(
    0,
    "whoami",
    &[ArgKind::Wide],
    RetKind::U64,
    whoami,
)]);

#[test]
#[cfg(target_pointer_width = "64")]
fn test_concurrent_contexts_stay_isolated() {
    let objects = ObjectRegistry::new();
    let dispatcher = Dispatcher::new(&ISOLATION_TABLE, &objects);

    thread::scope(|s| {
        for tid in 1..=4u32 {
            let dispatcher = &dispatcher;
            s.spawn(move || {
                let mut ctx = ExecContext::new(tid);
                let frame = CallFrame::from_addr(0x1000 * tid as usize);
                for tag in 0..500u64 {
                    let request = ArgPacker::new()
                        .wide(tag + tid as u64 * 1_000)
                        .finish(ISOLATION_TABLE.lookup(0).unwrap())
                        .unwrap();
                    let word = dispatcher.dispatch(&mut ctx, 0, &request.words, frame).unwrap();
                    let expected = ((tid as u64) << 56) | (((0x1000 * tid as u64) & 0xffff) << 32) | (tag + tid as u64 * 1_000);
                    assert_eq!(word as u64, expected);
                    assert_eq!(ctx.frame(), None);
                }
                assert_eq!(ctx.calls_completed(), 500);
            });
        }
    });

    assert_eq!(dispatcher.stats().total_calls, 2_000);
}

proptest! {
    #[test]
    fn unused_slots_are_never_read(us in any::<u64>(), garbage in any::<[usize; 3]>()) {
        let objects = rtc_registry();
        let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
        let request = stubs::counter_us_to_ticks(DEV, us).unwrap();
        let mut dirty = request.words;
        dirty.0[3..ARG_SLOTS].copy_from_slice(&garbage);

        let mut ctx = ExecContext::new(1);
        let clean = dispatcher.dispatch(&mut ctx, request.id, &request.words, FRAME);
        let noisy = dispatcher.dispatch(&mut ctx, request.id, &dirty, FRAME);
        prop_assert_eq!(clean, noisy);
        prop_assert_eq!(clean, Ok(counter::us_to_ticks(32_768, us) as Word));
    }

    #[test]
    fn single_slot_calls_ignore_the_rest(fill in any::<usize>()) {
        let objects = rtc_registry();
        let dispatcher = Dispatcher::new(&SYSCALL_TABLE, &objects);
        let words = SyscallWords::new(DEV.as_word(), 0, 0, 0, 0, 0);

        let mut ctx = ExecContext::new(1);
        let clean = dispatcher.dispatch(&mut ctx, SYS_COUNTER_GET_FREQUENCY, &words, FRAME);
        let noisy = dispatcher.dispatch(&mut ctx, SYS_COUNTER_GET_FREQUENCY, &words.fill_from(1, fill), FRAME);
        prop_assert_eq!(clean, noisy);
        prop_assert_eq!(clean, Ok(32_768));
    }

    #[test]
    fn wide_argument_reaches_verification_intact(us in any::<u64>()) {
        let objects = ObjectRegistry::new();
        let dispatcher = Dispatcher::new(&ISOLATION_TABLE, &objects);
        let mut ctx = ExecContext::new(0);
        let request = ArgPacker::new().wide(us).finish(ISOLATION_TABLE.lookup(0).unwrap()).unwrap();
        let frame = CallFrame::from_addr(0);
        let word = dispatcher.dispatch(&mut ctx, 0, &request.words, frame).unwrap();
        prop_assert_eq!(word as u64 & 0xffff_ffff, us & 0xffff_ffff);
    }
}
