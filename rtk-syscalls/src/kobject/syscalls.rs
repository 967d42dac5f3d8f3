//! Kernel object permission calls
//!
//! Both calls return nothing, so a caller could never see an errno from
//! them. Any validation failure here is raised as an oops instead.

use rtk_api::syscall::{Arg, RetVal};

use super::InitCheck;
use crate::core::{Fault, Invocation};

/// Give another thread access to an object the caller can use
pub fn verify_access_grant(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    let [Arg::Pointer(object), Arg::Pointer(thread)] = call.args() else {
        return Err(call.bad_signature());
    };
    let caller = call.caller().id();
    let objects = call.objects();

    objects.validate(*object, None, caller, InitCheck::Any).map_err(|errno| {
        sys_warn!("thread {} may not grant {}: {}", caller, object, errno);
        call.oops("access grant: object not accessible")
    })?;
    let target = objects.thread(*thread, caller).map_err(|errno| {
        sys_warn!("thread {} named bad thread object {}: {}", caller, thread, errno);
        call.oops("access grant: bad thread object")
    })?;
    objects
        .grant(*object, target)
        .map_err(|_| call.oops("access grant: object vanished"))?;

    sys_debug!("thread {} granted {} to thread {}", caller, object, target);
    Ok(RetVal::Void)
}

/// Drop the caller's own access to an object
pub fn verify_release(call: &Invocation<'_>) -> Result<RetVal, Fault> {
    let [Arg::Pointer(object)] = call.args() else {
        return Err(call.bad_signature());
    };
    let caller = call.caller().id();
    let objects = call.objects();

    objects.validate(*object, None, caller, InitCheck::Any).map_err(|errno| {
        sys_warn!("thread {} may not release {}: {}", caller, object, errno);
        call.oops("release: object not accessible")
    })?;
    objects
        .revoke(*object, caller)
        .map_err(|_| call.oops("release: object vanished"))?;
    Ok(RetVal::Void)
}
