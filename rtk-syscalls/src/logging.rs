//! Unified logging support for rtk-syscalls
//!
//! The dispatch path logs through these macros so the `log` feature can be
//! switched off without sprinkling `#[cfg]` over every call site. With the
//! feature off the arguments are still type-checked and count as used.

/// Unified trace-level logging
macro_rules! sys_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
        #[cfg(not(feature = "log"))]
        { let _ = ::core::format_args!($($arg)*); }
    }
}

/// Unified debug-level logging
macro_rules! sys_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::debug!($($arg)*);
        #[cfg(not(feature = "log"))]
        { let _ = ::core::format_args!($($arg)*); }
    }
}

/// Unified info-level logging
macro_rules! sys_info {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::info!($($arg)*);
        #[cfg(not(feature = "log"))]
        { let _ = ::core::format_args!($($arg)*); }
    }
}

/// Unified warn-level logging
macro_rules! sys_warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::warn!($($arg)*);
        #[cfg(not(feature = "log"))]
        { let _ = ::core::format_args!($($arg)*); }
    }
}

/// Unified error-level logging
macro_rules! sys_error {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::error!($($arg)*);
        #[cfg(not(feature = "log"))]
        { let _ = ::core::format_args!($($arg)*); }
    }
}
