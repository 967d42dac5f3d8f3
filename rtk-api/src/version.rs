//! Kernel version record
//!
//! The numbers are produced once at build time from the `VERSION` file (see
//! `build.rs`) and never change at run time.

use ::core::fmt;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/version.rs"));
}

pub use generated::{KERNEL_PATCHLEVEL, KERNEL_VERSION_MAJOR, KERNEL_VERSION_MINOR, KERNEL_VERSION_STRING};

/// Pack a three-part version into a version code
pub const fn version_code(major: u32, minor: u32, patch: u32) -> u32 {
    (major << 16) + (minor << 8) + patch
}

/// Version code of this build
pub const KERNEL_VERSION_CODE: u32 =
    version_code(KERNEL_VERSION_MAJOR, KERNEL_VERSION_MINOR, KERNEL_PATCHLEVEL);

/// Kernel version metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelVersion {
    /// Monotonic version code, `(major << 16) + (minor << 8) + patch`
    pub code: u32,
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch level
    pub patch: u32,
    /// Human readable version, including any pre-release suffix
    pub string: &'static str,
}

impl KernelVersion {
    /// Version number, same as the code
    pub const fn number(&self) -> u32 {
        self.code
    }

    /// Version as reported by the kernel version query, number shifted by one byte
    pub const fn kernel_version_word(&self) -> u32 {
        self.code << 8
    }
}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.string)
    }
}

static VERSION: KernelVersion = KernelVersion {
    code: KERNEL_VERSION_CODE,
    major: KERNEL_VERSION_MAJOR,
    minor: KERNEL_VERSION_MINOR,
    patch: KERNEL_PATCHLEVEL,
    string: KERNEL_VERSION_STRING,
};

/// Get the kernel version record
pub fn get_version() -> &'static KernelVersion {
    &VERSION
}
