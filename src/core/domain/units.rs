//! Conversions between the units users type (GB) and the units the API takes.
//!
//! Memory is configured in MB, disks in KB and datastores report bytes.

pub const MB_PER_GB: u64 = 1024;
pub const KB_PER_GB: u64 = 1024 * 1024;
pub const BYTES_PER_KB: u64 = 1024;

#[must_use]
pub const fn gb_to_mb(gb: u64) -> u64 {
    gb * MB_PER_GB
}

/// Truncating, like the API's own reporting.
#[must_use]
pub const fn mb_to_gb(mb: u64) -> u64 {
    mb / MB_PER_GB
}

#[must_use]
pub const fn gb_to_kb(gb: u64) -> u64 {
    gb * KB_PER_GB
}

#[must_use]
pub const fn kb_to_gb(kb: u64) -> u64 {
    kb / KB_PER_GB
}

#[must_use]
pub const fn bytes_to_kb(bytes: u64) -> u64 {
    bytes / BYTES_PER_KB
}
