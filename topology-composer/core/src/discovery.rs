//! Service-discovery registration constants.
//!
//! Every running service registers an internal DNS record under the shared
//! private namespace; the values here are the naming provider's contract.

/// DNS time-to-live for service records.
pub const DNS_TTL_SECONDS: u64 = 10;

/// Consecutive failed health checks before a record is deregistered.
pub const FAILURE_THRESHOLD: u32 = 2;
