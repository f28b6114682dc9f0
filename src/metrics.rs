//! Metric helpers for `wslimit`.
//!
//! This module defines metric names and thin helpers wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. With the `metrics` feature
//! disabled the helpers compile to nothing.

use crate::terminator::CloseCode;

/// Counter of whole messages delivered to consumers.
pub const MESSAGES_DELIVERED: &str = "wslimit_messages_delivered_total";
/// Counter of fragments forwarded to partial consumers.
pub const FRAGMENTS_FORWARDED: &str = "wslimit_fragments_forwarded_total";
/// Counter of messages rejected for exceeding their limit.
pub const SIZE_VIOLATIONS: &str = "wslimit_size_violations_total";
/// Counter of close handshakes initiated, labelled by status code.
pub const CLOSES_TOTAL: &str = "wslimit_closes_total";

/// Record a delivered whole message.
pub fn inc_messages_delivered() {
    #[cfg(feature = "metrics")]
    metrics::counter!(MESSAGES_DELIVERED).increment(1);
}

/// Record a forwarded fragment.
pub fn inc_fragments_forwarded() {
    #[cfg(feature = "metrics")]
    metrics::counter!(FRAGMENTS_FORWARDED).increment(1);
}

/// Record a size violation.
pub fn inc_size_violations() {
    #[cfg(feature = "metrics")]
    metrics::counter!(SIZE_VIOLATIONS).increment(1);
}

/// Record a close handshake with `code`.
pub fn inc_closes(code: CloseCode) {
    #[cfg(feature = "metrics")]
    metrics::counter!(CLOSES_TOTAL, "code" => code.as_u16().to_string()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = code;
}
