//! Logical clock and identifier minting.
//!
//! A single process-wide counter doubles as the monotonic timestamp
//! source required for time priority: the counter *is* the clock, which
//! keeps ordering deterministic and tests reproducible without reading
//! wall-clock time. Two more counters mint order and trade id strings.

use std::sync::atomic::{AtomicU64, Ordering};

static LOGICAL_CLOCK: AtomicU64 = AtomicU64::new(0);
static ORDER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);
static TRADE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns a strictly increasing logical timestamp. Never returns the same
/// value twice within a process.
pub fn next_timestamp() -> u64 {
    LOGICAL_CLOCK.fetch_add(1, Ordering::Relaxed)
}

/// Mints a new, process-unique order id string, e.g. `"O1"`, `"O2"`.
pub fn next_order_id() -> String {
    let n = ORDER_ID_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("O{n}")
}

/// Mints a new, process-unique trade id string, e.g. `"T1"`, `"T2"`,
/// matching the `"T" + monotonic decimal` format used by
/// `original_source`'s `Trade::generateTradeId`.
pub fn next_trade_id() -> String {
    let n = TRADE_ID_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("T{n}")
}
