//! Per-interceptor request accounting.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters owned by one interceptor instance.
///
/// Updated with relaxed atomics; `success + fault` may briefly trail
/// `request` while calls are in flight. The counters are observability
/// only and carry no cross-field invariant.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    request: AtomicU64,
    success: AtomicU64,
    fault: AtomicU64,
}

impl Counters {
    /// Increments the request counter, returning the post-increment value.
    pub fn next_request(&self) -> u64 {
        self.request.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records a call forwarded without a fault, returning `(success, fault)`.
    pub fn record_success(&self) -> (u64, u64) {
        let success = self.success.fetch_add(1, Ordering::Relaxed) + 1;
        (success, self.fault.load(Ordering::Relaxed))
    }

    /// Records a faulted call, returning `(success, fault)`.
    pub fn record_fault(&self) -> (u64, u64) {
        let fault = self.fault.fetch_add(1, Ordering::Relaxed) + 1;
        (self.success.load(Ordering::Relaxed), fault)
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            request: self.request.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            fault: self.fault.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time view of an interceptor's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Calls seen, including ones rejected for a bad config.
    pub request: u64,
    /// Calls forwarded without a fault decision.
    pub success: u64,
    /// Calls with a fault decision.
    pub fault: u64,
}

/// Renders `success:<s> fault:<f>`, appending the fault/success ratio once
/// there is at least one success to divide by. Three decimals, trailing
/// zeros trimmed.
pub(crate) fn ratio_line(success: u64, fault: u64) -> String {
    if success == 0 {
        return format!("success:{success} fault:{fault}");
    }
    let ratio = format!("{:.3}", fault as f64 / success as f64);
    let ratio = ratio.trim_end_matches('0').trim_end_matches('.');
    format!("success:{success} fault:{fault} ~= {ratio}")
}
