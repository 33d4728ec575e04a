use judge::ClaimResult;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use verify::ClaimStatus;

#[derive(Debug, Clone, Copy)]
pub enum Endpoint {
    Simple,
    Context,
}

/// Process-lifetime request counters. Holds no claim content.
pub struct Metrics {
    // Counters
    simple_requests: AtomicUsize,
    context_requests: AtomicUsize,
    claims_returned: AtomicUsize,

    // Per-status counts
    supported: AtomicUsize,
    contradicted: AtomicUsize,
    unsure: AtomicUsize,
    errors: AtomicUsize,

    // Timing (in microseconds)
    total_simple_time_us: AtomicU64,
    total_context_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            simple_requests: AtomicUsize::new(0),
            context_requests: AtomicUsize::new(0),
            claims_returned: AtomicUsize::new(0),
            supported: AtomicUsize::new(0),
            contradicted: AtomicUsize::new(0),
            unsure: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            total_simple_time_us: AtomicU64::new(0),
            total_context_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_request(&self, endpoint: Endpoint, results: &[ClaimResult], duration: Duration) {
        let micros = duration.as_micros() as u64;
        match endpoint {
            Endpoint::Simple => {
                self.simple_requests.fetch_add(1, Ordering::Relaxed);
                self.total_simple_time_us.fetch_add(micros, Ordering::Relaxed);
            }
            Endpoint::Context => {
                self.context_requests.fetch_add(1, Ordering::Relaxed);
                self.total_context_time_us.fetch_add(micros, Ordering::Relaxed);
            }
        }

        self.claims_returned.fetch_add(results.len(), Ordering::Relaxed);
        for result in results {
            let counter = match result.status {
                ClaimStatus::Supported => &self.supported,
                ClaimStatus::Contradicted => &self.contradicted,
                ClaimStatus::Unsure => &self.unsure,
                ClaimStatus::Error => &self.errors,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let simple = self.simple_requests.load(Ordering::Relaxed);
        let context = self.context_requests.load(Ordering::Relaxed);
        MetricsSnapshot {
            total_requests: simple + context,
            simple_requests: simple,
            context_requests: context,
            claims_returned: self.claims_returned.load(Ordering::Relaxed),
            supported: self.supported.load(Ordering::Relaxed),
            contradicted: self.contradicted.load(Ordering::Relaxed),
            unsure: self.unsure.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            avg_simple_time_ms: avg_time_ms(&self.total_simple_time_us, simple),
            avg_context_time_ms: avg_time_ms(&self.total_context_time_us, context),
        }
    }
}

fn avg_time_ms(total_us: &AtomicU64, count: usize) -> f64 {
    let total = total_us.load(Ordering::Relaxed) as f64;
    if count > 0 {
        total / count as f64 / 1000.0 // Convert to ms
    } else {
        0.0
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub simple_requests: usize,
    pub context_requests: usize,
    pub claims_returned: usize,
    pub supported: usize,
    pub contradicted: usize,
    pub unsure: usize,
    pub errors: usize,
    pub avg_simple_time_ms: f64,
    pub avg_context_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
