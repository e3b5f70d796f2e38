use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use rand::Rng;

/// Source of record identifiers.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> i64;
}

/// Millisecond timestamp plus up to 999 ms of random jitter.
///
/// Ids correlate with creation time but two calls within the same second may
/// collide or come out of order.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimestampIds;

impl IdSource for TimestampIds {
    fn next_id(&self) -> i64 {
        Utc::now().timestamp_millis() + rand::thread_rng().gen_range(0..1000)
    }
}

/// Strictly increasing ids, for deterministic ordering in tests and tooling.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicI64,
    step: i64,
}

impl SequentialIds {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::Relaxed)
    }
}

/// One id per slot: a fresh draw offset by the slot index.
pub fn slot_ids(ids: &dyn IdSource, count: usize) -> Vec<i64> {
    (0..count).map(|index| ids.next_id() + index as i64).collect()
}
