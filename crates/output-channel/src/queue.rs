//! Bounded delivery queue

use crate::OutputRecord;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use tracing::warn;

struct QueueInner {
    records: VecDeque<OutputRecord>,
    dropped: u64,
    closed: bool,
}

/// Mutex-and-condvar FIFO with drop-oldest overflow.
///
/// Producers never block: when the queue is full the oldest record is
/// discarded (and counted) to make room. Consumers block in [`pop`] until
/// a record arrives or the queue is closed.
///
/// [`pop`]: OutputQueue::pop
pub struct OutputQueue {
    inner: Mutex<QueueInner>,
    available: Condvar,
    capacity: usize,
}

impl OutputQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                records: VecDeque::with_capacity(capacity),
                dropped: 0,
                closed: false,
            }),
            available: Condvar::new(),
            capacity,
        }
    }

    /// Enqueue a record, evicting the oldest one if the queue is full.
    pub fn push(&self, record: OutputRecord) {
        let mut inner = self.inner.lock().expect("output queue poisoned");
        if inner.closed {
            return;
        }
        if inner.records.len() >= self.capacity {
            inner.records.pop_front();
            inner.dropped += 1;
            warn!(dropped = inner.dropped, "output queue full, oldest record dropped");
        }
        inner.records.push_back(record);
        self.available.notify_one();
    }

    /// Block until a record is available. Returns `None` once the queue is
    /// closed and drained.
    pub fn pop(&self) -> Option<OutputRecord> {
        let mut inner = self.inner.lock().expect("output queue poisoned");
        loop {
            if let Some(record) = inner.records.pop_front() {
                return Some(record);
            }
            if inner.closed {
                return None;
            }
            inner = self
                .available
                .wait(inner)
                .expect("output queue poisoned");
        }
    }

    /// Dequeue without blocking.
    pub fn try_pop(&self) -> Option<OutputRecord> {
        let mut inner = self.inner.lock().expect("output queue poisoned");
        inner.records.pop_front()
    }

    /// Close the queue: pushes become no-ops and blocked consumers drain
    /// the remainder, then observe `None`.
    pub fn close(&self) {
        let mut inner = self.inner.lock().expect("output queue poisoned");
        inner.closed = true;
        self.available.notify_all();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("output queue poisoned").records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records evicted by overflow since creation.
    pub fn dropped(&self) -> u64 {
        self.inner.lock().expect("output queue poisoned").dropped
    }
}
