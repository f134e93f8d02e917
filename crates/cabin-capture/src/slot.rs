//! Latest-frame slot
//!
//! Single-slot buffer shared between the capture loop and the tracker loops.
//! The producer replaces the slot contents on every capture; consumers copy
//! the frame out while holding the lock and release it before running any
//! detection work. Latest-value-wins: stale reads are acceptable and the
//! producer is never back-pressured.

use crate::VideoFrame;
use std::sync::Mutex;
use tracing::trace;

/// Mutex-guarded single-slot latest-frame buffer.
#[derive(Default)]
pub struct FrameSlot {
    inner: Mutex<Option<VideoFrame>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot contents with a newer frame.
    pub fn publish(&self, frame: VideoFrame) {
        trace!(sequence = frame.sequence, "frame published");
        let mut slot = self.inner.lock().expect("frame slot poisoned");
        *slot = Some(frame);
    }

    /// Copy the latest frame out, if any. The lock is released before the
    /// caller runs detection on the copy.
    pub fn snapshot(&self) -> Option<VideoFrame> {
        let slot = self.inner.lock().expect("frame slot poisoned");
        slot.clone()
    }

    /// Sequence number of the latest frame without copying pixel data.
    pub fn latest_sequence(&self) -> Option<u32> {
        let slot = self.inner.lock().expect("frame slot poisoned");
        slot.as_ref().map(|f| f.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(seq: u32) -> VideoFrame {
        VideoFrame::new(vec![seq as u8; 12], 2, 2, seq as u64 * 1000, seq)
    }

    #[test]
    fn test_empty_slot() {
        let slot = FrameSlot::new();
        assert!(slot.snapshot().is_none());
        assert!(slot.latest_sequence().is_none());
    }

    #[test]
    fn test_latest_value_wins() {
        let slot = FrameSlot::new();
        slot.publish(frame(1));
        slot.publish(frame(2));
        let got = slot.snapshot().unwrap();
        assert_eq!(got.sequence, 2);
        // Snapshot is a copy; slot still holds the frame.
        assert_eq!(slot.latest_sequence(), Some(2));
    }

    #[test]
    fn test_concurrent_publish_snapshot() {
        use std::sync::Arc;
        let slot = Arc::new(FrameSlot::new());

        let producer = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                for i in 0..100 {
                    slot.publish(frame(i));
                }
            })
        };

        let consumer = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                let mut last = 0;
                for _ in 0..100 {
                    if let Some(f) = slot.snapshot() {
                        // Sequence numbers never go backwards.
                        assert!(f.sequence >= last);
                        last = f.sequence;
                    }
                }
            })
        };

        producer.join().unwrap();
        consumer.join().unwrap();
    }
}
