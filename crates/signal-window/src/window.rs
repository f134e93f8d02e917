//! Sliding window implementation

use std::collections::VecDeque;

/// Fixed-capacity sliding window. Pushing onto a full window evicts the
/// oldest entry.
#[derive(Debug, Clone)]
pub struct SignalWindow<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> SignalWindow<T> {
    /// Create a window holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be nonzero");
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if the window is full.
    pub fn push(&mut self, item: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample.
    pub fn back(&self) -> Option<&T> {
        self.data.back()
    }

    /// Sample `n` positions before the most recent (0 = most recent).
    pub fn nth_back(&self, n: usize) -> Option<&T> {
        if n < self.data.len() {
            self.data.get(self.data.len() - 1 - n)
        } else {
            None
        }
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over the `n` most recent samples, oldest first.
    pub fn last_n(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.data.len().saturating_sub(n);
        self.data.iter().skip(skip)
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: Copy + Into<f64>> SignalWindow<T> {
    /// Collect the `n` most recent samples as f64 for statistics.
    pub fn last_n_f64(&self, n: usize) -> Vec<f64> {
        self.last_n(n).map(|&v| v.into()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_eviction_order() {
        let mut w = SignalWindow::new(3);
        for i in 0..5 {
            w.push(i);
        }
        let items: Vec<_> = w.iter().copied().collect();
        assert_eq!(items, vec![2, 3, 4]);
        assert_eq!(w.back(), Some(&4));
        assert_eq!(w.nth_back(1), Some(&3));
        assert_eq!(w.nth_back(3), None);
    }

    #[test]
    fn test_last_n() {
        let mut w = SignalWindow::new(10);
        for i in 0..10 {
            w.push(i as f64);
        }
        let last5: Vec<_> = w.last_n(5).copied().collect();
        assert_eq!(last5, vec![5.0, 6.0, 7.0, 8.0, 9.0]);
        // Asking for more than present yields everything.
        assert_eq!(w.last_n(100).count(), 10);
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity(cap in 1usize..20, pushes in 0usize..100) {
            let mut w = SignalWindow::new(cap);
            for i in 0..pushes {
                w.push(i);
            }
            prop_assert!(w.len() <= cap);
            prop_assert_eq!(w.len(), pushes.min(cap));
        }

        #[test]
        fn back_is_last_pushed(pushes in 1usize..50) {
            let mut w = SignalWindow::new(10);
            for i in 0..pushes {
                w.push(i);
            }
            prop_assert_eq!(w.back(), Some(&(pushes - 1)));
        }
    }
}
