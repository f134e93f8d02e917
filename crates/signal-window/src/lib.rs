//! Temporal Signal Windows
//!
//! Fixed-capacity sliding windows over per-frame tracker signals (head pose
//! angles, wrist positions). Oldest entries are evicted on overflow. The
//! `f64` statistics helpers back the attention state machine's rolling
//! mean/std/range checks.

mod window;

pub use window::SignalWindow;

/// Rolling statistics over a window of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl WindowStats {
    /// Compute mean, population standard deviation, min, and max.
    ///
    /// An empty slice yields the all-zero default.
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        let mut m2 = 0.0;
        for &v in values {
            let d = v - mean;
            m2 += d * d;
        }
        let std_dev = (m2 / n).sqrt();

        Self {
            mean,
            std_dev,
            min,
            max,
        }
    }

    /// Max minus min.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}
