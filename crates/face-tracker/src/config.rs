//! Face tracker configuration

use serde::{Deserialize, Serialize};

/// Face tracker thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceTrackerConfig {
    /// Eye aspect ratio below which the eye counts as closed
    pub ear_threshold: f32,

    /// Consecutive closed frames required before a recovery counts as a blink
    pub ear_consec_frames: u32,

    /// Mouth aspect ratio above which the mouth counts as open
    pub mar_threshold: f32,

    /// Margin (px) by which one nose-to-jaw distance must exceed the other
    /// on both landmark pairs to register a sideways head turn
    pub shake_margin: f32,

    /// Slack (px) added to jaw width for the nod-down comparison
    pub nod_slack: f32,

    /// Pitch range (degrees) over the recent window that reads as a nod
    pub dynamic_pitch_range: f64,

    /// Yaw range (degrees) over the recent window that reads as a shake
    pub dynamic_yaw_range: f64,

    /// Mean pitch (degrees) above which a steady pose reads as looking down
    pub static_pitch_mean: f64,

    /// |mean yaw| (degrees) above which a steady pose reads as talking sideways
    pub static_yaw_mean: f64,

    /// Std-dev ceiling (degrees) for a pose to count as steady
    pub static_std_max: f64,

    /// Forward-facing gaze limits (degrees)
    pub forward_yaw_limit: f64,
    pub forward_pitch_limit: f64,

    /// Seconds away from forward-facing before attention-deviation fires
    pub attention_timeout_secs: f64,

    /// Pose window capacity (frames)
    pub pose_window: usize,

    /// Samples required before dynamic/static evaluation runs
    pub pose_min_samples: usize,
}

impl Default for FaceTrackerConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.27,
            ear_consec_frames: 2,
            mar_threshold: 0.5,
            shake_margin: 10.0,
            nod_slack: 3.0,
            dynamic_pitch_range: 5.0,
            dynamic_yaw_range: 20.0,
            static_pitch_mean: 5.0,
            static_yaw_mean: 20.0,
            static_std_max: 5.0,
            forward_yaw_limit: 15.0,
            forward_pitch_limit: 10.0,
            attention_timeout_secs: 3.0,
            pose_window: 10,
            pose_min_samples: 5,
        }
    }
}

impl FaceTrackerConfig {
    /// Stricter attention limits (shorter deviation timeout, tighter gaze cone)
    pub fn strict() -> Self {
        Self {
            forward_yaw_limit: 10.0,
            forward_pitch_limit: 8.0,
            attention_timeout_secs: 2.0,
            ..Default::default()
        }
    }
}
