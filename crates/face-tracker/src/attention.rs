//! Attention state machine
//!
//! Classifies the occupant's attention from rolling pitch/yaw windows, one
//! state per frame, evaluated in strict precedence:
//! dynamic motion > static pose > forward-gaze timeout > facing-forward.

use crate::config::FaceTrackerConfig;
use crate::pose::PoseAngles;
use serde::{Deserialize, Serialize};
use signal_window::{SignalWindow, WindowStats};
use std::fmt;
use std::time::Instant;

/// Attention states, one reported per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttentionState {
    /// Pitch sweep across the recent window: nodding in agreement
    NodConfirm,
    /// Yaw sweep across the recent window: shaking in refusal
    ShakeReject,
    /// Steady downward pitch (phone in lap)
    LookingDown,
    /// Steady sideways yaw
    TalkingRight,
    TalkingLeft,
    /// Away from forward-facing longer than the timeout
    AttentionDeviation,
    FacingForward,
}

impl fmt::Display for AttentionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttentionState::NodConfirm => "nod-confirm",
            AttentionState::ShakeReject => "shake-reject",
            AttentionState::LookingDown => "looking-down",
            AttentionState::TalkingRight => "talking-right",
            AttentionState::TalkingLeft => "talking-left",
            AttentionState::AttentionDeviation => "attention-deviation",
            AttentionState::FacingForward => "facing-forward",
        };
        f.write_str(s)
    }
}

/// Rolling pose windows plus forward-gaze bookkeeping.
pub struct AttentionMonitor {
    pitch_window: SignalWindow<f64>,
    yaw_window: SignalWindow<f64>,
    last_forward: Instant,
    config: FaceTrackerConfig,
}

impl AttentionMonitor {
    pub fn new(config: FaceTrackerConfig) -> Self {
        Self {
            pitch_window: SignalWindow::new(config.pose_window),
            yaw_window: SignalWindow::new(config.pose_window),
            last_forward: Instant::now(),
            config,
        }
    }

    /// Feed one frame's pose and classify attention at time `now`.
    pub fn observe(&mut self, pose: PoseAngles, now: Instant) -> AttentionState {
        self.pitch_window.push(pose.pitch);
        self.yaw_window.push(pose.yaw);

        if pose.yaw.abs() < self.config.forward_yaw_limit
            && pose.pitch.abs() < self.config.forward_pitch_limit
        {
            self.last_forward = now;
        }

        if let Some(motion) = self.dynamic_motion() {
            return motion;
        }
        if let Some(pose) = self.static_pose() {
            return pose;
        }
        if now.duration_since(self.last_forward).as_secs_f64() > self.config.attention_timeout_secs
        {
            return AttentionState::AttentionDeviation;
        }
        AttentionState::FacingForward
    }

    /// Nod/shake sweeps over the most recent window entries. Nod wins over
    /// shake when both ranges exceed their thresholds.
    fn dynamic_motion(&self) -> Option<AttentionState> {
        let n = self.config.pose_min_samples;
        if self.pitch_window.len() < n {
            return None;
        }
        let pitch = WindowStats::compute(&self.pitch_window.last_n_f64(n));
        let yaw = WindowStats::compute(&self.yaw_window.last_n_f64(n));

        if pitch.range() > self.config.dynamic_pitch_range {
            Some(AttentionState::NodConfirm)
        } else if yaw.range() > self.config.dynamic_yaw_range {
            Some(AttentionState::ShakeReject)
        } else {
            None
        }
    }

    /// Sustained off-center poses with low variance.
    fn static_pose(&self) -> Option<AttentionState> {
        let n = self.config.pose_min_samples;
        if self.pitch_window.len() < n {
            return None;
        }
        let pitch = WindowStats::compute(&self.pitch_window.last_n_f64(n));
        let yaw = WindowStats::compute(&self.yaw_window.last_n_f64(n));

        if pitch.mean > self.config.static_pitch_mean && pitch.std_dev < self.config.static_std_max
        {
            Some(AttentionState::LookingDown)
        } else if yaw.mean > self.config.static_yaw_mean
            && yaw.std_dev < self.config.static_std_max
        {
            Some(AttentionState::TalkingRight)
        } else if yaw.mean < -self.config.static_yaw_mean
            && yaw.std_dev < self.config.static_std_max
        {
            Some(AttentionState::TalkingLeft)
        } else {
            None
        }
    }
}
