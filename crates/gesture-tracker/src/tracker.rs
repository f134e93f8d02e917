//! Gesture classification and per-hand tracking

use crate::angles::{joint_bend_angles, FingerAngles};
use cabin_capture::HandLandmarks;
use serde::{Deserialize, Serialize};
use signal_window::SignalWindow;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Recognized gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureKind {
    Wave,
    ThumbsUp,
    Fist,
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GestureKind::Wave => "wave",
            GestureKind::ThumbsUp => "thumbs-up",
            GestureKind::Fist => "fist",
        };
        f.write_str(s)
    }
}

/// A gesture recognized for one hand in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub hand_index: usize,
    pub gesture: GestureKind,
}

/// Gesture tracker thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Bend angle below which a finger counts as straight (degrees)
    pub straight_angle: f32,

    /// Bend angle above which a finger counts as bent (degrees)
    pub bent_angle: f32,

    /// Wrist-x displacement between the two most recent samples that counts
    /// as wave motion (pixels)
    pub move_threshold: f32,

    /// Wrist position history length per hand (samples)
    pub motion_window: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            straight_angle: 50.0,
            bent_angle: 65.0,
            move_threshold: 30.0,
            motion_window: 5,
        }
    }
}

/// Per-hand motion history and edge-trigger state.
struct HandTrack {
    wrist_x: SignalWindow<f32>,
    last_gesture: Option<GestureKind>,
}

impl HandTrack {
    fn new(window: usize) -> Self {
        Self {
            wrist_x: SignalWindow::new(window),
            last_gesture: None,
        }
    }
}

/// Hand gesture tracker for up to two independently tracked hands.
pub struct HandGestureTracker {
    config: GestureConfig,
    hands: HashMap<usize, HandTrack>,
}

impl HandGestureTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            hands: HashMap::new(),
        }
    }

    /// Process one frame's detected hands. Returns the gesture changes this
    /// frame (edge-triggered per hand). An empty slice is a normal frame
    /// with no hands visible.
    pub fn process(
        &mut self,
        hands: &[HandLandmarks],
        width: u32,
        height: u32,
    ) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        for hand in hands {
            let pixels = hand.to_pixels(width, height);
            let angles = joint_bend_angles(&pixels);

            let track = self
                .hands
                .entry(hand.hand_index)
                .or_insert_with(|| HandTrack::new(self.config.motion_window));
            track.wrist_x.push(pixels[HandLandmarks::WRIST].x);

            let gesture = classify(&angles, &track.wrist_x, &self.config);

            if gesture != track.last_gesture {
                track.last_gesture = gesture;
                if let Some(g) = gesture {
                    debug!(hand = hand.hand_index, gesture = %g, "gesture recognized");
                    events.push(GestureEvent {
                        hand_index: hand.hand_index,
                        gesture: g,
                    });
                }
            }
        }

        events
    }

    /// Forget motion history and edge state (on occupant change).
    pub fn reset(&mut self) {
        self.hands.clear();
    }
}

/// Classify one hand's gesture. Precedence: wave > thumbs-up > fist; first
/// match wins; no match is no gesture this frame.
fn classify(
    angles: &FingerAngles,
    wrist_x: &SignalWindow<f32>,
    config: &GestureConfig,
) -> Option<GestureKind> {
    let straight = |a: f32| a < config.straight_angle;
    let bent = |a: f32| a > config.bent_angle;

    let fingers_open = angles.non_thumb().iter().all(|&a| straight(a));

    if fingers_open {
        if let (Some(&curr), Some(&prev)) = (wrist_x.nth_back(0), wrist_x.nth_back(1)) {
            if (curr - prev).abs() > config.move_threshold {
                return Some(GestureKind::Wave);
            }
        }
    }

    if straight(angles.thumb()) && angles.non_thumb().iter().all(|&a| bent(a)) {
        return Some(GestureKind::ThumbsUp);
    }

    if angles.0.iter().all(|&a| bent(a)) {
        return Some(GestureKind::Fist);
    }

    None
}
