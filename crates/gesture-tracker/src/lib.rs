//! Hand Gesture Tracker
//!
//! Turns per-frame 21-point hand landmark sets into gesture events. Up to two
//! hands are tracked independently by their stable per-frame index, each with
//! its own wrist-motion history.
//!
//! Gesture callbacks are edge-triggered per hand: an event fires when the
//! recognized gesture for that hand changes (including none to some), not on
//! every frame the gesture is held.

pub mod angles;
pub mod tracker;

pub use angles::{joint_bend_angles, vector_angle, FingerAngles, DEGENERATE_ANGLE};
pub use tracker::{GestureConfig, GestureEvent, GestureKind, HandGestureTracker};
