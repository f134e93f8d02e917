//! Face Pose Tracker
//!
//! Turns per-frame 68-point facial landmark sets into discrete behavioral
//! events:
//! - Blink and mouth-open detection (aspect-ratio debouncing)
//! - Head-shake and head-nod detection (landmark distance heuristics)
//! - Attention state machine over rolling pitch/yaw windows
//!
//! The attention state is edge-triggered: a state change is reported once,
//! guarded by a lock around the state field. Discrete events (blink, shake,
//! nod, mouth-open) fire once per completed occurrence by construction.

pub mod attention;
pub mod config;
pub mod geometry;
pub mod pose;
pub mod tracker;

pub use attention::{AttentionMonitor, AttentionState};
pub use config::FaceTrackerConfig;
pub use pose::{PoseAngles, PoseSolver};
pub use tracker::{FaceEvent, FacePoseTracker, FaceStatus};

use thiserror::Error;

/// Face tracker error types
#[derive(Error, Debug)]
pub enum FaceTrackerError {
    #[error("Pose solve failed: {0}")]
    PoseSolve(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
