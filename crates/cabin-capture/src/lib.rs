//! Cabin Capture Library
//!
//! Frame and landmark types shared by the cabin monitoring pipeline:
//! - RGB video frames from the cabin camera (~15-20 Hz)
//! - 68-point facial landmark sets
//! - 21-point hand landmark sets (normalized, per-hand index)
//! - Latest-frame slot for fan-out to multiple trackers
//!
//! The camera and the landmark estimators themselves are external
//! collaborators; this crate only defines the seams they plug into.

pub mod frame;
pub mod landmarks;
pub mod slot;

pub use frame::VideoFrame;
pub use landmarks::{FaceLandmarks, HandLandmarks, Point};
pub use slot::FrameSlot;

use thiserror::Error;

/// Capture error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open device: {0}")]
    Open(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Capture timeout")]
    Timeout,

    #[error("Landmark estimation failed: {0}")]
    Estimation(String),

    #[error("Device not initialized")]
    NotInitialized,
}

/// Pull-based frame source (cabin camera or replayed recording).
///
/// `next_frame` returning `Ok(None)` means no new frame was available this
/// poll; it is not an error.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError>;
}

/// Facial landmark estimator: frame -> zero or more 68-point sets.
///
/// An empty result is a normal frame with no visible face.
pub trait FaceLandmarker: Send {
    fn detect(&self, frame: &VideoFrame) -> Result<Vec<FaceLandmarks>, CaptureError>;
}

/// Hand landmark estimator: frame -> zero or more 21-point normalized sets,
/// each tagged with a stable per-hand index within the frame.
pub trait HandLandmarker: Send {
    fn detect(&self, frame: &VideoFrame) -> Result<Vec<HandLandmarks>, CaptureError>;
}

/// Capture configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Device path (e.g., "/dev/video0")
    pub device: String,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::cabin()
    }
}

impl CaptureConfig {
    /// Cabin-facing camera config (occupant monitoring)
    pub fn cabin() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 15,
        }
    }
}
