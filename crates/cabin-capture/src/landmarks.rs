//! Landmark set types
//!
//! Facial landmarks follow the standard 68-point layout (jaw 0-16,
//! eyebrows 17-26, nose 27-35, eyes 36-47, mouth 48-67). Hand landmarks
//! follow the 21-point layout (wrist 0, then four joints per finger).

use serde::{Deserialize, Serialize};

/// 2-D landmark point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 68-point facial landmark set in pixel coordinates.
///
/// Consumed once by the face tracker and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceLandmarks {
    #[serde(with = "serde_big_array::BigArray")]
    pub points: [Point; 68],
}

impl FaceLandmarks {
    pub const JAW: std::ops::Range<usize> = 0..17;
    pub const LEFT_EYEBROW: std::ops::Range<usize> = 17..22;
    pub const NOSE: std::ops::Range<usize> = 27..36;
    pub const LEFT_EYE: std::ops::Range<usize> = 36..42;
    pub const RIGHT_EYE: std::ops::Range<usize> = 42..48;
    pub const MOUTH: std::ops::Range<usize> = 48..68;

    pub fn new(points: [Point; 68]) -> Self {
        Self { points }
    }

    pub fn jaw(&self) -> &[Point] {
        &self.points[Self::JAW]
    }

    pub fn left_eyebrow(&self) -> &[Point] {
        &self.points[Self::LEFT_EYEBROW]
    }

    pub fn nose(&self) -> &[Point] {
        &self.points[Self::NOSE]
    }

    pub fn left_eye(&self) -> &[Point] {
        &self.points[Self::LEFT_EYE]
    }

    pub fn right_eye(&self) -> &[Point] {
        &self.points[Self::RIGHT_EYE]
    }

    pub fn mouth(&self) -> &[Point] {
        &self.points[Self::MOUTH]
    }
}

/// 21-point hand landmark set in normalized [0, 1] coordinates.
///
/// `hand_index` is stable within a frame (up to two hands), letting the
/// gesture tracker keep independent motion history per hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: [Point; 21],
    pub hand_index: usize,
}

impl HandLandmarks {
    pub const WRIST: usize = 0;

    pub fn new(points: [Point; 21], hand_index: usize) -> Self {
        Self { points, hand_index }
    }

    /// Scale normalized landmarks to pixel coordinates for the given frame.
    pub fn to_pixels(&self, width: u32, height: u32) -> [Point; 21] {
        let mut out = [Point::default(); 21];
        for (i, p) in self.points.iter().enumerate() {
            out[i] = Point::new(p.x * width as f32, p.y * height as f32);
        }
        out
    }
}
