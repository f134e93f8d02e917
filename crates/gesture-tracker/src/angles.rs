//! Finger joint-bend angle computation

use cabin_capture::Point;

/// Sentinel angle for degenerate (zero-length) joint vectors.
pub const DEGENERATE_ANGLE: f32 = 180.0;

/// Landmark index pairs per finger: (proximal joint for the wrist vector,
/// mid-joint, fingertip). Order: thumb, index, middle, ring, pinky.
const FINGER_JOINTS: [(usize, usize, usize); 5] = [
    (2, 3, 4),
    (6, 7, 8),
    (10, 11, 12),
    (14, 15, 16),
    (18, 19, 20),
];

/// Per-finger bend angles in degrees, thumb first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerAngles(pub [f32; 5]);

impl FingerAngles {
    pub fn thumb(&self) -> f32 {
        self.0[0]
    }

    /// Index, middle, ring, pinky.
    pub fn non_thumb(&self) -> &[f32] {
        &self.0[1..]
    }
}

/// Angle in degrees between two 2-D vectors via arccos of the normalized dot
/// product. A zero-length vector yields the sentinel 180 degrees.
pub fn vector_angle(v1: (f32, f32), v2: (f32, f32)) -> f32 {
    let norm1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let norm2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if norm1 == 0.0 || norm2 == 0.0 {
        return DEGENERATE_ANGLE;
    }
    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos = (dot / (norm1 * norm2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Five joint-bend angles from pixel-space hand landmarks: the angle between
/// the wrist-to-proximal-joint vector and the mid-joint-to-fingertip vector.
pub fn joint_bend_angles(landmarks: &[Point; 21]) -> FingerAngles {
    let wrist = landmarks[0];
    let mut out = [0.0f32; 5];
    for (i, &(base, mid, tip)) in FINGER_JOINTS.iter().enumerate() {
        let v1 = (wrist.x - landmarks[base].x, wrist.y - landmarks[base].y);
        let v2 = (
            landmarks[mid].x - landmarks[tip].x,
            landmarks[mid].y - landmarks[tip].y,
        );
        out[i] = vector_angle(v1, v2);
    }
    FingerAngles(out)
}
