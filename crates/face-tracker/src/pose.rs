//! Head pose estimation
//!
//! Perspective-point pose solve (POSIT iteration) of six facial landmarks
//! against fixed anthropometric 3-D reference points, followed by Euler
//! angle extraction. Angles are wrapped into [-90, 90] degrees so a frontal
//! face reads as (0, 0, 0) despite the model's y-up / image y-down flip.

use crate::FaceTrackerError;
use cabin_capture::FaceLandmarks;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};

/// Head pose Euler angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseAngles {
    /// Up-down tilt
    pub pitch: f64,
    /// Left-right rotation
    pub yaw: f64,
    /// Side tilt
    pub roll: f64,
}

/// Landmark indices of the six pose reference points: nose tip, chin,
/// left/right eye corner, left/right mouth corner.
const POSE_LANDMARKS: [usize; 6] = [30, 8, 36, 45, 48, 54];

/// Anthropometric 3-D reference points matching `POSE_LANDMARKS`, in model
/// units (nose tip at the origin, y up).
const MODEL_POINTS: [[f64; 3]; 6] = [
    [0.0, 0.0, 0.0],
    [0.0, -330.0, -65.0],
    [-225.0, 170.0, -135.0],
    [225.0, 170.0, -135.0],
    [-150.0, -150.0, -125.0],
    [150.0, -150.0, -125.0],
];

const MAX_ITERATIONS: usize = 30;
const CONVERGENCE_EPS: f64 = 1e-6;

/// POSIT pose solver with the object-matrix pseudo-inverse precomputed.
pub struct PoseSolver {
    /// Object vectors relative to the reference point (rows 1..6 of the model)
    object: [Vector3<f64>; 5],
    /// Pseudo-inverse of the object matrix
    pinv: SMatrix<f64, 3, 5>,
}

impl Default for PoseSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseSolver {
    pub fn new() -> Self {
        let reference = Vector3::from(MODEL_POINTS[0]);
        let mut object = [Vector3::zeros(); 5];
        let mut a = SMatrix::<f64, 5, 3>::zeros();
        for i in 0..5 {
            object[i] = Vector3::from(MODEL_POINTS[i + 1]) - reference;
            a.set_row(i, &object[i].transpose());
        }

        // (AᵀA)⁻¹Aᵀ; the fixed model points are full rank, so the inverse exists.
        let ata = a.transpose() * a;
        let pinv = ata
            .try_inverse()
            .expect("anthropometric model matrix is full rank")
            * a.transpose();

        Self { object, pinv }
    }

    /// Solve head pose for a landmark set observed at the given frame size.
    ///
    /// Camera intrinsics follow the usual webcam assumption: focal length =
    /// frame width, principal point at the frame center, no distortion.
    pub fn solve(
        &self,
        landmarks: &FaceLandmarks,
        width: u32,
        height: u32,
    ) -> Result<PoseAngles, FaceTrackerError> {
        let focal = width as f64;
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;

        // Normalized image coordinates of the six reference landmarks.
        let mut img = [[0.0f64; 2]; 6];
        for (i, &lm) in POSE_LANDMARKS.iter().enumerate() {
            let p = landmarks.points[lm];
            img[i] = [(p.x as f64 - cx) / focal, (p.y as f64 - cy) / focal];
        }

        let mut eps = SVector::<f64, 5>::zeros();
        let mut rotation = Matrix3::identity();

        for _ in 0..MAX_ITERATIONS {
            let mut xp = SVector::<f64, 5>::zeros();
            let mut yp = SVector::<f64, 5>::zeros();
            for i in 0..5 {
                xp[i] = img[i + 1][0] * (1.0 + eps[i]) - img[0][0];
                yp[i] = img[i + 1][1] * (1.0 + eps[i]) - img[0][1];
            }

            let i_vec = self.pinv * xp;
            let j_vec = self.pinv * yp;
            let norm_i = i_vec.norm();
            let norm_j = j_vec.norm();
            if norm_i < f64::EPSILON || norm_j < f64::EPSILON {
                return Err(FaceTrackerError::PoseSolve(
                    "degenerate image configuration".into(),
                ));
            }

            let r1 = i_vec / norm_i;
            let r2 = j_vec / norm_j;
            let r3 = r1.cross(&r2);
            // Re-orthogonalize the second row so the matrix stays a rotation.
            let r2 = r3.cross(&r1);

            rotation = Matrix3::from_rows(&[r1.transpose(), r2.transpose(), r3.transpose()]);

            let scale = (norm_i + norm_j) / 2.0;
            let z0 = 1.0 / scale;

            let mut next = SVector::<f64, 5>::zeros();
            for i in 0..5 {
                next[i] = r3.dot(&self.object[i]) / z0;
            }

            let delta = (next - eps).amax();
            eps = next;
            if delta < CONVERGENCE_EPS {
                break;
            }
        }

        Ok(euler_from_rotation(&rotation))
    }
}

/// Extract wrapped Euler angles (degrees) from a rotation matrix, assuming
/// the R = Rz(roll) Ry(yaw) Rx(pitch) composition.
fn euler_from_rotation(r: &Matrix3<f64>) -> PoseAngles {
    let sy = (r[(0, 0)] * r[(0, 0)] + r[(1, 0)] * r[(1, 0)]).sqrt();
    let pitch = r[(2, 1)].atan2(r[(2, 2)]).to_degrees();
    let yaw = (-r[(2, 0)]).atan2(sy).to_degrees();
    let roll = r[(1, 0)].atan2(r[(0, 0)]).to_degrees();

    PoseAngles {
        pitch: wrap_half(pitch),
        yaw: wrap_half(yaw),
        roll: wrap_half(roll),
    }
}

/// Fold an angle into [-90, 90] degrees.
fn wrap_half(angle: f64) -> f64 {
    if angle > 90.0 {
        angle - 180.0
    } else if angle < -90.0 {
        angle + 180.0
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_capture::Point;

    const WIDTH: u32 = 640;
    const HEIGHT: u32 = 480;

    /// Project the model points through rotation + translation with the
    /// solver's camera assumptions, filling only the six pose landmarks.
    fn project(rotation: &Matrix3<f64>, tz: f64) -> FaceLandmarks {
        let focal = WIDTH as f64;
        let cx = WIDTH as f64 / 2.0;
        let cy = HEIGHT as f64 / 2.0;

        let mut points = [Point::default(); 68];
        for (i, &lm) in POSE_LANDMARKS.iter().enumerate() {
            let m = Vector3::from(MODEL_POINTS[i]);
            let c = rotation * m + Vector3::new(0.0, 0.0, tz);
            assert!(c.z > 0.0, "model point behind camera");
            points[lm] = Point::new(
                (focal * c.x / c.z + cx) as f32,
                (focal * c.y / c.z + cy) as f32,
            );
        }
        FaceLandmarks::new(points)
    }

    fn rx(deg: f64) -> Matrix3<f64> {
        let (s, c) = deg.to_radians().sin_cos();
        Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
    }

    fn ry(deg: f64) -> Matrix3<f64> {
        let (s, c) = deg.to_radians().sin_cos();
        Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
    }

    #[test]
    fn test_frontal_face_is_near_zero() {
        // Frontal face: model y-up flipped into image y-down.
        let landmarks = project(&rx(180.0), 1000.0);
        let angles = PoseSolver::new().solve(&landmarks, WIDTH, HEIGHT).unwrap();
        assert!(angles.pitch.abs() < 2.0, "pitch {}", angles.pitch);
        assert!(angles.yaw.abs() < 2.0, "yaw {}", angles.yaw);
        assert!(angles.roll.abs() < 2.0, "roll {}", angles.roll);
    }

    #[test]
    fn test_pitch_recovery() {
        let landmarks = project(&rx(190.0), 1000.0);
        let angles = PoseSolver::new().solve(&landmarks, WIDTH, HEIGHT).unwrap();
        assert!((angles.pitch - 10.0).abs() < 3.0, "pitch {}", angles.pitch);
        assert!(angles.yaw.abs() < 3.0, "yaw {}", angles.yaw);
    }

    #[test]
    fn test_yaw_recovery() {
        let landmarks = project(&(ry(20.0) * rx(180.0)), 1000.0);
        let angles = PoseSolver::new().solve(&landmarks, WIDTH, HEIGHT).unwrap();
        assert!((angles.yaw.abs() - 20.0).abs() < 3.0, "yaw {}", angles.yaw);
        assert!(angles.pitch.abs() < 3.0, "pitch {}", angles.pitch);
    }

    #[test]
    fn test_wrap_half() {
        assert_eq!(wrap_half(170.0), -10.0);
        assert_eq!(wrap_half(-170.0), 10.0);
        assert_eq!(wrap_half(45.0), 45.0);
    }
}
