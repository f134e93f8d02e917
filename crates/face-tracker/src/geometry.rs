//! Landmark geometry: aspect ratios and head-motion distances

use cabin_capture::Point;

/// Eye aspect ratio over a six-point eye contour.
///
/// `(|p1-p5| + |p2-p4|) / (2 |p0-p3|)` — vertical spans over horizontal span.
pub fn eye_aspect_ratio(eye: &[Point]) -> f32 {
    debug_assert_eq!(eye.len(), 6);
    let a = eye[1].distance(&eye[5]);
    let b = eye[2].distance(&eye[4]);
    let c = eye[0].distance(&eye[3]);
    if c == 0.0 {
        return 0.0;
    }
    (a + b) / (2.0 * c)
}

/// Mouth aspect ratio over the 20-point mouth contour (landmarks 48-67,
/// indexed 0-19 here).
pub fn mouth_aspect_ratio(mouth: &[Point]) -> f32 {
    debug_assert_eq!(mouth.len(), 20);
    let a = mouth[2].distance(&mouth[9]);
    let b = mouth[4].distance(&mouth[7]);
    let c = mouth[0].distance(&mouth[6]);
    if c == 0.0 {
        return 0.0;
    }
    (a + b) / (2.0 * c)
}

/// Nose-to-jaw-corner distances used by the shake detector, measured at two
/// landmark pairs: nose bridge top vs outer jaw corners, nose bridge bottom
/// vs inner jaw points.
#[derive(Debug, Clone, Copy)]
pub struct ShakeDistances {
    pub left1: f32,
    pub right1: f32,
    pub left2: f32,
    pub right2: f32,
}

impl ShakeDistances {
    pub fn measure(nose: &[Point], jaw: &[Point]) -> Self {
        debug_assert!(nose.len() >= 4 && jaw.len() >= 17);
        Self {
            left1: nose[0].distance(&jaw[0]),
            right1: nose[0].distance(&jaw[16]),
            left2: nose[3].distance(&jaw[2]),
            right2: nose[3].distance(&jaw[14]),
        }
    }

    /// Head turned so the left face half reads wider on both pairs.
    pub fn turned_left(&self, margin: f32) -> bool {
        self.left1 >= self.right1 + margin && self.left2 >= self.right2 + margin
    }

    /// Symmetric right-turn check.
    pub fn turned_right(&self, margin: f32) -> bool {
        self.right1 >= self.left1 + margin && self.right2 >= self.left2 + margin
    }
}

/// Eyebrow-to-jaw-corner distance sum and jaw width for the nod detector.
#[derive(Debug, Clone, Copy)]
pub struct NodDistances {
    pub eyebrow_sum: f32,
    pub jaw_width: f32,
}

impl NodDistances {
    pub fn measure(left_eyebrow: &[Point], jaw: &[Point]) -> Self {
        debug_assert!(left_eyebrow.len() >= 3 && jaw.len() >= 17);
        let eb = left_eyebrow[2];
        Self {
            eyebrow_sum: eb.distance(&jaw[0]) + eb.distance(&jaw[16]),
            jaw_width: jaw[0].distance(&jaw[16]),
        }
    }

    /// Head pitched down: the eyebrow has dropped toward the jaw line.
    pub fn head_down(&self, slack: f32) -> bool {
        self.eyebrow_sum <= self.jaw_width + slack
    }

    /// Head back up past the same boundary.
    pub fn head_up(&self, slack: f32) -> bool {
        self.eyebrow_sum >= self.jaw_width + slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye(open: f32) -> [Point; 6] {
        // Horizontal span 10, vertical spans `open`.
        [
            Point::new(0.0, 0.0),
            Point::new(3.0, -open / 2.0),
            Point::new(7.0, -open / 2.0),
            Point::new(10.0, 0.0),
            Point::new(7.0, open / 2.0),
            Point::new(3.0, open / 2.0),
        ]
    }

    #[test]
    fn test_ear_open_vs_closed() {
        let open = eye_aspect_ratio(&eye(6.0));
        let closed = eye_aspect_ratio(&eye(1.0));
        assert!(open > 0.27, "open eye EAR {open}");
        assert!(closed < 0.27, "closed eye EAR {closed}");
    }

    #[test]
    fn test_ear_degenerate_span() {
        let collapsed = [Point::new(1.0, 1.0); 6];
        assert_eq!(eye_aspect_ratio(&collapsed), 0.0);
    }

    #[test]
    fn test_shake_distances_symmetric_face() {
        let mut nose = vec![Point::default(); 9];
        nose[0] = Point::new(50.0, 30.0);
        nose[3] = Point::new(50.0, 40.0);
        let mut jaw = vec![Point::default(); 17];
        jaw[0] = Point::new(0.0, 30.0);
        jaw[16] = Point::new(100.0, 30.0);
        jaw[2] = Point::new(5.0, 50.0);
        jaw[14] = Point::new(95.0, 50.0);

        let d = ShakeDistances::measure(&nose, &jaw);
        assert!(!d.turned_left(10.0));
        assert!(!d.turned_right(10.0));
    }

    #[test]
    fn test_shake_distances_turned() {
        // Nose shifted right in the image: left half wider.
        let mut nose = vec![Point::default(); 9];
        nose[0] = Point::new(70.0, 30.0);
        nose[3] = Point::new(70.0, 40.0);
        let mut jaw = vec![Point::default(); 17];
        jaw[0] = Point::new(0.0, 30.0);
        jaw[16] = Point::new(100.0, 30.0);
        jaw[2] = Point::new(5.0, 40.0);
        jaw[14] = Point::new(95.0, 40.0);

        let d = ShakeDistances::measure(&nose, &jaw);
        assert!(d.turned_left(10.0));
        assert!(!d.turned_right(10.0));
    }
}
