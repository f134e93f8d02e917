//! Face pose tracker state machine

use crate::attention::{AttentionMonitor, AttentionState};
use crate::config::FaceTrackerConfig;
use crate::geometry::{self, NodDistances, ShakeDistances};
use crate::pose::PoseSolver;
use crate::FaceTrackerError;
use cabin_capture::FaceLandmarks;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use std::time::Instant;
use tracing::debug;

/// Discrete face events emitted on completed occurrences or attention
/// state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceEvent {
    Blink,
    MouthOpen,
    HeadShake,
    HeadNod,
    Attention(AttentionState),
}

impl fmt::Display for FaceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceEvent::Blink => f.write_str("blink"),
            FaceEvent::MouthOpen => f.write_str("mouth-open"),
            FaceEvent::HeadShake => f.write_str("head-shake"),
            FaceEvent::HeadNod => f.write_str("head-nod"),
            FaceEvent::Attention(state) => write!(f, "{state}"),
        }
    }
}

/// Cumulative tracker counters, exposed as a status snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FaceStatus {
    pub blinks: u64,
    pub mouth_opens: u64,
    pub head_shakes: u64,
    pub head_nods: u64,
    pub attention: Option<AttentionState>,
}

/// Attention change callback type.
pub type StatusCallback = Box<dyn Fn(AttentionState) + Send + Sync>;

/// Per-occupant face tracker.
///
/// Debounce counters persist across frames for the tracker's lifetime; they
/// are never negative and reset to zero on state reversal.
pub struct FacePoseTracker {
    config: FaceTrackerConfig,
    solver: PoseSolver,
    attention: AttentionMonitor,

    eye_counter: u32,
    mouth_counter: u32,
    shake_left: u32,
    shake_right: u32,
    nod_flag: u32,

    status: FaceStatus,

    /// Last reported attention state; the callback fires only on change.
    state: Mutex<Option<AttentionState>>,
    on_status_change: Option<StatusCallback>,
}

impl FacePoseTracker {
    pub fn new(config: FaceTrackerConfig) -> Self {
        Self {
            solver: PoseSolver::new(),
            attention: AttentionMonitor::new(config.clone()),
            config,
            eye_counter: 0,
            mouth_counter: 0,
            shake_left: 0,
            shake_right: 0,
            nod_flag: 0,
            status: FaceStatus::default(),
            state: Mutex::new(None),
            on_status_change: None,
        }
    }

    /// Register an attention change callback.
    pub fn on_status_change(&mut self, callback: StatusCallback) {
        self.on_status_change = Some(callback);
    }

    /// Current counter snapshot.
    pub fn status(&self) -> FaceStatus {
        let mut status = self.status;
        status.attention = *self.state.lock().expect("state lock poisoned");
        status
    }

    /// Reset all counters and state (on occupant change).
    pub fn reset(&mut self) {
        self.eye_counter = 0;
        self.mouth_counter = 0;
        self.shake_left = 0;
        self.shake_right = 0;
        self.nod_flag = 0;
        self.status = FaceStatus::default();
        self.attention = AttentionMonitor::new(self.config.clone());
        *self.state.lock().expect("state lock poisoned") = None;
    }

    /// Process one frame's landmarks and return the events it completed.
    pub fn process(
        &mut self,
        landmarks: &FaceLandmarks,
        width: u32,
        height: u32,
    ) -> Result<Vec<FaceEvent>, FaceTrackerError> {
        self.process_at(landmarks, width, height, Instant::now())
    }

    /// `process` with an explicit clock, for deterministic tests.
    pub fn process_at(
        &mut self,
        landmarks: &FaceLandmarks,
        width: u32,
        height: u32,
        now: Instant,
    ) -> Result<Vec<FaceEvent>, FaceTrackerError> {
        let mut events = Vec::new();

        let ear = (geometry::eye_aspect_ratio(landmarks.left_eye())
            + geometry::eye_aspect_ratio(landmarks.right_eye()))
            / 2.0;
        if let Some(event) = self.update_blink(ear) {
            events.push(event);
        }

        let mar = geometry::mouth_aspect_ratio(landmarks.mouth());
        if let Some(event) = self.update_mouth(mar) {
            events.push(event);
        }

        let shake = ShakeDistances::measure(landmarks.nose(), landmarks.jaw());
        if let Some(event) = self.update_head_shake(shake) {
            events.push(event);
        }

        let nod = NodDistances::measure(landmarks.left_eyebrow(), landmarks.jaw());
        if let Some(event) = self.update_head_nod(nod) {
            events.push(event);
        }

        match self.solver.solve(landmarks, width, height) {
            Ok(pose) => {
                let state = self.attention.observe(pose, now);
                if let Some(event) = self.set_state(state) {
                    events.push(event);
                }
            }
            Err(e) => {
                // Attention is skipped this frame; discrete events still stand.
                debug!("pose solve skipped: {e}");
            }
        }

        Ok(events)
    }

    /// Blink debounce: sustained sub-threshold EAR followed by recovery
    /// emits exactly one blink.
    fn update_blink(&mut self, ear: f32) -> Option<FaceEvent> {
        if ear < self.config.ear_threshold {
            self.eye_counter += 1;
            None
        } else {
            let fired = self.eye_counter >= self.config.ear_consec_frames;
            self.eye_counter = 0;
            if fired {
                self.status.blinks += 1;
                Some(FaceEvent::Blink)
            } else {
                None
            }
        }
    }

    /// Mouth-open debounce: any nonzero run above threshold emits one event
    /// on recovery.
    fn update_mouth(&mut self, mar: f32) -> Option<FaceEvent> {
        if mar > self.config.mar_threshold {
            self.mouth_counter += 1;
            None
        } else {
            let fired = self.mouth_counter != 0;
            self.mouth_counter = 0;
            if fired {
                self.status.mouth_opens += 1;
                Some(FaceEvent::MouthOpen)
            } else {
                None
            }
        }
    }

    /// Shake fires only once both turn directions have been seen.
    fn update_head_shake(&mut self, d: ShakeDistances) -> Option<FaceEvent> {
        if d.turned_left(self.config.shake_margin) {
            self.shake_left += 1;
        } else if d.turned_right(self.config.shake_margin) {
            self.shake_right += 1;
        }

        if self.shake_left != 0 && self.shake_right != 0 {
            self.shake_left = 0;
            self.shake_right = 0;
            self.status.head_shakes += 1;
            Some(FaceEvent::HeadShake)
        } else {
            None
        }
    }

    /// Nod fires when the head-down flag is set and the pose recovers.
    fn update_head_nod(&mut self, d: NodDistances) -> Option<FaceEvent> {
        if d.head_down(self.config.nod_slack) {
            self.nod_flag += 1;
        }
        if self.nod_flag != 0 && d.head_up(self.config.nod_slack) {
            self.nod_flag = 0;
            self.status.head_nods += 1;
            Some(FaceEvent::HeadNod)
        } else {
            None
        }
    }

    /// Edge-triggered attention state update, guarded by the state lock.
    fn set_state(&mut self, new_state: AttentionState) -> Option<FaceEvent> {
        let mut state = self.state.lock().expect("state lock poisoned");
        if *state == Some(new_state) {
            return None;
        }
        *state = Some(new_state);
        drop(state);

        if let Some(callback) = &self.on_status_change {
            callback(new_state);
        }
        Some(FaceEvent::Attention(new_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_capture::Point;
    use proptest::prelude::*;

    fn tracker() -> FacePoseTracker {
        FacePoseTracker::new(FaceTrackerConfig::default())
    }

    fn shake(left1: f32, right1: f32, left2: f32, right2: f32) -> ShakeDistances {
        ShakeDistances {
            left1,
            right1,
            left2,
            right2,
        }
    }

    #[test]
    fn test_single_closed_frame_is_not_a_blink() {
        let mut t = tracker();
        assert_eq!(t.update_blink(0.1), None);
        assert_eq!(t.update_blink(0.3), None);
        assert_eq!(t.status().blinks, 0);
    }

    #[test]
    fn test_two_closed_frames_then_recovery_is_one_blink() {
        let mut t = tracker();
        assert_eq!(t.update_blink(0.1), None);
        assert_eq!(t.update_blink(0.1), None);
        assert_eq!(t.update_blink(0.3), Some(FaceEvent::Blink));
        // Counter resets: the next recovery frame emits nothing.
        assert_eq!(t.update_blink(0.3), None);
        assert_eq!(t.status().blinks, 1);
    }

    #[test]
    fn test_mouth_open_once_per_run() {
        let mut t = tracker();
        for _ in 0..7 {
            assert_eq!(t.update_mouth(0.8), None);
        }
        assert_eq!(t.update_mouth(0.2), Some(FaceEvent::MouthOpen));
        assert_eq!(t.update_mouth(0.2), None);
        // Even a one-frame run counts.
        assert_eq!(t.update_mouth(0.8), None);
        assert_eq!(t.update_mouth(0.2), Some(FaceEvent::MouthOpen));
        assert_eq!(t.status().mouth_opens, 2);
    }

    #[test]
    fn test_shake_requires_both_directions() {
        let mut t = tracker();
        // Left turns alone never fire.
        for _ in 0..3 {
            assert_eq!(t.update_head_shake(shake(60.0, 40.0, 55.0, 40.0)), None);
        }
        // First right turn completes the shake.
        assert_eq!(
            t.update_head_shake(shake(40.0, 60.0, 40.0, 55.0)),
            Some(FaceEvent::HeadShake)
        );
        // Both counters reset on fire.
        assert_eq!(t.update_head_shake(shake(40.0, 60.0, 40.0, 55.0)), None);
        assert_eq!(t.status().head_shakes, 1);
    }

    #[test]
    fn test_nod_fires_on_recovery() {
        let mut t = tracker();
        let down = NodDistances {
            eyebrow_sum: 100.0,
            jaw_width: 100.0,
        };
        let up = NodDistances {
            eyebrow_sum: 120.0,
            jaw_width: 100.0,
        };
        assert_eq!(t.update_head_nod(down), None);
        assert_eq!(t.update_head_nod(down), None);
        assert_eq!(t.update_head_nod(up), Some(FaceEvent::HeadNod));
        // Flag reset: recovery without a preceding down phase is silent.
        assert_eq!(t.update_head_nod(up), None);
        assert_eq!(t.status().head_nods, 1);
    }

    #[test]
    fn test_attention_edge_trigger() {
        let mut t = tracker();
        assert_eq!(
            t.set_state(AttentionState::FacingForward),
            Some(FaceEvent::Attention(AttentionState::FacingForward))
        );
        assert_eq!(t.set_state(AttentionState::FacingForward), None);
        assert_eq!(t.set_state(AttentionState::FacingForward), None);
        assert_eq!(
            t.set_state(AttentionState::LookingDown),
            Some(FaceEvent::Attention(AttentionState::LookingDown))
        );
    }

    #[test]
    fn test_process_emits_blink_through_landmarks() {
        let mut t = tracker();
        let now = Instant::now();

        let closed = synthetic_face(1.0);
        let open = synthetic_face(6.0);

        let mut blinks = 0;
        for frame in [&closed, &closed, &closed, &open] {
            let events = t.process_at(frame, 640, 480, now).unwrap();
            blinks += events.iter().filter(|e| **e == FaceEvent::Blink).count();
        }
        assert_eq!(blinks, 1);
    }

    proptest! {
        /// Any run of K >= 2 sub-threshold frames plus one recovery frame is
        /// exactly one blink, independent of K.
        #[test]
        fn blink_fires_exactly_once_per_run(k in 2u32..40) {
            let mut t = tracker();
            for _ in 0..k {
                prop_assert_eq!(t.update_blink(0.2), None);
            }
            prop_assert_eq!(t.update_blink(0.3), Some(FaceEvent::Blink));
            prop_assert_eq!(t.status().blinks, 1);
        }

        /// Any nonzero MAR run above threshold yields exactly one mouth-open.
        #[test]
        fn mouth_open_fires_exactly_once_per_run(k in 1u32..40) {
            let mut t = tracker();
            for _ in 0..k {
                prop_assert_eq!(t.update_mouth(0.9), None);
            }
            prop_assert_eq!(t.update_mouth(0.1), Some(FaceEvent::MouthOpen));
            prop_assert_eq!(t.status().mouth_opens, 1);
        }
    }

    /// A minimal face: neutral head geometry with controllable eye openness.
    fn synthetic_face(eye_open: f32) -> FaceLandmarks {
        let mut points = [Point::default(); 68];

        // Jaw corners and inner jaw points, symmetric about x = 320.
        points[0] = Point::new(220.0, 240.0);
        points[16] = Point::new(420.0, 240.0);
        points[2] = Point::new(230.0, 300.0);
        points[14] = Point::new(410.0, 300.0);
        points[8] = Point::new(320.0, 350.0); // chin

        // Eyebrow reference, high above the jaw line (no nod signal).
        points[19] = Point::new(290.0, 160.0);

        // Nose bridge, centered (no shake signal).
        points[27] = Point::new(320.0, 190.0);
        points[30] = Point::new(320.0, 240.0); // nose tip

        // Eyes: horizontal span 40, vertical span `eye_open` * 4.
        for (start, cx) in [(36usize, 260.0f32), (42, 380.0)] {
            let v = eye_open * 2.0;
            points[start] = Point::new(cx - 20.0, 180.0);
            points[start + 1] = Point::new(cx - 8.0, 180.0 - v);
            points[start + 2] = Point::new(cx + 8.0, 180.0 - v);
            points[start + 3] = Point::new(cx + 20.0, 180.0);
            points[start + 4] = Point::new(cx + 8.0, 180.0 + v);
            points[start + 5] = Point::new(cx - 8.0, 180.0 + v);
        }

        // Mouth: closed (low MAR), wide horizontal span.
        points[48] = Point::new(270.0, 290.0);
        points[54] = Point::new(370.0, 290.0);
        points[50] = Point::new(300.0, 288.0);
        points[57] = Point::new(300.0, 292.0);
        points[52] = Point::new(340.0, 288.0);
        points[55] = Point::new(340.0, 292.0);

        FaceLandmarks::new(points)
    }
}
