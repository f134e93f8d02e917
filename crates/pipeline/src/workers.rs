//! Worker loops
//!
//! The sensing loops are blocking and run on dedicated threads; the
//! classification worker is async so the HTTP call composes with its
//! timeout. A shared atomic stop flag shuts everything down; the event
//! channel closing stops the classification worker.

use cabin_capture::{FaceLandmarker, FrameSlot, FrameSource, HandLandmarker};
use face_tracker::FacePoseTracker;
use gesture_tracker::HandGestureTracker;
use intent_bridge::{
    decode_response, DriverEvent, EventNormalizer, EventSource, Intent, IntentClassifier,
};
use output_channel::{OutputQueue, OutputRecord};
use safety_arbiter::SafetyArbiter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use voice_segmenter::{AudioSource, Transcriber, UtteranceGate, VoiceConfig};

/// Polling pause when the source has no new frame.
const IDLE_POLL: Duration = Duration::from_millis(5);

/// Pull frames from the camera into the shared latest-frame slot.
pub fn capture_loop(
    mut source: impl FrameSource,
    slot: Arc<FrameSlot>,
    stop: Arc<AtomicBool>,
) {
    while !stop.load(Ordering::Relaxed) {
        match source.next_frame() {
            Ok(Some(frame)) => slot.publish(frame),
            Ok(None) => std::thread::sleep(IDLE_POLL),
            Err(e) => {
                warn!("frame capture failed: {e}");
                std::thread::sleep(IDLE_POLL);
            }
        }
    }
    info!("capture loop stopped");
}

/// Face tracking loop: snapshot the latest frame, run landmark detection,
/// and forward completed face events for classification.
pub fn face_loop(
    slot: Arc<FrameSlot>,
    landmarker: impl FaceLandmarker,
    mut tracker: FacePoseTracker,
    tx: mpsc::Sender<DriverEvent>,
    stop: Arc<AtomicBool>,
    interval: Duration,
) {
    let mut last_seq = None;
    while !stop.load(Ordering::Relaxed) {
        // Copy the frame out; the lock is not held during detection.
        let Some(frame) = slot.snapshot() else {
            std::thread::sleep(interval);
            continue;
        };
        if last_seq == Some(frame.sequence) {
            std::thread::sleep(interval);
            continue;
        }
        last_seq = Some(frame.sequence);

        let faces = match landmarker.detect(&frame) {
            Ok(faces) => faces,
            Err(e) => {
                warn!("face detection failed: {e}");
                continue;
            }
        };
        // Single monitored occupant: first face wins.
        if let Some(face) = faces.first() {
            match tracker.process(face, frame.width, frame.height) {
                Ok(events) => {
                    for event in events {
                        debug!(event = %event, "face event");
                        let driver_event = DriverEvent::new(EventSource::Face, event.to_string());
                        if tx.blocking_send(driver_event).is_err() {
                            info!("event channel closed, face loop stopping");
                            return;
                        }
                    }
                }
                Err(e) => warn!("face tracking failed: {e}"),
            }
        }
        std::thread::sleep(interval);
    }
    info!("face loop stopped");
}

/// Gesture tracking loop, same shape as the face loop.
pub fn gesture_loop(
    slot: Arc<FrameSlot>,
    landmarker: impl HandLandmarker,
    mut tracker: HandGestureTracker,
    tx: mpsc::Sender<DriverEvent>,
    stop: Arc<AtomicBool>,
    interval: Duration,
) {
    let mut last_seq = None;
    while !stop.load(Ordering::Relaxed) {
        let Some(frame) = slot.snapshot() else {
            std::thread::sleep(interval);
            continue;
        };
        if last_seq == Some(frame.sequence) {
            std::thread::sleep(interval);
            continue;
        }
        last_seq = Some(frame.sequence);

        let hands = match landmarker.detect(&frame) {
            Ok(hands) => hands,
            Err(e) => {
                warn!("hand detection failed: {e}");
                continue;
            }
        };
        for event in tracker.process(&hands, frame.width, frame.height) {
            debug!(hand = event.hand_index, gesture = %event.gesture, "gesture event");
            let driver_event = DriverEvent::new(EventSource::Gesture, event.gesture.to_string());
            if tx.blocking_send(driver_event).is_err() {
                info!("event channel closed, gesture loop stopping");
                return;
            }
        }
        std::thread::sleep(interval);
    }
    info!("gesture loop stopped");
}

/// Voice loop: gate the PCM stream into utterances, transcribe each one,
/// and forward non-empty transcripts.
pub fn voice_loop(
    mut audio: impl AudioSource,
    transcriber: impl Transcriber,
    config: VoiceConfig,
    tx: mpsc::Sender<DriverEvent>,
    stop: Arc<AtomicBool>,
) {
    let mut gate = UtteranceGate::new(config.clone());
    while !stop.load(Ordering::Relaxed) {
        let chunk = match audio.next_chunk() {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                warn!("audio capture failed: {e}");
                break;
            }
        };
        let Some(utterance) = gate.push(&chunk) else {
            continue;
        };
        match transcriber.transcribe(&utterance, config.sample_rate) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    info!(transcript = text, "utterance transcribed");
                    let driver_event = DriverEvent::new(EventSource::Voice, text);
                    if tx.blocking_send(driver_event).is_err() {
                        info!("event channel closed, voice loop stopping");
                        return;
                    }
                }
            }
            Err(e) => warn!("transcription failed: {e}"),
        }
    }
    info!("voice loop stopped");
}

/// Classification worker: one event in, exactly one output record out.
///
/// A failed or timed-out classifier call degrades to the default safe
/// intent; it never stalls the pipeline or drops the event.
pub async fn classification_worker<C: IntentClassifier>(
    mut rx: mpsc::Receiver<DriverEvent>,
    classifier: C,
    normalizer: EventNormalizer,
    arbiter: SafetyArbiter,
    occupant: String,
    queue: Arc<OutputQueue>,
    timeout: Duration,
) {
    while let Some(event) = rx.recv().await {
        let request = normalizer.normalize(&event);
        let intent = match tokio::time::timeout(timeout, classifier.classify(request)).await {
            Ok(Ok(reply)) => decode_response(&reply),
            Ok(Err(e)) => {
                warn!(source = %event.source, "classification failed: {e}");
                Intent::default_safe()
            }
            Err(_) => {
                warn!(source = %event.source, "classification timed out");
                Intent::default_safe()
            }
        };

        let instruction = arbiter.arbitrate(&intent);
        info!(code = %instruction.code, "{}", instruction.log_message);
        queue.push(OutputRecord::new(
            &occupant,
            arbiter.role(),
            event.source,
            instruction,
        ));
    }
    info!("classification worker stopped");
}
