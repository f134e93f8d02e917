//! Event normalization for the classification prompt

use crate::classifier::ClassifyRequest;
use crate::event::{DriverEvent, EventSource};

const BASE_SYSTEM_PROMPT: &str = "You are an in-cabin driving assistant. \
Classify the occupant input into exactly one driving instruction and reply \
with strict JSON only, no prose. The \"intent\" field must be one of: \
speed-control, steering, emergency-brake, gesture-control, voice-command, \
user-posture, protocol-command. Put any parameters (target_speed, angle, \
force_level, gesture_type, posture, command, protocol_id) at the top level.";

const FACE_BIAS: &str = " The input comes from the cabin camera's face \
tracker; favor user-posture unless the posture clearly maps to a command.";

const GESTURE_BIAS: &str = " The input comes from the hand gesture tracker; \
favor gesture-control.";

const VOICE_BIAS: &str = " The input is a voice transcript; favor \
voice-command, or protocol-command when a named protocol is invoked.";

/// Turns a raw [`DriverEvent`] into a classification request: the label is
/// tagged with its provenance and the system prompt is biased toward the
/// channel's natural intent family.
#[derive(Debug, Default, Clone)]
pub struct EventNormalizer;

impl EventNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, event: &DriverEvent) -> ClassifyRequest {
        let bias = match event.source {
            EventSource::Face => FACE_BIAS,
            EventSource::Gesture => GESTURE_BIAS,
            EventSource::Voice => VOICE_BIAS,
        };
        ClassifyRequest {
            source: event.source,
            system_prompt: format!("{BASE_SYSTEM_PROMPT}{bias}"),
            text: format!("[{}] {}", event.source, event.label),
        }
    }
}
