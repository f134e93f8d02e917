//! Typed intent model
//!
//! The language model replies with loose JSON; this module is the typed
//! shape that survives decoding. Every variant carries exactly the
//! parameters its downstream instruction needs, so arbitration never
//! re-parses strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Steering direction hint, when the model supplies one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SteerDirection {
    Left,
    Right,
}

/// Recognized hand gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureLabel {
    Wave,
    ThumbsUp,
    Fist,
    IndexPoint,
}

impl FromStr for GestureLabel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '_'], "-").as_str() {
            "wave" | "waving" => Ok(GestureLabel::Wave),
            "thumbs-up" | "thumb-up" | "thumbsup" => Ok(GestureLabel::ThumbsUp),
            "fist" | "closed-fist" => Ok(GestureLabel::Fist),
            "index-point" | "point" | "pointing" => Ok(GestureLabel::IndexPoint),
            _ => Err(()),
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureLabel::Wave => write!(f, "wave"),
            GestureLabel::ThumbsUp => write!(f, "thumbs-up"),
            GestureLabel::Fist => write!(f, "fist"),
            GestureLabel::IndexPoint => write!(f, "index-point"),
        }
    }
}

/// Recognized occupant postures, mirroring the face tracker's attention
/// vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostureLabel {
    NodConfirm,
    ShakeReject,
    LookingDown,
    TalkingRight,
    TalkingLeft,
    AttentionDeviation,
    FacingForward,
}

impl FromStr for PostureLabel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '_'], "-").as_str() {
            "nod-confirm" | "nod" => Ok(PostureLabel::NodConfirm),
            "shake-reject" | "shake" => Ok(PostureLabel::ShakeReject),
            "looking-down" => Ok(PostureLabel::LookingDown),
            "talking-right" => Ok(PostureLabel::TalkingRight),
            "talking-left" => Ok(PostureLabel::TalkingLeft),
            "attention-deviation" | "distracted" => Ok(PostureLabel::AttentionDeviation),
            "facing-forward" => Ok(PostureLabel::FacingForward),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PostureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostureLabel::NodConfirm => write!(f, "nod-confirm"),
            PostureLabel::ShakeReject => write!(f, "shake-reject"),
            PostureLabel::LookingDown => write!(f, "looking-down"),
            PostureLabel::TalkingRight => write!(f, "talking-right"),
            PostureLabel::TalkingLeft => write!(f, "talking-left"),
            PostureLabel::AttentionDeviation => write!(f, "attention-deviation"),
            PostureLabel::FacingForward => write!(f, "facing-forward"),
        }
    }
}

/// Decoded classification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "kebab-case")]
pub enum Intent {
    SpeedControl {
        target_speed: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        acceleration: Option<f64>,
    },
    Steering {
        angle: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction: Option<SteerDirection>,
    },
    EmergencyBrake {
        force_level: u8,
    },
    GestureControl {
        gesture: GestureLabel,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<String>,
    },
    VoiceCommand {
        command: String,
    },
    UserPosture {
        posture: PostureLabel,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<String>,
    },
    ProtocolCommand {
        protocol_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<String>,
    },
}

impl Intent {
    /// Fallback used whenever classification cannot produce a usable intent:
    /// hold speed at zero.
    pub fn default_safe() -> Self {
        Intent::SpeedControl {
            target_speed: 0.0,
            acceleration: None,
        }
    }

    /// Wire tag for this variant, matching the model's vocabulary.
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::SpeedControl { .. } => "speed-control",
            Intent::Steering { .. } => "steering",
            Intent::EmergencyBrake { .. } => "emergency-brake",
            Intent::GestureControl { .. } => "gesture-control",
            Intent::VoiceCommand { .. } => "voice-command",
            Intent::UserPosture { .. } => "user-posture",
            Intent::ProtocolCommand { .. } => "protocol-command",
        }
    }
}
