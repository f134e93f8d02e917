//! Tolerant reply decoding
//!
//! Chat models wrap JSON in code fences, rename fields, and stringify
//! numbers. Decoding absorbs all of that; the only hard failure mode is
//! the safe default intent.

use crate::{GestureLabel, Intent, PostureLabel, SteerDirection};
use serde_json::{Map, Value};
use tracing::warn;

/// Decode a raw model reply into an [`Intent`]. Never fails: anything
/// unusable becomes [`Intent::default_safe`].
pub fn decode_response(content: &str) -> Intent {
    match try_decode(content) {
        Some(intent) => intent,
        None => {
            warn!(reply = content, "undecodable model reply, using default intent");
            Intent::default_safe()
        }
    }
}

fn try_decode(content: &str) -> Option<Intent> {
    let body = strip_code_fence(content);
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    let tag = obj.get("intent")?.as_str()?;
    // Parameters may be nested under "params" or sit beside "intent".
    let params = obj
        .get("params")
        .and_then(Value::as_object)
        .unwrap_or(obj);
    from_wire(tag, params)
}

/// Strip a Markdown code fence (with optional language tag) around `content`.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn normalize_tag(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace([' ', '_'], "-")
}

fn from_wire(tag: &str, params: &Map<String, Value>) -> Option<Intent> {
    match normalize_tag(tag).as_str() {
        "speed-control" | "speed" | "cruise" | "accelerate" | "decelerate" => {
            Some(Intent::SpeedControl {
                target_speed: get_f64(params, &["target_speed", "speed", "speed_value"])
                    .unwrap_or(0.0),
                acceleration: get_f64(params, &["acceleration", "accel"]),
            })
        }
        tag @ ("steering" | "steer" | "steering-control" | "turn-left" | "turn-right") => {
            let direction = get_str(params, &["direction"])
                .and_then(|d| match normalize_tag(&d).as_str() {
                    "left" => Some(SteerDirection::Left),
                    "right" => Some(SteerDirection::Right),
                    _ => None,
                })
                .or(match tag {
                    "turn-left" => Some(SteerDirection::Left),
                    "turn-right" => Some(SteerDirection::Right),
                    _ => None,
                });
            Some(Intent::Steering {
                angle: get_f64(params, &["angle", "steering_angle"]).unwrap_or(0.0),
                direction,
            })
        }
        "emergency-brake" | "emergency-braking" | "brake" => Some(Intent::EmergencyBrake {
            force_level: get_f64(params, &["force_level", "level"])
                .filter(|v| (0.0..=255.0).contains(v))
                .map(|v| v as u8)
                .unwrap_or(1),
        }),
        "gesture-control" | "gesture" => Some(Intent::GestureControl {
            gesture: get_str(params, &["gesture_type", "gesture"])?
                .parse::<GestureLabel>()
                .ok()?,
            action: get_str(params, &["action"]),
        }),
        "voice-command" | "voice" => Some(Intent::VoiceCommand {
            command: get_str(params, &["command", "command_content", "text"])
                .unwrap_or_default(),
        }),
        "user-posture" | "posture" | "face" => Some(Intent::UserPosture {
            posture: get_str(params, &["posture", "pos_type", "user_posture"])?
                .parse::<PostureLabel>()
                .ok()?,
            duration: get_str(params, &["duration"]),
        }),
        "protocol-command" | "protocol" => Some(Intent::ProtocolCommand {
            protocol_id: get_str(params, &["protocol_id", "protocol"]).unwrap_or_default(),
            action: get_str(params, &["action"]),
        }),
        _ => None,
    }
}

/// First matching key, coerced to f64. Accepts numbers and numeric strings.
fn get_f64(params: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| {
        let v = params.get(*k)?;
        v.as_f64().or_else(|| v.as_str()?.trim().parse().ok())
    })
}

/// First matching key as a string. Numbers are stringified.
fn get_str(params: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match params.get(*k)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let intent = decode_response(r#"{"intent": "speed-control", "target_speed": 80}"#);
        assert_eq!(
            intent,
            Intent::SpeedControl {
                target_speed: 80.0,
                acceleration: None
            }
        );
    }

    #[test]
    fn test_fenced_json() {
        let reply = "```json\n{\"intent\": \"emergency-brake\", \"force_level\": 3}\n```";
        assert_eq!(decode_response(reply), Intent::EmergencyBrake { force_level: 3 });
    }

    #[test]
    fn test_nested_params() {
        let reply = r#"{"intent": "steering", "params": {"angle": -20, "direction": "left"}}"#;
        assert_eq!(
            decode_response(reply),
            Intent::Steering {
                angle: -20.0,
                direction: Some(SteerDirection::Left)
            }
        );
    }

    #[test]
    fn test_alias_fields_and_string_numbers() {
        let reply = r#"{"intent": "speed_control", "speed": "65.5"}"#;
        assert_eq!(
            decode_response(reply),
            Intent::SpeedControl {
                target_speed: 65.5,
                acceleration: None
            }
        );
    }

    #[test]
    fn test_turn_alias_implies_direction() {
        let reply = r#"{"intent": "turn-left", "angle": 15}"#;
        assert_eq!(
            decode_response(reply),
            Intent::Steering {
                angle: 15.0,
                direction: Some(SteerDirection::Left)
            }
        );
    }

    #[test]
    fn test_decelerate_alias() {
        let reply = r#"{"intent": "decelerate", "target_speed": 40}"#;
        assert_eq!(
            decode_response(reply),
            Intent::SpeedControl {
                target_speed: 40.0,
                acceleration: None
            }
        );
    }

    #[test]
    fn test_gesture_alias() {
        let reply = r#"{"intent": "gesture-control", "gesture_type": "thumbs_up"}"#;
        assert_eq!(
            decode_response(reply),
            Intent::GestureControl {
                gesture: GestureLabel::ThumbsUp,
                action: None
            }
        );
    }

    #[test]
    fn test_unknown_gesture_falls_back() {
        let reply = r#"{"intent": "gesture-control", "gesture_type": "shrug"}"#;
        assert_eq!(decode_response(reply), Intent::default_safe());
    }

    #[test]
    fn test_unknown_intent_falls_back() {
        assert_eq!(
            decode_response(r#"{"intent": "open-sunroof"}"#),
            Intent::default_safe()
        );
    }

    #[test]
    fn test_garbage_falls_back() {
        assert_eq!(decode_response("I cannot help with that."), Intent::default_safe());
        assert_eq!(decode_response(""), Intent::default_safe());
        assert_eq!(decode_response("[1, 2, 3]"), Intent::default_safe());
    }

    #[test]
    fn test_missing_speed_defaults_to_zero() {
        assert_eq!(
            decode_response(r#"{"intent": "speed-control"}"#),
            Intent::SpeedControl {
                target_speed: 0.0,
                acceleration: None
            }
        );
    }

    #[test]
    fn test_missing_force_level_defaults_low() {
        assert_eq!(
            decode_response(r#"{"intent": "emergency-brake"}"#),
            Intent::EmergencyBrake { force_level: 1 }
        );
    }

    #[test]
    fn test_posture_reply() {
        let reply = r#"{"intent": "user-posture", "posture": "attention_deviation"}"#;
        assert_eq!(
            decode_response(reply),
            Intent::UserPosture {
                posture: PostureLabel::AttentionDeviation,
                duration: None
            }
        );
    }

    #[test]
    fn test_voice_command_text_alias() {
        let reply = r#"{"intent": "voice-command", "text": "turn on the radio"}"#;
        assert_eq!(
            decode_response(reply),
            Intent::VoiceCommand {
                command: "turn on the radio".into()
            }
        );
    }
}
