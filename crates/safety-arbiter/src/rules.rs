//! Generic intent rule table
//!
//! Immutable, ordered, loaded once. Each rule pairs an intent tag with a
//! pure validation predicate and the instruction code it produces. The
//! safety overrides in [`crate::SafetyArbiter`] run before this table is
//! ever consulted.

use crate::instruction::InstructionCode;
use intent_bridge::Intent;

pub struct Rule {
    pub tag: &'static str,
    pub code: InstructionCode,
    pub validate: fn(&Intent) -> bool,
    pub describe: fn(&Intent) -> String,
}

pub const RULES: &[Rule] = &[
    Rule {
        tag: "speed-control",
        code: InstructionCode::SpeedCtrl,
        validate: valid_speed,
        describe: describe_speed,
    },
    Rule {
        tag: "steering",
        code: InstructionCode::SteeringCtrl,
        validate: valid_steering,
        describe: describe_steering,
    },
    Rule {
        tag: "gesture-control",
        code: InstructionCode::GestureCtrl,
        validate: always_valid,
        describe: describe_gesture,
    },
    Rule {
        tag: "voice-command",
        code: InstructionCode::VoiceCmd,
        validate: always_valid,
        describe: describe_voice,
    },
    Rule {
        tag: "user-posture",
        code: InstructionCode::UserPosture,
        validate: always_valid,
        describe: describe_posture,
    },
    Rule {
        tag: "protocol-command",
        code: InstructionCode::ProtocolCmd,
        validate: always_valid,
        describe: describe_protocol,
    },
];

/// Rule matching the intent's wire tag, if the table has one.
pub fn lookup_rule(intent: &Intent) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.tag == intent.kind())
}

fn valid_speed(intent: &Intent) -> bool {
    match intent {
        Intent::SpeedControl { target_speed, .. } => (0.0..=120.0).contains(target_speed),
        _ => false,
    }
}

fn valid_steering(intent: &Intent) -> bool {
    match intent {
        Intent::Steering { angle, .. } => (-45.0..=45.0).contains(angle),
        _ => false,
    }
}

// Label membership is enforced by the typed intent model at decode time.
fn always_valid(_intent: &Intent) -> bool {
    true
}

fn describe_speed(intent: &Intent) -> String {
    match intent {
        Intent::SpeedControl { target_speed, .. } => {
            format!("target speed set to {target_speed} km/h")
        }
        _ => String::new(),
    }
}

fn describe_steering(intent: &Intent) -> String {
    match intent {
        Intent::Steering { angle, .. } => format!("steering adjusted to {angle} degrees"),
        _ => String::new(),
    }
}

fn describe_gesture(intent: &Intent) -> String {
    match intent {
        Intent::GestureControl { gesture, .. } => format!("gesture command: {gesture}"),
        _ => String::new(),
    }
}

fn describe_voice(intent: &Intent) -> String {
    match intent {
        Intent::VoiceCommand { command } => format!("voice command: {command}"),
        _ => String::new(),
    }
}

fn describe_posture(intent: &Intent) -> String {
    match intent {
        Intent::UserPosture { posture, .. } => format!("occupant posture: {posture}"),
        _ => String::new(),
    }
}

fn describe_protocol(intent: &Intent) -> String {
    match intent {
        Intent::ProtocolCommand { protocol_id, .. } => {
            format!("protocol {protocol_id} invoked")
        }
        _ => String::new(),
    }
}
