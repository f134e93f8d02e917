//! Arbitration precedence

use crate::instruction::{Instruction, InstructionCode, Params, Priority, Role};
use crate::rules::lookup_rule;
use intent_bridge::{GestureLabel, Intent, PostureLabel};
use tracing::debug;

/// Maps intents to instructions under a fixed precedence: emergency brake,
/// then gesture overrides, then posture overrides, then the generic rule
/// table. Every call returns exactly one instruction.
pub struct SafetyArbiter {
    role: Role,
}

impl SafetyArbiter {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn arbitrate(&self, intent: &Intent) -> Instruction {
        let instruction = self.resolve(intent);
        debug!(code = %instruction.code, priority = ?instruction.priority, "arbitrated");
        instruction
    }

    fn resolve(&self, intent: &Intent) -> Instruction {
        match intent {
            // Decoded force level is ignored: an emergency brake is always
            // full force.
            Intent::EmergencyBrake { .. } => Instruction::brake(
                3,
                "emergency brake engaged at full force",
                Priority::Critical,
            ),
            Intent::GestureControl { gesture, .. } => self.gesture_override(*gesture, intent),
            Intent::UserPosture { posture, .. } => self.posture_override(*posture, intent),
            _ => self.generic(intent),
        }
    }

    fn gesture_override(&self, gesture: GestureLabel, intent: &Intent) -> Instruction {
        let log = match gesture {
            GestureLabel::Fist => "fist detected, media paused, easing off",
            GestureLabel::ThumbsUp => "thumbs-up acknowledged, easing off",
            GestureLabel::Wave => "wave detected, voice service engaged, easing off",
            // Pointing carries no safety override; it goes through the table.
            GestureLabel::IndexPoint => return self.generic(intent),
        };
        Instruction::brake(2, log, Priority::High)
    }

    fn posture_override(&self, posture: PostureLabel, intent: &Intent) -> Instruction {
        let log = match posture {
            PostureLabel::NodConfirm => "nod confirmed, applying gentle brake",
            PostureLabel::ShakeReject => "request rejected by head shake, applying gentle brake",
            PostureLabel::LookingDown => "occupant looking down, applying gentle brake",
            PostureLabel::TalkingRight | PostureLabel::TalkingLeft => {
                "occupant talking sideways, applying gentle brake"
            }
            PostureLabel::AttentionDeviation => {
                if self.role == Role::Passenger {
                    return Instruction::new(
                        InstructionCode::PassengerLog,
                        Params::None,
                        "passenger attention deviation, logged only",
                        Priority::Normal,
                    );
                }
                return Instruction::new(
                    InstructionCode::AttentionWarning,
                    Params::Warning {
                        warning_level: "critical".into(),
                    },
                    "driver attention deviation, warning issued",
                    Priority::Critical,
                );
            }
            PostureLabel::FacingForward => return self.generic(intent),
        };
        Instruction::brake(2, log, Priority::High)
    }

    fn generic(&self, intent: &Intent) -> Instruction {
        let Some(rule) = lookup_rule(intent) else {
            return Instruction::maintain(format!(
                "no rule for intent {}, maintaining current state",
                intent.kind()
            ));
        };
        if !(rule.validate)(intent) {
            return Instruction::maintain(format!(
                "parameters rejected for intent {}, maintaining current state",
                intent.kind()
            ));
        }
        Instruction::new(
            rule.code,
            Params::Echo {
                intent: intent.clone(),
            },
            (rule.describe)(intent),
            Priority::Normal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> SafetyArbiter {
        SafetyArbiter::new(Role::Driver)
    }

    #[test]
    fn test_emergency_brake_unconditional() {
        let arbiter = driver();
        // Decoded force level never alters the output.
        for level in [0u8, 1, 3, 200] {
            let instruction = arbiter.arbitrate(&Intent::EmergencyBrake { force_level: level });
            assert_eq!(instruction.code, InstructionCode::EmgBrake);
            assert_eq!(instruction.params, Params::Brake { force_level: 3 });
            assert_eq!(instruction.priority, Priority::Critical);
        }
    }

    #[test]
    fn test_emergency_brake_idempotent() {
        let arbiter = driver();
        let intent = Intent::EmergencyBrake { force_level: 3 };
        assert_eq!(arbiter.arbitrate(&intent), arbiter.arbitrate(&intent));
    }

    #[test]
    fn test_gesture_overrides_brake_gently() {
        let arbiter = driver();
        for gesture in [GestureLabel::Fist, GestureLabel::ThumbsUp, GestureLabel::Wave] {
            let instruction = arbiter.arbitrate(&Intent::GestureControl {
                gesture,
                action: None,
            });
            assert_eq!(instruction.code, InstructionCode::EmgBrake);
            assert_eq!(instruction.params, Params::Brake { force_level: 2 });
        }
    }

    #[test]
    fn test_index_point_uses_rule_table() {
        let arbiter = driver();
        let instruction = arbiter.arbitrate(&Intent::GestureControl {
            gesture: GestureLabel::IndexPoint,
            action: None,
        });
        assert_eq!(instruction.code, InstructionCode::GestureCtrl);
    }

    #[test]
    fn test_driver_attention_deviation_warns() {
        let instruction = driver().arbitrate(&Intent::UserPosture {
            posture: PostureLabel::AttentionDeviation,
            duration: None,
        });
        assert_eq!(instruction.code, InstructionCode::AttentionWarning);
        assert_eq!(instruction.priority, Priority::Critical);
    }

    #[test]
    fn test_passenger_attention_deviation_downgraded() {
        let arbiter = SafetyArbiter::new(Role::Passenger);
        let instruction = arbiter.arbitrate(&Intent::UserPosture {
            posture: PostureLabel::AttentionDeviation,
            duration: None,
        });
        assert_eq!(instruction.code, InstructionCode::PassengerLog);
        assert_eq!(instruction.params, Params::None);
        assert_eq!(instruction.priority, Priority::Normal);
    }

    #[test]
    fn test_posture_brake_mapping() {
        let arbiter = driver();
        for posture in [
            PostureLabel::NodConfirm,
            PostureLabel::ShakeReject,
            PostureLabel::LookingDown,
            PostureLabel::TalkingLeft,
            PostureLabel::TalkingRight,
        ] {
            let instruction = arbiter.arbitrate(&Intent::UserPosture {
                posture,
                duration: None,
            });
            assert_eq!(instruction.params, Params::Brake { force_level: 2 });
        }
    }

    #[test]
    fn test_valid_speed_echoes_intent() {
        let arbiter = driver();
        let intent = Intent::SpeedControl {
            target_speed: 80.0,
            acceleration: None,
        };
        let instruction = arbiter.arbitrate(&intent);
        assert_eq!(instruction.code, InstructionCode::SpeedCtrl);
        assert_eq!(instruction.params, Params::Echo { intent });
    }

    #[test]
    fn test_out_of_range_speed_maintains_state() {
        let arbiter = driver();
        let instruction = arbiter.arbitrate(&Intent::SpeedControl {
            target_speed: 300.0,
            acceleration: None,
        });
        assert_eq!(instruction.code, InstructionCode::MaintainCurrentState);
        assert!(!instruction.log_message.is_empty());
    }

    #[test]
    fn test_every_path_logs() {
        let arbiter = driver();
        let intents = [
            Intent::EmergencyBrake { force_level: 1 },
            Intent::VoiceCommand {
                command: "hello".into(),
            },
            Intent::Steering {
                angle: 90.0,
                direction: None,
            },
            Intent::UserPosture {
                posture: PostureLabel::FacingForward,
                duration: None,
            },
        ];
        for intent in &intents {
            assert!(!arbiter.arbitrate(intent).log_message.is_empty());
        }
    }
}
