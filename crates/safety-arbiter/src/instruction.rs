//! Instruction vocabulary emitted toward the output channel

use intent_bridge::Intent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which seat the monitored occupant holds. Passengers never trigger
/// attention warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Passenger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    High,
    Critical,
}

/// Instruction codes on the vehicle-facing wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstructionCode {
    EmgBrake,
    SpeedCtrl,
    SteeringCtrl,
    GestureCtrl,
    VoiceCmd,
    UserPosture,
    ProtocolCmd,
    AttentionWarning,
    PassengerLog,
    MaintainCurrentState,
}

impl fmt::Display for InstructionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstructionCode::EmgBrake => "EMG_BRAKE",
            InstructionCode::SpeedCtrl => "SPEED_CTRL",
            InstructionCode::SteeringCtrl => "STEERING_CTRL",
            InstructionCode::GestureCtrl => "GESTURE_CTRL",
            InstructionCode::VoiceCmd => "VOICE_CMD",
            InstructionCode::UserPosture => "USER_POSTURE",
            InstructionCode::ProtocolCmd => "PROTOCOL_CMD",
            InstructionCode::AttentionWarning => "ATTENTION_WARNING",
            InstructionCode::PassengerLog => "PASSENGER_LOG",
            InstructionCode::MaintainCurrentState => "MAINTAIN_CURRENT_STATE",
        };
        write!(f, "{s}")
    }
}

/// Instruction parameters. `Echo` forwards the validated intent unchanged
/// so downstream consumers see the original parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Params {
    None,
    Brake { force_level: u8 },
    Warning { warning_level: String },
    Echo { intent: Intent },
}

/// Final arbitration output. Always carries a non-empty log message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub code: InstructionCode,
    pub params: Params,
    pub log_message: String,
    pub priority: Priority,
}

impl Instruction {
    pub fn new(
        code: InstructionCode,
        params: Params,
        log_message: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            code,
            params,
            log_message: log_message.into(),
            priority,
        }
    }

    /// Fixed-force brake instruction.
    pub fn brake(force_level: u8, log_message: impl Into<String>, priority: Priority) -> Self {
        Self::new(
            InstructionCode::EmgBrake,
            Params::Brake { force_level },
            log_message,
            priority,
        )
    }

    /// No-op instruction holding the current vehicle state.
    pub fn maintain(log_message: impl Into<String>) -> Self {
        Self::new(
            InstructionCode::MaintainCurrentState,
            Params::None,
            log_message,
            Priority::Normal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(InstructionCode::EmgBrake.to_string(), "EMG_BRAKE");
        assert_eq!(
            InstructionCode::MaintainCurrentState.to_string(),
            "MAINTAIN_CURRENT_STATE"
        );
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Normal);
    }

    #[test]
    fn test_brake_helper() {
        let instruction = Instruction::brake(3, "stop", Priority::Critical);
        assert_eq!(instruction.code, InstructionCode::EmgBrake);
        assert_eq!(instruction.params, Params::Brake { force_level: 3 });
    }
}
