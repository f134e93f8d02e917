//! Delivery records

use chrono::{DateTime, Utc};
use intent_bridge::EventSource;
use safety_arbiter::{Instruction, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One delivered instruction with its provenance and occupant metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub id: Uuid,
    pub occupant: String,
    pub role: Role,
    pub source: EventSource,
    pub instruction: Instruction,
    pub created_at: DateTime<Utc>,
}

impl OutputRecord {
    pub fn new(
        occupant: impl Into<String>,
        role: Role,
        source: EventSource,
        instruction: Instruction,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            occupant: occupant.into(),
            role,
            source,
            instruction,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safety_arbiter::Priority;

    #[test]
    fn test_record_serializes() {
        let record = OutputRecord::new(
            "alice",
            Role::Driver,
            EventSource::Gesture,
            Instruction::brake(2, "wave detected", Priority::High),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["occupant"], "alice");
        assert_eq!(json["role"], "driver");
        assert_eq!(json["source"], "gesture");
    }
}
