//! Occupant events entering the classification path

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which sensing channel produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Face,
    Gesture,
    Voice,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Face => write!(f, "face"),
            EventSource::Gesture => write!(f, "gesture"),
            EventSource::Voice => write!(f, "voice"),
        }
    }
}

/// One occupant event, as emitted by a tracker or the voice channel.
///
/// `label` is the channel's own vocabulary: a gesture name, a posture state,
/// or a raw voice transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverEvent {
    pub id: Uuid,
    pub source: EventSource,
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

impl DriverEvent {
    pub fn new(source: EventSource, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            label: label.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(EventSource::Face.to_string(), "face");
        assert_eq!(EventSource::Gesture.to_string(), "gesture");
        assert_eq!(EventSource::Voice.to_string(), "voice");
    }

    #[test]
    fn test_events_get_distinct_ids() {
        let a = DriverEvent::new(EventSource::Gesture, "wave");
        let b = DriverEvent::new(EventSource::Gesture, "wave");
        assert_ne!(a.id, b.id);
    }
}
