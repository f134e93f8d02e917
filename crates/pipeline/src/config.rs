//! Pipeline configuration
//!
//! Loaded from an optional `cabin.toml` next to the binary, overridable via
//! `CABIN_`-prefixed environment variables (e.g. `CABIN_CLASSIFIER__API_KEY`).

use crate::PipelineError;
use face_tracker::FaceTrackerConfig;
use gesture_tracker::GestureConfig;
use intent_bridge::ClassifierConfig;
use safety_arbiter::Role;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use voice_segmenter::VoiceConfig;

/// Monitored occupant identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupantConfig {
    pub name: String,
    pub role: Role,
}

impl Default for OccupantConfig {
    fn default() -> Self {
        Self {
            name: "driver".to_string(),
            role: Role::Driver,
        }
    }
}

/// Classifier endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSection {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Per-request deadline; a timed-out call degrades to the default intent
    pub timeout_secs: u64,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Queue and channel capacities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSection {
    /// Pending driver events awaiting classification
    pub event_capacity: usize,
    /// Output queue depth before drop-oldest kicks in
    pub output_capacity: usize,
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            output_capacity: 256,
        }
    }
}

/// Tracker loop cadences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CadenceSection {
    pub face_interval_ms: u64,
    pub gesture_interval_ms: u64,
}

impl Default for CadenceSection {
    fn default() -> Self {
        Self {
            face_interval_ms: 66,
            gesture_interval_ms: 66,
        }
    }
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub occupant: OccupantConfig,
    pub classifier: ClassifierSection,
    pub channels: ChannelSection,
    pub cadence: CadenceSection,
    pub face: FaceTrackerConfig,
    pub gesture: GestureConfig,
    pub voice: VoiceConfig,
}

impl PipelineConfig {
    /// Load from `cabin.toml` (optional) and `CABIN_*` environment overrides.
    pub fn load() -> Result<Self, PipelineError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name("cabin").required(false))
            .add_source(::config::Environment::with_prefix("CABIN").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier.timeout_secs)
    }

    pub fn face_interval(&self) -> Duration {
        Duration::from_millis(self.cadence.face_interval_ms)
    }

    pub fn gesture_interval(&self) -> Duration {
        Duration::from_millis(self.cadence.gesture_interval_ms)
    }

    /// Endpoint settings in the shape the HTTP client takes.
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            base_url: self.classifier.base_url.clone(),
            api_key: self.classifier.api_key.clone(),
            model: self.classifier.model.clone(),
        }
    }
}
