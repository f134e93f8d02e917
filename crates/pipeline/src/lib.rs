//! Cabin Pipeline
//!
//! Wires the sensing loops to the classification worker and the output
//! queue. Sensor loops run on dedicated threads (their device traits are
//! blocking); classification runs as a tokio task so the HTTP call and its
//! timeout compose naturally. All loops observe a shared stop flag.

mod config;
pub mod workers;

pub use config::{
    CadenceSection, ChannelSection, ClassifierSection, OccupantConfig, PipelineConfig,
};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Capture error: {0}")]
    Capture(#[from] cabin_capture::CaptureError),

    #[error("Voice error: {0}")]
    Voice(#[from] voice_segmenter::VoiceError),
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
