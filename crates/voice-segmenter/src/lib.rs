//! Voice Utterance Segmenter
//!
//! Gates a raw PCM chunk stream into silence-delimited utterances: the gate
//! idles until a voiced chunk arrives, accumulates until sustained silence
//! (or a hard duration cap), then emits the utterance buffer for
//! transcription. The speech-to-text engine itself is an external
//! collaborator behind the [`Transcriber`] trait.

mod gate;

pub use gate::UtteranceGate;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Voice channel error types
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Failed to open audio stream: {0}")]
    Stream(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),
}

/// Speech-to-text engine: one finalized transcript per utterance.
pub trait Transcriber: Send {
    fn transcribe(&self, samples: &[i16], sample_rate: u32) -> Result<String, VoiceError>;
}

/// Blocking PCM chunk source. `Ok(None)` means the stream ended.
pub trait AudioSource: Send {
    fn next_chunk(&mut self) -> Result<Option<Vec<i16>>, VoiceError>;
}

/// Voice gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Audio sample rate (Hz)
    pub sample_rate: u32,
    /// Samples per chunk
    pub chunk_size: usize,
    /// RMS volume below which a chunk counts as silent
    pub silence_threshold: f64,
    /// Consecutive silence that terminates an utterance (seconds)
    pub silence_duration_secs: f64,
    /// Hard cap on a single utterance (seconds)
    pub max_record_secs: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            chunk_size: 1024,
            silence_threshold: 150.0,
            silence_duration_secs: 1.5,
            max_record_secs: 30.0,
        }
    }
}

impl VoiceConfig {
    /// Consecutive silent chunks that end an utterance.
    pub fn silence_chunk_limit(&self) -> usize {
        (self.silence_duration_secs * self.sample_rate as f64 / self.chunk_size as f64) as usize
    }

    /// Maximum chunks in a single utterance.
    pub fn max_chunks(&self) -> usize {
        (self.max_record_secs * self.sample_rate as f64 / self.chunk_size as f64) as usize
    }
}

/// RMS-style volume check: `norm / sqrt(len) < threshold`.
pub fn is_silent(chunk: &[i16], threshold: f64) -> bool {
    if chunk.is_empty() {
        return true;
    }
    let sum_sq: f64 = chunk.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / chunk.len() as f64).sqrt() < threshold
}
