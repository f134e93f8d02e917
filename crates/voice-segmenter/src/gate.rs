//! Utterance gate state machine

use crate::{is_silent, VoiceConfig};
use tracing::debug;

enum GateState {
    Idle,
    Recording,
}

/// Push-based utterance gate.
///
/// Feed PCM chunks in capture order; an utterance buffer comes back on the
/// chunk that completes it. The gate holds no device handles and is
/// independent of the audio source's threading.
pub struct UtteranceGate {
    config: VoiceConfig,
    state: GateState,
    buffer: Vec<i16>,
    chunks: usize,
    silent_chunks: usize,
}

impl UtteranceGate {
    pub fn new(config: VoiceConfig) -> Self {
        Self {
            config,
            state: GateState::Idle,
            buffer: Vec::new(),
            chunks: 0,
            silent_chunks: 0,
        }
    }

    /// Feed one chunk. Returns a completed utterance, if this chunk ended one.
    pub fn push(&mut self, chunk: &[i16]) -> Option<Vec<i16>> {
        let silent = is_silent(chunk, self.config.silence_threshold);

        match self.state {
            GateState::Idle => {
                if silent {
                    return None;
                }
                debug!("speech onset, recording");
                self.state = GateState::Recording;
                self.buffer.clear();
                self.buffer.extend_from_slice(chunk);
                self.chunks = 1;
                self.silent_chunks = 0;
                None
            }
            GateState::Recording => {
                self.buffer.extend_from_slice(chunk);
                self.chunks += 1;
                if silent {
                    self.silent_chunks += 1;
                } else {
                    self.silent_chunks = 0;
                }

                if self.silent_chunks >= self.config.silence_chunk_limit()
                    || self.chunks >= self.config.max_chunks()
                {
                    debug!(chunks = self.chunks, "utterance complete");
                    self.state = GateState::Idle;
                    self.chunks = 0;
                    self.silent_chunks = 0;
                    return Some(std::mem::take(&mut self.buffer));
                }
                None
            }
        }
    }

    /// Whether an utterance is currently being accumulated.
    pub fn is_recording(&self) -> bool {
        matches!(self.state, GateState::Recording)
    }
}
