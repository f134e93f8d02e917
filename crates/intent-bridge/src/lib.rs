//! Intent Bridge
//!
//! Carries normalized occupant events to a chat-completions language model
//! and decodes the reply into a typed [`Intent`]. Decoding is deliberately
//! forgiving: fenced JSON, alias field names, and missing parameters all
//! degrade to usable values, and anything unrecognizable collapses to the
//! safe default intent rather than an error.

mod classifier;
mod decode;
mod event;
mod intent;
mod normalizer;

pub use classifier::{ChatCompletionsClient, ClassifierConfig, ClassifyRequest, IntentClassifier};
pub use decode::decode_response;
pub use event::{DriverEvent, EventSource};
pub use intent::{GestureLabel, Intent, PostureLabel, SteerDirection};
pub use normalizer::EventNormalizer;

use thiserror::Error;

/// Intent bridge error types
#[derive(Error, Debug)]
pub enum IntentError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}
