//! Chat-completions classification client

use crate::event::EventSource;
use crate::IntentError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

/// One normalized event ready for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyRequest {
    pub source: EventSource,
    pub system_prompt: String,
    pub text: String,
}

/// Classification backend. Returns the raw reply text; decoding into an
/// [`crate::Intent`] is the caller's concern so a failed call and a garbage
/// reply degrade through the same path.
pub trait IntentClassifier: Send + Sync {
    fn classify(
        &self,
        request: ClassifyRequest,
    ) -> impl Future<Output = Result<String, IntentError>> + Send;
}

/// Classifier endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Base URL of an OpenAI-compatible endpoint
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: String,
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionsClient {
    config: ClassifierConfig,
    http: reqwest::Client,
}

impl ChatCompletionsClient {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

impl IntentClassifier for ChatCompletionsClient {
    async fn classify(&self, request: ClassifyRequest) -> Result<String, IntentError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.text,
                },
            ],
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| IntentError::MalformedResponse("empty choices".into()))?;

        debug!(source = %request.source, reply_len = content.len(), "classifier reply");
        Ok(content)
    }
}
