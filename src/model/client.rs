//! Model client for the Gemini `generateContent` API.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;

use super::retry::RetryPolicy;
use super::transport::{HttpTransport, RawResponse, Transport};
use super::types::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    SystemInstruction,
};
use crate::config::build_system_instruction;

/// Returned when a successful response carries no text.
pub const FALLBACK_RESPONSE: &str = "I'm sorry, I couldn't generate a response.";

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Default sampling temperature for chat.
pub const DEFAULT_TEMPERATURE: f32 = 0.75;

/// Default output token ceiling for chat.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;

/// Model client errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("API key is missing")]
    CredentialMissing,
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Rate limited or server error (HTTP {status})")]
    RateLimitOrServerError { status: u16 },
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Failed to connect to the AI service after {attempts} attempts. {last}")]
    RetriesExhausted { attempts: u32, last: Box<ModelError> },
}

impl ModelError {
    /// Whether the attempt loop may try again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ModelError::RateLimitOrServerError { .. } | ModelError::NetworkError(_)
        )
    }

    /// HTTP status carried by the error, looking through `RetriesExhausted`.
    pub fn status(&self) -> Option<u16> {
        match self {
            ModelError::ApiError { status, .. } => Some(*status),
            ModelError::RateLimitOrServerError { status } => Some(*status),
            ModelError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Role tag used on the wire.
    pub fn role(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "model",
        }
    }
}

/// One message of a conversation, oldest first in any history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    fn to_content(&self) -> Content {
        Content::new(self.speaker.role(), self.text.as_str())
    }
}

/// Everything needed for one `generateContent` call.
#[derive(Debug, Clone)]
pub struct RequestPayload {
    pub system_instruction: String,
    pub turns: Vec<ConversationTurn>,
    pub current_message: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Set when a structured (e.g. JSON) reply is expected.
    pub response_mime_type: Option<String>,
}

impl RequestPayload {
    /// Wire form: history turns followed by the current message as a `user` turn.
    pub fn to_request(&self) -> GenerateContentRequest {
        let mut contents: Vec<Content> =
            self.turns.iter().map(ConversationTurn::to_content).collect();
        contents.push(Content::new(Speaker::User.role(), self.current_message.as_str()));

        GenerateContentRequest {
            contents,
            system_instruction: SystemInstruction::new(self.system_instruction.as_str()),
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
                response_mime_type: self.response_mime_type.clone(),
            },
        }
    }
}

/// Configuration for the model client.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub retry: RetryPolicy,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            retry: RetryPolicy::default(),
        }
    }
}

impl ModelConfig {
    /// Create a new ModelConfig with custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a new ModelConfig with custom model name.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Set the retry policy used for every request.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Full `generateContent` URL, without the key.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model_name
        )
    }
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Holds no mutable state; clones share the transport and can be used from
/// concurrent tasks.
#[derive(Clone)]
pub struct GeminiClient {
    config: ModelConfig,
    transport: Arc<dyn Transport>,
}

impl GeminiClient {
    /// Create a new client over HTTP.
    pub fn new(config: ModelConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a new client with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ModelConfig::default())
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: ModelConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Send a chat message.
    ///
    /// # Arguments
    /// * `message` - The new user message.
    /// * `history` - Prior turns, oldest first. Forwarded as given; callers truncate.
    /// * `persona_instruction` - Persona text; output-formatting rules are appended.
    /// * `credential` - API key.
    ///
    /// # Returns
    /// The model's reply, or the fallback text when the reply is empty.
    pub async fn send(
        &self,
        message: &str,
        history: &[ConversationTurn],
        persona_instruction: &str,
        credential: &str,
    ) -> Result<String, ModelError> {
        let payload = RequestPayload {
            system_instruction: build_system_instruction(persona_instruction),
            turns: history.to_vec(),
            current_message: message.to_string(),
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
            response_mime_type: None,
        };

        self.generate(&payload, credential).await
    }

    /// Run a prepared payload through the retry loop.
    pub async fn generate(
        &self,
        payload: &RequestPayload,
        credential: &str,
    ) -> Result<String, ModelError> {
        if credential.trim().is_empty() {
            return Err(ModelError::CredentialMissing);
        }

        let url = self.config.endpoint();
        let body = serde_json::to_value(payload.to_request())
            .map_err(|e| ModelError::NetworkError(format!("Failed to encode request: {}", e)))?;

        let policy = &self.config.retry;
        let max_attempts = policy.attempts();
        let mut last_error = None;

        for attempt in 0..max_attempts {
            match self.attempt(&url, credential, &body).await {
                Ok(text) => return Ok(text),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    if attempt + 1 < max_attempts {
                        let wait = policy.delay_for(attempt);
                        debug!(
                            attempt = attempt + 1,
                            max_attempts,
                            wait_ms = wait.as_millis() as u64,
                            error = %e,
                            "model request failed, backing off"
                        );
                        sleep(wait).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(ModelError::RetriesExhausted {
            attempts: max_attempts,
            last: Box::new(
                last_error.unwrap_or_else(|| ModelError::NetworkError("Unknown error".to_string())),
            ),
        })
    }

    /// One HTTP exchange, classified.
    async fn attempt(
        &self,
        url: &str,
        credential: &str,
        body: &Value,
    ) -> Result<String, ModelError> {
        let response = self
            .transport
            .post_json(url, credential, body)
            .await
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        self.classify(response)
    }

    fn classify(&self, response: RawResponse) -> Result<String, ModelError> {
        if response.is_success() {
            let parsed: GenerateContentResponse = serde_json::from_str(&response.body)
                .map_err(|e| ModelError::NetworkError(format!("Invalid response body: {}", e)))?;

            return Ok(parsed
                .first_text()
                .map(str::to_string)
                .unwrap_or_else(|| FALLBACK_RESPONSE.to_string()));
        }

        let status = response.status;
        if self.config.retry.should_retry_status(status) {
            return Err(ModelError::RateLimitOrServerError { status });
        }

        Err(ModelError::ApiError {
            status,
            message: Self::error_message(&response),
        })
    }

    /// Server-provided message, or the canonical reason phrase.
    fn error_message(response: &RawResponse) -> String {
        serde_json::from_str::<ApiErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.error.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| {
                let reason = reqwest::StatusCode::from_u16(response.status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .unwrap_or("Unknown status");
                format!("API Error: {}", reason)
            })
    }
}
