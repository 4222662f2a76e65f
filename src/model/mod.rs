//! Model client module for Gemini inference.

mod client;
mod retry;
mod transport;
pub mod types;

pub use client::{
    ConversationTurn, GeminiClient, ModelConfig, ModelError, RequestPayload, Speaker,
    DEFAULT_BASE_URL, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    FALLBACK_RESPONSE,
};
pub use retry::{
    is_rate_limit_or_server_error, RetryPolicy, DEFAULT_BACKOFF_MULTIPLIER,
    DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_ATTEMPTS,
};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};

#[cfg(test)]
pub(crate) use transport::testing;
