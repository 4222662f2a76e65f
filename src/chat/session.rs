//! Persona chat session.

use chrono::{DateTime, Local};
use tracing::info;
use uuid::Uuid;

use crate::config::Persona;
use crate::model::{ConversationTurn, GeminiClient, ModelError};

/// Messages forwarded as history with each request.
pub const HISTORY_LIMIT: usize = 10;

/// Shown instead of sending when no API key is configured.
pub const MISSING_KEY_MESSAGE: &str =
    "API Key is missing. Please set GEMINI_API_KEY or save a key in the settings file to enable the assistants.";

/// Who wrote a displayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// A message as displayed in the chat log.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Local::now(),
        }
    }

    pub fn to_turn(&self) -> ConversationTurn {
        match self.sender {
            Sender::User => ConversationTurn::user(self.text.as_str()),
            Sender::Bot => ConversationTurn::assistant(self.text.as_str()),
        }
    }
}

/// A chat with one persona.
///
/// # Example
///
/// ```rust,no_run
/// use persona_chat::{ChatSession, GeminiClient, Persona};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = GeminiClient::with_defaults();
///     let mut session = ChatSession::new(Persona::Travel);
///
///     if let Some(reply) = session.send(&client, "my-api-key", "3-day Goa itinerary").await? {
///         println!("{}", reply.text);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ChatSession {
    persona: Persona,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Start a session seeded with the persona's welcome message.
    pub fn new(persona: Persona) -> Self {
        let mut session = Self {
            persona,
            messages: Vec::new(),
        };
        session.reset();
        session
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Clear the log back to the welcome message.
    pub fn reset(&mut self) {
        self.messages.clear();
        if let Some(welcome) = self.persona.welcome_message() {
            self.messages.push(ChatMessage::new(Sender::Bot, welcome));
        }
    }

    /// Switch persona and start over.
    pub fn switch_persona(&mut self, persona: Persona) {
        info!(from = %self.persona, to = %persona, "switching persona");
        self.persona = persona;
        self.reset();
    }

    /// The last `HISTORY_LIMIT` messages as conversation turns.
    pub fn history(&self) -> Vec<ConversationTurn> {
        let start = self.messages.len().saturating_sub(HISTORY_LIMIT);
        self.messages[start..].iter().map(ChatMessage::to_turn).collect()
    }

    /// Send user input and record the exchange.
    ///
    /// Blank input is ignored (`Ok(None)`). On failure an apology is appended
    /// to the log and the error is returned.
    pub async fn send(
        &mut self,
        client: &GeminiClient,
        credential: &str,
        input: &str,
    ) -> Result<Option<&ChatMessage>, ModelError> {
        if input.trim().is_empty() {
            return Ok(None);
        }

        if credential.trim().is_empty() {
            self.messages.push(ChatMessage::new(Sender::Bot, MISSING_KEY_MESSAGE));
            return Err(ModelError::CredentialMissing);
        }

        let history = self.history();
        self.messages.push(ChatMessage::new(Sender::User, input));

        match client
            .send(input, &history, self.persona.instruction(), credential)
            .await
        {
            Ok(reply) => {
                self.messages.push(ChatMessage::new(Sender::Bot, reply));
                Ok(self.messages.last())
            }
            Err(e) => {
                self.messages.push(ChatMessage::new(
                    Sender::Bot,
                    format!("Sorry, something went wrong: {}", e),
                ));
                Err(e)
            }
        }
    }
}
