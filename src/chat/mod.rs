//! Persona chat sessions.

mod session;

pub use session::{ChatMessage, ChatSession, Sender, HISTORY_LIMIT, MISSING_KEY_MESSAGE};
