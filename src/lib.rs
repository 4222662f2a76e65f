// Copyright 2025 ModerRAS
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Persona Chat
//!
//! Persona-based chat and mock interview coaching on top of the Gemini
//! `generateContent` API.
//!
//! The [`GeminiClient`] sends one request per call and retries rate limits,
//! server errors and network failures with bounded exponential backoff
//! (see [`RetryPolicy`]). Every failure comes back as a [`ModelError`].
//!
//! ## Chat Example
//!
//! ```rust,no_run
//! use persona_chat::{ConversationTurn, GeminiClient, ModelConfig, Persona};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GeminiClient::new(ModelConfig::default());
//!     let history = vec![
//!         ConversationTurn::user("I want to learn Rust."),
//!         ConversationTurn::assistant("Great choice! Start with the book."),
//!     ];
//!
//!     let reply = client
//!         .send("What next?", &history, Persona::Education.instruction(), "my-api-key")
//!         .await?;
//!
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```
//!
//! ## Interview Example
//!
//! ```rust,no_run
//! use persona_chat::{GeminiClient, InterviewCoach, InterviewState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GeminiClient::with_defaults();
//!     let mut coach = InterviewCoach::new();
//!
//!     println!("{}", coach.start("Software Engineer")?);
//!     println!("{}", coach.submit(&client, "my-api-key", "3").await?);
//!
//!     if coach.state() == InterviewState::Finished {
//!         if let Some(report) = coach.feedback() {
//!             println!("{}", report.render(coach.topic()));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod interview;
pub mod model;
pub mod settings;

pub use chat::{ChatMessage, ChatSession, Sender, HISTORY_LIMIT};
pub use config::{search_assistants, AssistantEntry, Persona};
pub use interview::{CoachError, FeedbackReport, InterviewCoach, InterviewState};
pub use model::{
    ConversationTurn, GeminiClient, ModelConfig, ModelError, RequestPayload, RetryPolicy, Speaker,
};
pub use settings::AppSettings;
