//! Mock interview state machine.

use thiserror::Error;
use tracing::info;

use super::feedback::FeedbackReport;
use crate::config::{interview_opening, interviewer_prompt};
use crate::model::{ConversationTurn, GeminiClient, ModelError, RequestPayload};

/// Built-in interview topics. Any other non-empty role is accepted too.
pub const INTERVIEW_TOPICS: [&str; 6] = [
    "Software Engineer",
    "Product Manager",
    "Data Scientist",
    "UX/UI Designer",
    "Marketing Manager",
    "General",
];

/// Upper bound on the number of questions.
pub const MAX_QUESTIONS: u32 = 7;

pub const INTERVIEW_TEMPERATURE: f32 = 0.7;
pub const INTERVIEW_MAX_OUTPUT_TOKENS: u32 = 2000;

pub const INVALID_COUNT_MESSAGE: &str = "Please enter a valid number (1-7).";
pub const COMPLETE_MESSAGE: &str = "Interview complete! View your report below.";

/// Coach errors.
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Interview topic must not be empty")]
    EmptyTopic,
    #[error("Cannot {action} while {state:?}")]
    InvalidState {
        action: &'static str,
        state: InterviewState,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Could not read the feedback report: {0}")]
    InvalidFeedback(#[from] serde_json::Error),
}

/// Interview progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterviewState {
    #[default]
    AwaitingTopic,
    AwaitingQuestionCount,
    InProgress,
    Finished,
}

/// Runs a fixed-length mock interview against the model and collects a
/// scored report after the last answer.
#[derive(Debug, Clone, Default)]
pub struct InterviewCoach {
    state: InterviewState,
    topic: String,
    question_count: u32,
    current_question: u32,
    history: Vec<ConversationTurn>,
    feedback: Option<FeedbackReport>,
}

impl InterviewCoach {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InterviewState {
        self.state
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    /// One-based number of the question currently being answered.
    pub fn current_question(&self) -> u32 {
        self.current_question
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn feedback(&self) -> Option<&FeedbackReport> {
        self.feedback.as_ref()
    }

    /// Pick a role and ask for the number of questions.
    pub fn start(&mut self, topic: &str) -> Result<String, CoachError> {
        if self.state != InterviewState::AwaitingTopic {
            return Err(CoachError::InvalidState {
                action: "choose a topic",
                state: self.state,
            });
        }

        let topic = topic.trim();
        if topic.is_empty() {
            return Err(CoachError::EmptyTopic);
        }

        self.topic = topic.to_string();
        self.state = InterviewState::AwaitingQuestionCount;
        info!(topic = %self.topic, "interview topic selected");

        Ok(format!(
            "You've selected '{}'. How many questions would you like (1-{})?",
            self.topic, MAX_QUESTIONS
        ))
    }

    /// Feed the next user input: the question count, then each answer.
    ///
    /// Returns the coach's reply (empty for blank input, which is ignored).
    /// A failed model call leaves the interview where it was so the same
    /// input can be resubmitted.
    pub async fn submit(
        &mut self,
        client: &GeminiClient,
        credential: &str,
        input: &str,
    ) -> Result<String, CoachError> {
        let input = input.trim();

        match self.state {
            InterviewState::AwaitingQuestionCount => {
                if input.is_empty() {
                    return Ok(String::new());
                }
                let count = match parse_leading_count(input) {
                    Some(n) if (1..=MAX_QUESTIONS).contains(&n) => n,
                    _ => return Ok(INVALID_COUNT_MESSAGE.to_string()),
                };
                if credential.trim().is_empty() {
                    return Err(ModelError::CredentialMissing.into());
                }

                let opening = interview_opening(&self.topic, count);
                let reply = self.ask(client, credential, count, 1, &[], &opening).await?;

                self.question_count = count;
                self.current_question = 1;
                self.state = InterviewState::InProgress;
                self.history.push(ConversationTurn::user(opening));
                self.history.push(ConversationTurn::assistant(reply.as_str()));
                info!(questions = count, "interview started");

                Ok(reply)
            }
            InterviewState::InProgress => {
                if input.is_empty() {
                    return Ok(String::new());
                }

                let next = self.current_question + 1;
                let history = self.history.clone();
                let reply = self
                    .ask(client, credential, self.question_count, next, &history, input)
                    .await?;

                if next > self.question_count {
                    let report = FeedbackReport::parse(&reply)?;
                    self.feedback = Some(report);
                    self.state = InterviewState::Finished;
                    info!(topic = %self.topic, "interview finished");
                }

                self.current_question = next;
                self.history.push(ConversationTurn::user(input));
                self.history.push(ConversationTurn::assistant(reply.as_str()));

                if self.state == InterviewState::Finished {
                    Ok(COMPLETE_MESSAGE.to_string())
                } else {
                    Ok(reply)
                }
            }
            state => Err(CoachError::InvalidState {
                action: "submit an answer",
                state,
            }),
        }
    }

    /// Start over from topic selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    async fn ask(
        &self,
        client: &GeminiClient,
        credential: &str,
        total: u32,
        next_question: u32,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<String, ModelError> {
        let wants_report = next_question > total;
        let payload = RequestPayload {
            system_instruction: interviewer_prompt(&self.topic, total),
            turns: history.to_vec(),
            current_message: message.to_string(),
            temperature: INTERVIEW_TEMPERATURE,
            max_output_tokens: INTERVIEW_MAX_OUTPUT_TOKENS,
            response_mime_type: Some(
                if wants_report { "application/json" } else { "text/plain" }.to_string(),
            ),
        };

        client.generate(&payload, credential).await
    }
}

/// Leading decimal digits of `input`, so "3 questions" reads as 3.
fn parse_leading_count(input: &str) -> Option<u32> {
    let digits: String = input.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{text_body, ScriptedTransport};
    use crate::model::ModelConfig;
    use std::sync::Arc;

    const REPORT: &str = r#"{"clarity": 4, "technical_knowledge": 3, "problem_solving": 4, "communication": 5, "overall_summary": "Good", "areas_of_excellence": "Clear", "suggestions_for_improvement": "Depth"}"#;

    fn client(transport: &Arc<ScriptedTransport>) -> GeminiClient {
        GeminiClient::with_transport(ModelConfig::default(), transport.clone())
    }

    #[test]
    fn test_start_moves_to_question_count() {
        let mut coach = InterviewCoach::new();
        let reply = coach.start("  Data Scientist ").unwrap();

        assert_eq!(
            reply,
            "You've selected 'Data Scientist'. How many questions would you like (1-7)?"
        );
        assert_eq!(coach.state(), InterviewState::AwaitingQuestionCount);
        assert_eq!(coach.topic(), "Data Scientist");

        assert!(matches!(coach.start("Other"), Err(CoachError::InvalidState { .. })));
    }

    #[test]
    fn test_empty_topic_rejected() {
        let mut coach = InterviewCoach::new();
        assert!(matches!(coach.start("   "), Err(CoachError::EmptyTopic)));
        assert_eq!(coach.state(), InterviewState::AwaitingTopic);
    }

    #[tokio::test]
    async fn test_invalid_question_count() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut coach = InterviewCoach::new();
        coach.start("General").unwrap();

        for input in ["zero", "0", "8", "-1", "12 questions"] {
            let reply = coach.submit(&client(&transport), "key", input).await.unwrap();
            assert_eq!(reply, INVALID_COUNT_MESSAGE);
        }

        let reply = coach.submit(&client(&transport), "key", "   ").await.unwrap();
        assert!(reply.is_empty());

        assert_eq!(coach.state(), InterviewState::AwaitingQuestionCount);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_question_count_with_trailing_text() {
        let transport = Arc::new(ScriptedTransport::new().respond_text("Question 1?"));
        let mut coach = InterviewCoach::new();
        coach.start("Data Scientist").unwrap();

        let reply = coach.submit(&client(&transport), "key", "3 questions").await.unwrap();
        assert_eq!(reply, "Question 1?");
        assert_eq!(coach.question_count(), 3);
        assert_eq!(coach.state(), InterviewState::InProgress);
    }

    #[test]
    fn test_parse_leading_count() {
        assert_eq!(parse_leading_count("5"), Some(5));
        assert_eq!(parse_leading_count("4 please"), Some(4));
        assert_eq!(parse_leading_count("-2"), None);
        assert_eq!(parse_leading_count("five"), None);
    }

    #[tokio::test]
    async fn test_full_interview() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_text("Question 1: Tell me about yourself.")
                .respond_text("Question 2: Describe a hard bug.")
                .respond(200, text_body(REPORT)),
        );
        let client = client(&transport);
        let mut coach = InterviewCoach::new();
        coach.start("Software Engineer").unwrap();

        let reply = coach.submit(&client, "key", "2").await.unwrap();
        assert_eq!(reply, "Question 1: Tell me about yourself.");
        assert_eq!(coach.state(), InterviewState::InProgress);
        assert_eq!(coach.current_question(), 1);

        let first = transport.last_body();
        assert_eq!(first["contents"].as_array().unwrap().len(), 1);
        assert_eq!(
            first["contents"][0]["parts"][0]["text"],
            "Let's start the mock interview for the Software Engineer role. Ask me 2 questions."
        );
        assert_eq!(first["generationConfig"]["responseMimeType"], "text/plain");
        assert_eq!(first["generationConfig"]["maxOutputTokens"], 2000);
        assert!(first["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Ask exactly 2 questions."));

        let reply = coach.submit(&client, "key", "I write Rust.").await.unwrap();
        assert_eq!(reply, "Question 2: Describe a hard bug.");
        assert_eq!(coach.current_question(), 2);

        let reply = coach.submit(&client, "key", "A race condition.").await.unwrap();
        assert_eq!(reply, COMPLETE_MESSAGE);
        assert_eq!(coach.state(), InterviewState::Finished);
        assert_eq!(coach.feedback().unwrap().communication, 5);

        let last = transport.last_body();
        assert_eq!(last["generationConfig"]["responseMimeType"], "application/json");
        let contents = last["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 5);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[4]["parts"][0]["text"], "A race condition.");

        assert_eq!(coach.history().len(), 6);
        assert!(matches!(
            coach.submit(&client, "key", "more").await,
            Err(CoachError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_call_keeps_progress() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_text("Question 1?")
                .respond(403, r#"{"error":{"message":"Quota exceeded"}}"#)
                .respond_text("Question 2?"),
        );
        let client = client(&transport);
        let mut coach = InterviewCoach::new();
        coach.start("Product Manager").unwrap();
        coach.submit(&client, "key", "3").await.unwrap();

        let err = coach.submit(&client, "key", "My answer").await.unwrap_err();
        assert!(matches!(err, CoachError::Model(ModelError::ApiError { status: 403, .. })));
        assert_eq!(coach.current_question(), 1);
        assert_eq!(coach.history().len(), 2);

        let reply = coach.submit(&client, "key", "My answer").await.unwrap();
        assert_eq!(reply, "Question 2?");
        assert_eq!(coach.current_question(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_report_is_an_error() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_text("Only question?")
                .respond(200, r#"{"candidates": []}"#),
        );
        let client = client(&transport);
        let mut coach = InterviewCoach::new();
        coach.start("General").unwrap();
        coach.submit(&client, "key", "1").await.unwrap();

        let err = coach.submit(&client, "key", "Answer").await.unwrap_err();
        assert!(matches!(err, CoachError::InvalidFeedback(_)));
        assert_eq!(coach.state(), InterviewState::InProgress);
        assert!(coach.feedback().is_none());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut coach = InterviewCoach::new();
        coach.start("General").unwrap();

        let err = coach.submit(&client(&transport), "", "3").await.unwrap_err();
        assert!(matches!(err, CoachError::Model(ModelError::CredentialMissing)));
        assert_eq!(coach.state(), InterviewState::AwaitingQuestionCount);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_before_topic() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut coach = InterviewCoach::new();
        let err = coach.submit(&client(&transport), "key", "hi").await.unwrap_err();
        assert!(matches!(
            err,
            CoachError::InvalidState {
                state: InterviewState::AwaitingTopic,
                ..
            }
        ));

        coach.start("General").unwrap();
        coach.reset();
        assert_eq!(coach.state(), InterviewState::AwaitingTopic);
        assert!(coach.topic().is_empty());
    }
}
