//! Interview coach: a scripted mock interview with a scored report.

mod coach;
mod feedback;

pub use coach::{
    CoachError, InterviewCoach, InterviewState, COMPLETE_MESSAGE, INTERVIEW_MAX_OUTPUT_TOKENS,
    INTERVIEW_TEMPERATURE, INTERVIEW_TOPICS, INVALID_COUNT_MESSAGE, MAX_QUESTIONS,
};
pub use feedback::{FeedbackReport, MAX_SCORE};
