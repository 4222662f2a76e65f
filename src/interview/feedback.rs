//! Interview feedback report parsing and rendering.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Highest score on every skill.
pub const MAX_SCORE: u8 = 5;

static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Scored feedback returned by the interviewer after the final answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackReport {
    #[serde(deserialize_with = "score")]
    pub clarity: u8,
    #[serde(deserialize_with = "score")]
    pub technical_knowledge: u8,
    #[serde(deserialize_with = "score")]
    pub problem_solving: u8,
    #[serde(deserialize_with = "score")]
    pub communication: u8,
    pub overall_summary: String,
    pub areas_of_excellence: String,
    pub suggestions_for_improvement: String,
}

/// Accepts integers, floats or numeric strings; anything else scores 0.
fn score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(raw.round().clamp(0.0, MAX_SCORE as f64) as u8)
}

impl FeedbackReport {
    /// Parse the model's final reply.
    ///
    /// Tolerates code fences or prose around the object by taking the span from
    /// the first `{` to the last `}`.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let candidate = JSON_OBJECT
            .find(text)
            .map(|m| m.as_str())
            .unwrap_or(text);
        serde_json::from_str(candidate)
    }

    /// Skill labels and scores in display order.
    pub fn scores(&self) -> [(&'static str, u8); 4] {
        [
            ("Clarity", self.clarity),
            ("Technical Knowledge", self.technical_knowledge),
            ("Problem Solving", self.problem_solving),
            ("Communication", self.communication),
        ]
    }

    pub fn average(&self) -> f32 {
        let total: u32 = self.scores().iter().map(|(_, s)| *s as u32).sum();
        total as f32 / 4.0
    }

    /// Plain-text report with one bar per skill.
    pub fn render(&self, topic: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("📊 Interview Report: {}\n", topic));
        out.push_str(&"=".repeat(48));
        out.push('\n');

        for (label, score) in self.scores() {
            let filled = score.min(MAX_SCORE) as usize;
            out.push_str(&format!(
                "{:<20} {}{} {}/{}\n",
                label,
                "█".repeat(filled),
                "░".repeat(MAX_SCORE as usize - filled),
                score,
                MAX_SCORE
            ));
        }
        out.push_str(&format!("{:<20} {:.1}/{}\n\n", "Average", self.average(), MAX_SCORE));

        for (heading, body) in [
            ("Overall Summary", &self.overall_summary),
            ("Areas of Excellence", &self.areas_of_excellence),
            ("Suggestions for Improvement", &self.suggestions_for_improvement),
        ] {
            out.push_str(heading);
            out.push('\n');
            out.push_str(if body.is_empty() { "-" } else { body.as_str() });
            out.push_str("\n\n");
        }

        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"clarity": 4, "technical_knowledge": 3, "problem_solving": 5, "communication": 4, "overall_summary": "Solid.", "areas_of_excellence": "Structure.", "suggestions_for_improvement": "More examples."}"#;

    #[test]
    fn test_parse_plain_json() {
        let report = FeedbackReport::parse(SAMPLE).unwrap();
        assert_eq!(report.clarity, 4);
        assert_eq!(report.problem_solving, 5);
        assert_eq!(report.overall_summary, "Solid.");
        assert_eq!(report.average(), 4.0);
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = format!("Here is your feedback:\n```json\n{}\n```", SAMPLE);
        let report = FeedbackReport::parse(&text).unwrap();
        assert_eq!(report.communication, 4);
    }

    #[test]
    fn test_missing_and_odd_scores() {
        let report =
            FeedbackReport::parse(r#"{"clarity": "3", "technical_knowledge": 9, "problem_solving": 2.6}"#)
                .unwrap();
        assert_eq!(report.clarity, 3);
        assert_eq!(report.technical_knowledge, 5);
        assert_eq!(report.problem_solving, 3);
        assert_eq!(report.communication, 0);
        assert!(report.suggestions_for_improvement.is_empty());
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(FeedbackReport::parse("I'm sorry, I couldn't generate a response.").is_err());
    }

    #[test]
    fn test_render() {
        let report = FeedbackReport::parse(SAMPLE).unwrap();
        let text = report.render("Software Engineer");

        assert!(text.starts_with("📊 Interview Report: Software Engineer"));
        assert!(text.contains("Clarity              ████░ 4/5"));
        assert!(text.contains("Average              4.0/5"));
        assert!(text.contains("Suggestions for Improvement\nMore examples."));
    }
}
