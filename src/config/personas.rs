//! Assistant personas and the browsable assistant catalog.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown persona: {0}")]
pub struct PersonaError(pub String);

/// A chat persona. `Interview` runs the interview coach instead of free chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Persona {
    #[default]
    General,
    Healthcare,
    Technology,
    Finance,
    Education,
    Travel,
    Marketing,
    Interview,
}

impl Persona {
    pub const ALL: [Persona; 8] = [
        Persona::General,
        Persona::Healthcare,
        Persona::Technology,
        Persona::Finance,
        Persona::Education,
        Persona::Travel,
        Persona::Marketing,
        Persona::Interview,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Persona::General => "general",
            Persona::Healthcare => "healthcare",
            Persona::Technology => "technology",
            Persona::Finance => "finance",
            Persona::Education => "education",
            Persona::Travel => "travel",
            Persona::Marketing => "marketing",
            Persona::Interview => "interview",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Persona::General => "General",
            Persona::Healthcare => "Healthcare",
            Persona::Technology => "Technology",
            Persona::Finance => "Finance",
            Persona::Education => "Education",
            Persona::Travel => "Travel",
            Persona::Marketing => "Marketing",
            Persona::Interview => "Interview Coach",
        }
    }

    /// Instruction text sent ahead of the formatting rules.
    pub fn instruction(&self) -> &'static str {
        match self {
            Persona::Healthcare => "You are a domain-locked Healthcare assistant. Scope: general wellness, fitness, nutrition, preventive tips. Out of scope: diagnostics, prescriptions, clinical/medical advice. Policy: if a user asks outside this scope, refuse briefly and steer back with a clarifying healthcare-related question. Always recommend consulting a licensed professional for medical concerns.",
            Persona::Technology => "You are a domain-locked Technology assistant. Scope: software, hardware, programming, tools, troubleshooting. Policy: if a request is outside technology, refuse briefly and redirect to tech context. Provide clear steps and concise examples when appropriate.",
            Persona::Finance => "You are a domain-locked Finance assistant. Scope: budgeting, saving strategies, general financial literacy. Out of scope: personalized investment, tax, or legal advice. Policy: if off-topic or requiring professional advice, refuse succinctly and suggest finance-safe alternatives and disclaimers.",
            Persona::Education => "You are a domain-locked Education assistant. Scope: explaining concepts, study strategies, practice ideas, learning plans. Policy: if off-topic, refuse briefly and guide the user back to learning-related questions.",
            Persona::Travel => "You are a domain-locked Travel assistant. Scope: destinations, itineraries, logistics, local tips. Policy: ask clarifying questions (dates, budget, preferences). If off-topic, refuse briefly and redirect to travel planning.",
            Persona::Marketing => "You are a domain-locked Marketing assistant. Scope: copywriting, social media campaign ideas, taglines, and marketing strategies. Policy: if off-topic, refuse briefly and guide the user back to marketing-related questions.",
            Persona::General | Persona::Interview => "You are a helpful, friendly General assistant.",
        }
    }

    /// Greeting shown when a chat starts. The interview coach has its own.
    pub fn welcome_message(&self) -> Option<String> {
        match self {
            Persona::Interview => None,
            other => Some(format!(
                "Hello! I am your {} assistant. How can I help you today?",
                other.title()
            )),
        }
    }

    pub fn is_interview(&self) -> bool {
        matches!(self, Persona::Interview)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Persona {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Persona::ALL
            .into_iter()
            .find(|persona| persona.key() == needle)
            .ok_or_else(|| PersonaError(s.to_string()))
    }
}

/// An entry in the assistant catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub samples: [&'static str; 3],
    /// Persona the entry opens.
    pub persona: Persona,
    /// Only listed when searching.
    pub hidden: bool,
}

const fn entry(
    key: &'static str,
    title: &'static str,
    description: &'static str,
    samples: [&'static str; 3],
    persona: Persona,
    hidden: bool,
) -> AssistantEntry {
    AssistantEntry {
        key,
        title,
        description,
        samples,
        persona,
        hidden,
    }
}

pub static ASSISTANTS: [AssistantEntry; 13] = [
    entry("general", "General", "Friendly helper for everyday tasks.", ["Plan my day with 3 tasks", "Summarize this pasted text", "Draft a polite email"], Persona::General, false),
    entry("interview", "Interview Coach", "Practice for your next job interview.", ["Start a SWE interview", "Mock PM interview", "Practice behavioral questions"], Persona::Interview, false),
    entry("healthcare", "Healthcare", "Wellness info, not medical advice.", ["20-min home workout", "Balanced breakfast ideas", "Sleep hygiene tips"], Persona::Healthcare, false),
    entry("technology", "Technology", "Explain tech, code, and tools.", ["Explain React hooks simply", "Fix this error", "Pros/cons of TypeScript"], Persona::Technology, false),
    entry("finance", "Finance", "Budgeting and money habits.", ["50/30/20 budget example", "Save on groceries", "Emergency fund plan"], Persona::Finance, false),
    entry("education", "Education", "Study help and strategies.", ["Study plan for algebra", "Explain photosynthesis", "Active recall ideas"], Persona::Education, false),
    entry("travel", "Travel", "Itineraries and local tips.", ["3-day Goa itinerary", "Cheapest way to Udaipur", "Must-see in Jaipur"], Persona::Travel, false),
    entry("cooking", "Cooking", "Recipes and meal planning.", ["Easy paneer dinner", "5-day veg meal prep", "Healthy snacks list"], Persona::Education, true),
    entry("fitness", "Fitness", "Workouts and habit building.", ["Beginner 3-day split", "10-min stretch routine", "Steps to build consistency"], Persona::Healthcare, true),
    entry("career", "Career", "Resume, interviews, growth.", ["Rewrite my resume bullet", "Mock interview questions", "30-60-90 day plan"], Persona::Education, true),
    entry("marketing", "Marketing", "Copy and campaign ideas.", ["Taglines for a bakery", "Instagram post ideas", "Email subject lines"], Persona::Marketing, true),
    entry("math", "Math Tutor", "Step-by-step solutions.", ["Solve: 2x+5=17", "Explain derivatives", "Practice problems for ratios"], Persona::Education, true),
    entry("history", "History", "Events and timelines.", ["Causes of WWI", "Mughal empire overview", "Timeline of Indian independence"], Persona::Education, true),
];

/// Filter the catalog.
///
/// Matches `query` case-insensitively against title and description. A blank
/// query lists only the non-hidden entries.
pub fn search_assistants(query: &str) -> Vec<&'static AssistantEntry> {
    let needle = query.trim().to_lowercase();
    let browsing = needle.is_empty();

    ASSISTANTS
        .iter()
        .filter(|a| format!("{} {}", a.title, a.description).to_lowercase().contains(&needle))
        .filter(|a| !browsing || !a.hidden)
        .collect()
}

/// Look up a catalog entry by key.
pub fn find_assistant(key: &str) -> Option<&'static AssistantEntry> {
    ASSISTANTS.iter().find(|a| a.key.eq_ignore_ascii_case(key.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_round_trip_keys() {
        for persona in Persona::ALL {
            assert_eq!(persona.key().parse::<Persona>(), Ok(persona));
        }
        assert_eq!(" Finance ".parse::<Persona>(), Ok(Persona::Finance));
        assert!("pirate".parse::<Persona>().is_err());
    }

    #[test]
    fn test_welcome_message() {
        assert_eq!(
            Persona::Travel.welcome_message().as_deref(),
            Some("Hello! I am your Travel assistant. How can I help you today?")
        );
        assert_eq!(Persona::Interview.welcome_message(), None);
    }

    #[test]
    fn test_default_instruction() {
        assert_eq!(
            Persona::General.instruction(),
            "You are a helpful, friendly General assistant."
        );
        assert!(Persona::Healthcare.instruction().contains("licensed professional"));
    }

    #[test]
    fn test_blank_search_lists_core_assistants() {
        let keys: Vec<&str> = search_assistants("  ").iter().map(|a| a.key).collect();
        assert_eq!(
            keys,
            vec!["general", "interview", "healthcare", "technology", "finance", "education", "travel"]
        );
    }

    #[test]
    fn test_search_includes_hidden_entries() {
        let keys: Vec<&str> = search_assistants("RECIPES").iter().map(|a| a.key).collect();
        assert_eq!(keys, vec!["cooking"]);

        let keys: Vec<&str> = search_assistants("  math ").iter().map(|a| a.key).collect();
        assert_eq!(keys, vec!["math"]);

        let keys: Vec<&str> = search_assistants("interview").iter().map(|a| a.key).collect();
        assert_eq!(keys, vec!["interview", "career"]);
    }

    #[test]
    fn test_find_assistant() {
        assert_eq!(find_assistant("Math").map(|a| a.persona), Some(Persona::Education));
        assert!(find_assistant("unknown").is_none());
    }
}
