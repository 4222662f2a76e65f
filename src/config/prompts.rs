//! System prompts for the chat personas and the interview coach.

/// Output-formatting rules appended to every persona instruction.
pub static FORMAT_RULES: &str = r#"YOUR RESPONSE MUST FOLLOW THESE RULES STRICTLY:
1. ABSOLUTELY NO MARKDOWN STYLING: Your entire response must be plain text. Do NOT use markdown for any styling (no asterisks, underscores, or hashes).
2. USE EMOJIS: Use relevant emojis to make the conversation friendly and interactive.
3. BE HELPFUL BUT CONCISE: Keep answers to about a short paragraph unless asked for detail (e.g., "explain" or "in detail").
4. USE PARAGRAPHS AND LISTS: Use double newlines for paragraphs and simple hyphens '-' for lists.
5. STAY IN CHARACTER: Always answer from the perspective of your assigned persona."#;

/// Persona text followed by the formatting rules.
pub fn build_system_instruction(persona_instruction: &str) -> String {
    format!("{}\n\n{}", persona_instruction.trim_end(), FORMAT_RULES)
}

/// System prompt for the mock interviewer.
pub fn interviewer_prompt(topic: &str, total_questions: u32) -> String {
    format!(
        r#"You are an expert interviewer named Alex. Conducting a mock interview for '{topic}'.
- Ask exactly {total_questions} questions.
- One question at a time.
- After the final answer, provide ONLY a JSON object: {{ "clarity": 1-5, "technical_knowledge": 1-5, "problem_solving": 1-5, "communication": 1-5, "overall_summary": "...", "areas_of_excellence": "...", "suggestions_for_improvement": "..." }}
- No markdown formatting. Plain text only."#
    )
}

/// First user turn of an interview.
pub fn interview_opening(topic: &str, total_questions: u32) -> String {
    format!(
        "Let's start the mock interview for the {} role. Ask me {} questions.",
        topic, total_questions
    )
}
