//! Configuration module for personas and prompts.

mod personas;
mod prompts;

pub use personas::{
    find_assistant, search_assistants, AssistantEntry, Persona, PersonaError, ASSISTANTS,
};
pub use prompts::{build_system_instruction, interview_opening, interviewer_prompt, FORMAT_RULES};
