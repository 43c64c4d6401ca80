//! System instruction for the assistant.
//!
//! The instruction fixes Aiveno's persona and embeds the context summary
//! built from the current state, so the model can answer questions about
//! existing reminders and spending without extra tool calls.

/// Aiveno's persona and behavioural rules.
pub const ASSISTANT_PERSONA: &str = r"You are Aiveno, a smart, friendly, and reliable personal life assistant for Indian users.
Be caring, human-like, and practical. Help with reminders, planning, goals, expenses, and documents.
Tone: Supportive, smart, and trustworthy.
Indian Context: Use INR (₹) and Indian date formats (DD/MM/YYYY) in text.";

/// Tool-use guidance appended after the context.
const TOOL_GUIDANCE: &str = r"If the user wants to set a reminder, log an expense, or track a document, use the available tools.
When the user shares a lasting personal fact (name, family, routine, preference), save it with update_memory.
Dates passed to tools must use YYYY-MM-DD HH:MM.";

/// Builds the full system instruction around a context summary.
#[must_use]
pub fn build_system_instruction(context: &str) -> String {
    format!("{ASSISTANT_PERSONA}\nCurrent User Context:\n{context}\n\n{TOOL_GUIDANCE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_embeds_context() {
        let instruction = build_system_instruction("User Name: Priya");
        assert!(instruction.starts_with("You are Aiveno"));
        assert!(instruction.contains("Current User Context:\nUser Name: Priya"));
        assert!(instruction.contains("use the available tools"));
    }
}
