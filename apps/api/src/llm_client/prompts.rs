// Cross-cutting prompt fragments. Feature prompts live next to their callers
// (extraction/prompts.rs, suggestions/prompts.rs) and append these.

/// Appended to every system prompt that expects machine-readable output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Longest input (in characters) forwarded to the model in one prompt.
pub const MAX_PROMPT_INPUT_CHARS: usize = 16_000;

/// Builds a system prompt from a role description plus the JSON-only rule.
pub fn json_system(role_description: &str) -> String {
    format!("{} {}", role_description.trim(), JSON_ONLY_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_system_appends_instruction() {
        let system = json_system("You are a resume parser. ");
        assert!(system.starts_with("You are a resume parser. You MUST"));
        assert!(system.ends_with("apologies."));
    }
}
