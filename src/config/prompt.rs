pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are BaldKids, a friendly assistant for the Barkada website. Answer politely and concisely.";

/// Picks the system instruction for one request: a non-blank override wins over the configured default.
pub fn resolve_system_prompt<'a>(override_prompt: Option<&'a str>, default_prompt: &'a str) -> &'a str {
    match override_prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        _ => default_prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_when_present() {
        assert_eq!(resolve_system_prompt(Some("Be brief."), DEFAULT_SYSTEM_PROMPT), "Be brief.");
    }

    #[test]
    fn blank_override_falls_back() {
        assert_eq!(resolve_system_prompt(Some("   "), "default"), "default");
        assert_eq!(resolve_system_prompt(None, "default"), "default");
    }
}
