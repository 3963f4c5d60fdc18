//! Prompt construction shared by the answer sources.

/// System message sent ahead of chat-style prompts.
pub const SYSTEM_MESSAGE: &str =
    "You are a helpful assistant that provides comprehensive answers based on given sources.";

/// Prompt used by liveness probes.
pub const PROBE_PROMPT: &str = "Test connection";

const GEMINI_REQUIREMENTS: &[&str] = &[
    "Directly addresses the query",
    "Uses information from the provided context",
    "Cites sources when appropriate",
    "Is concise and to the point",
    "Keep it short and concise, don't use markdown formatting",
];

const GROQ_REQUIREMENTS: &[&str] = &[
    "Use information only from the provided context",
    "Include relevant citations",
    "Structure the response clearly",
    "Is concise and to the point",
    "Keep it short and concise, don't use markdown formatting",
    "Give detailed answers whenever asked, for example, if asked to explain a concept, give a detailed explanation",
];

/// Prompt for Gemini's single-turn `generateContent` call.
pub fn gemini_prompt(query: &str, context: &str) -> String {
    render(
        query,
        context,
        "Please provide a comprehensive answer that:",
        GEMINI_REQUIREMENTS,
    )
}

/// User prompt for Groq's chat completions call.
pub fn groq_prompt(query: &str, context: &str) -> String {
    render(query, context, "Requirements:\n", GROQ_REQUIREMENTS)
}

fn render(query: &str, context: &str, heading: &str, requirements: &[&str]) -> String {
    let mut prompt = format!(
        "Based on the following context, answer the query: {query}\n\nContext:\n{context}\n\n{heading}\n"
    );
    for (i, requirement) in requirements.iter().enumerate() {
        prompt.push_str(&format!("{}. {requirement}\n", i + 1));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_prompt_embeds_query_and_context() {
        let prompt = gemini_prompt("what is ownership", "Title: Rust\nContent: borrow");
        assert!(prompt.starts_with("Based on the following context, answer the query: what is ownership\n"));
        assert!(prompt.contains("Context:\nTitle: Rust\nContent: borrow\n"));
        assert!(prompt.contains("1. Directly addresses the query\n"));
        assert!(prompt.ends_with("5. Keep it short and concise, don't use markdown formatting\n"));
    }

    #[test]
    fn groq_prompt_lists_six_requirements() {
        let prompt = groq_prompt("q", "c");
        assert!(prompt.contains("Requirements:\n\n1. Use information only from the provided context"));
        assert!(prompt.contains("6. Give detailed answers"));
        assert!(!prompt.contains("7."));
    }

    #[test]
    fn empty_context_still_renders() {
        let prompt = gemini_prompt("q", "");
        assert!(prompt.contains("Context:\n\n\n"));
    }
}
