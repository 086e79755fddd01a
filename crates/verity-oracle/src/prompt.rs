//! Prompt sent to the miner pool

/// Most characters of enrichment context included in a prompt
pub const MAX_CONTEXT_CHARS: usize = 2000;

/// Builds the prompt dispatched to miners for one query
pub struct PromptBuilder {
    query: String,
    context: Option<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: None,
        }
    }

    /// Add enrichment context (live prices, scores, ...)
    ///
    /// Blank context is ignored.
    pub fn with_context(mut self, context: Option<impl Into<String>>) -> Self {
        self.context = context
            .map(Into::into)
            .filter(|c: &String| !c.trim().is_empty());
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(ANSWER_INSTRUCTIONS);
        prompt.push_str("\n\n");

        if let Some(context) = &self.context {
            prompt.push_str("Context (may be more recent than your training data):\n");
            prompt.push_str("---\n");
            prompt.push_str(truncate_chars(context.trim(), MAX_CONTEXT_CHARS));
            prompt.push_str("\n---\n\n");
        }

        prompt.push_str("Question: ");
        prompt.push_str(self.query.trim());
        prompt.push_str("\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

const ANSWER_INSTRUCTIONS: &str = r#"Answer the question below as accurately as you can.

Rules:
- For yes/no questions and claims, start with "Yes" or "No"
- For prices and quantities, give a single figure or a range such as "$100,000 - $110,000"
- State uncertainty plainly instead of guessing
- Prefer facts you can attribute to a reliable source"#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Reply with the answer only: no reasoning, no markdown, at most three sentences.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_query() {
        let prompt = PromptBuilder::new("  Will BTC close above $100k?  ").build();
        assert!(prompt.contains("Question: Will BTC close above $100k?\n"));
        assert!(prompt.contains("Answer the question below"));
        assert!(!prompt.contains("Context"));
    }

    #[test]
    fn test_prompt_includes_context() {
        let prompt = PromptBuilder::new("q")
            .with_context(Some("BTC spot: $97,250"))
            .build();
        assert!(prompt.contains("Context"));
        assert!(prompt.contains("BTC spot: $97,250"));
    }

    #[test]
    fn test_blank_context_ignored() {
        let prompt = PromptBuilder::new("q").with_context(Some("   ")).build();
        assert!(!prompt.contains("Context"));
        let prompt = PromptBuilder::new("q").with_context(None::<String>).build();
        assert!(!prompt.contains("Context"));
    }

    #[test]
    fn test_context_is_truncated() {
        let long = "é".repeat(MAX_CONTEXT_CHARS + 50);
        let prompt = PromptBuilder::new("q").with_context(Some(long)).build();
        assert_eq!(prompt.matches('é').count(), MAX_CONTEXT_CHARS);
    }
}
