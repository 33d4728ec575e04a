/// Characters of page context forwarded to the reasoning service.
pub const CONTEXT_CHAR_LIMIT: usize = 10_000;

pub fn build_extraction_prompt(text: &str) -> String {
    format!(
        r#"Extract verifiable, factual claims from the following text.

INSTRUCTIONS:
1. Extract each claim verbatim, as it is stated in the text
2. Only include statements that can be checked against public sources
3. Skip opinions, predictions, questions and rhetorical statements
4. Output ONLY a raw JSON list of strings, nothing else

TEXT:
"{}"

JSON OUTPUT:"#,
        text
    )
}

pub fn build_context_extraction_prompt(text: &str, page_context: &str) -> String {
    format!(
        r#"You are a forensic fact-checker.

FULL PAGE CONTEXT:
"{}..."

USER SELECTED TEXT (target for extraction):
"{}"

TASK: Extract verifiable, factual claims from the SELECTED TEXT.

RULES:
1. Claims must be STANDALONE. Do not use "he", "she", "it", "they", "this person" or "the company".
2. Use the PAGE CONTEXT to replace pronouns and vague references with actual names.
   (e.g. if the selected text is "He lied" and the context shows it is about Nixon, output "Nixon lied".)
3. Only extract claims made in the SELECTED TEXT. The page context is for disambiguation only.
4. Output ONLY a raw JSON list of strings, no markdown, no explanations

JSON OUTPUT:"#,
        truncate_chars(page_context, CONTEXT_CHAR_LIMIT),
        text
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_pos, _)) => &text[..byte_pos],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_capped() {
        let context = "x".repeat(CONTEXT_CHAR_LIMIT + 500);
        let prompt = build_context_extraction_prompt("He said taxes went up.", &context);

        assert!(prompt.contains(&"x".repeat(CONTEXT_CHAR_LIMIT)));
        assert!(!prompt.contains(&"x".repeat(CONTEXT_CHAR_LIMIT + 1)));
        assert!(prompt.contains("He said taxes went up."));
    }

    #[test]
    fn test_truncate_respects_multibyte_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[test]
    fn test_plain_prompt_contains_text() {
        let prompt = build_extraction_prompt("The Eiffel Tower is 330 metres tall.");
        assert!(prompt.contains("The Eiffel Tower is 330 metres tall."));
        assert!(prompt.contains("JSON list of strings"));
        assert!(!prompt.contains("PAGE CONTEXT"));
    }
}
