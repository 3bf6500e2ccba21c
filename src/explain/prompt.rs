//! Prompt template for section explanations

/// Instructions placed before the section text
const INSTRUCTIONS: &str = "\
You are an expert Principal Engineer and tech architect. Your task is to explain a section of a \
technical blueprint in a clear, concise, and easy-to-understand way. Assume you are explaining \
this to a junior developer or a product manager who is technically literate but not an expert \
in this specific domain.

Focus on:
1.  **What it is:** Briefly define the core concept or component.
2.  **Why it matters:** Explain its purpose and importance in the overall project.
3.  **How it works:** Give a simplified overview of its mechanism or interaction with other parts.
4.  **Key Takeaways:** Summarize the most important points in a bulleted list.

Use clear language and markdown for formatting (headings, bold text, bullet points). Avoid \
overly technical jargon where possible, or explain it if you must use it.

Here is the blueprint section to explain:";

/// Build the explanation prompt with the section embedded verbatim
pub fn explanation_prompt(section_content: &str) -> String {
    format!("{}\n---\n{}\n---\n", INSTRUCTIONS, section_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_is_embedded_between_delimiters() {
        let prompt = explanation_prompt("## Storage\nUses  two   spaces");
        assert!(prompt.contains("\n---\n## Storage\nUses  two   spaces\n---\n"));
    }

    #[test]
    fn prompt_lists_focus_points() {
        let prompt = explanation_prompt("x");
        for point in ["What it is", "Why it matters", "How it works", "Key Takeaways"] {
            assert!(prompt.contains(point), "missing {point}");
        }
    }
}
