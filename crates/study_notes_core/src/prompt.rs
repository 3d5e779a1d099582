//! crates/study_notes_core/src/prompt.rs
//!
//! Builds the instruction sent to the note-generating model.

use crate::domain::Domain;

const CONTENT_REQUIREMENTS: &str = r#"1. Title: A formal, textbook-style chapter title.
2. Introduction: A broad overview and the "Why this matters" context.
3. Structured Sections: Deep-dive headings and subheadings. Content should be detailed, clear, and comprehensive.
4. Key Definitions: Crucial terminology with exact academic definitions.
5. Step-by-Step Explanations: Complex processes broken down into logical sequences.
6. Examples: Provide AT LEAST 5 high-quality, illustrative examples for each topic.
- Each example must have a descriptive 'title'.
- CONTEXTUAL CONTENT: ONLY provide 'code' snippets if the topic is programming/CS. ONLY provide 'formula' or LaTeX if the topic is Math/Science.
- For Humanities (History, Literature, etc.), provide descriptive real-world scenarios or historical case studies as examples INSTEAD of code/formulas.
- Each example MUST have a detailed 'explanation' that bridges theory and practice.
7. Diagram Description: A detailed, clear description of what a professional diagram for this topic should illustrate.
8. Summary: A "Takeaway" section summarizing core concepts.
9. Practice Questions: Generate a diverse set of AT LEAST 8 practice questions including:
- Multiple Choice Questions (MCQs): Include 'options' and 'correctAnswer'.
- Coding Practice/Problem Solving: ONLY for CS/Math/Science topics. For others, provide 'Critical Thinking' or 'Analytical' questions instead.
- Short/Long Answer Questions: For conceptual understanding."#;

const JSON_CONTRACT: &str = r#"The output MUST be a JSON object matching this TypeScript interface:
interface TopicNote {
  title: string;
  introduction: string;
  sections: { heading: string; content: string; }[];
  definitions: { term: string; definition: string; }[];
  examples: { title: string; code?: string; explanation: string; }[];
  diagramDescription?: string;
  summary: string;
  practiceQuestions: {
    question: string;
    type: 'short' | 'long' | 'mcq' | 'numerical' | 'coding';
    options?: string[];
    correctAnswer?: string;
    starterCode?: string;
    solution?: string;
  }[];
}
interface Response {
  notes: TopicNote[];
}"#;

/// Builds the full generation prompt for a list of topics at a given level.
///
/// `topics` is expected to be already trimmed and non-empty; see
/// [`parse_topics`](crate::generation::parse_topics).
pub fn build_prompt(topics: &[String], domain: Domain, sub_level: Option<&str>) -> String {
    let level_context = domain.level_context(sub_level);

    format!(
        "You are an elite academic textbook author and expert educator. Your task is to generate perfect, comprehensive, book-like study notes for {level_context} level students.

The notes must follow these high-quality standards:
- Academic Rigor: Use precise, professional language appropriate for the {level_context} level.
- Logical Structure: Each topic should flow naturally from foundational concepts to complex applications.
- Visual Clarity: Use clear headings and organized sections.
- Pedagogical Value: Include deep explanations, not just surface-level facts.

For each of these topics: {topics}, generate:
{requirements}

{contract}

Context for {domain} level:
- {framing}
",
        level_context = level_context,
        topics = topics.join(", "),
        requirements = CONTENT_REQUIREMENTS,
        contract = JSON_CONTRACT,
        domain = domain.label(),
        framing = domain.framing(sub_level),
    )
}
