//! crates/study_notes_core/src/export/text.rs
//!
//! The plain-text export: a fixed template walked chapter by chapter.

use std::fmt::Write;

use crate::domain::{GeneratedNotes, PracticeQuestion, TopicNote};

const HEADER_RULE: &str = "========================================";
const CHAPTER_RULE: &str = "----------------------------------------";

/// Letter label for the n-th option: `A`, `B`, `C`...
pub(crate) fn option_letter(index: usize) -> char {
    char::from_u32('A' as u32 + index as u32).unwrap_or('?')
}

pub fn render(notes: &GeneratedNotes) -> String {
    let mut out = String::new();

    let level = match &notes.sub_level {
        Some(sub) => format!("{} LEVEL ({})", notes.domain.label().to_uppercase(), sub),
        None => format!("{} LEVEL", notes.domain.label().to_uppercase()),
    };
    let _ = writeln!(out, "STUDY NOTES - {}", level);
    let _ = writeln!(out, "Topics: {}", notes.topics.join(", "));
    let _ = write!(out, "\n{}\n\n", HEADER_RULE);

    for (index, note) in notes.notes.iter().enumerate() {
        render_chapter(&mut out, index, note);
        let _ = write!(out, "\n{}\n\n", CHAPTER_RULE);
    }

    out
}

fn render_chapter(out: &mut String, index: usize, note: &TopicNote) {
    let _ = write!(out, "CHAPTER {}: {}\n\n", index + 1, note.title.to_uppercase());
    let _ = write!(out, "INTRODUCTION\n{}\n\n", note.introduction);

    out.push_str("KEY DEFINITIONS\n");
    for d in &note.definitions {
        let _ = writeln!(out, "- {}: {}", d.term, d.definition);
    }
    out.push('\n');

    for s in &note.sections {
        let _ = write!(out, "{}\n{}\n\n", s.heading.to_uppercase(), s.content);
    }

    out.push_str("EXAMPLES & EXPLANATIONS\n");
    for (i, e) in note.examples.iter().enumerate() {
        let _ = writeln!(out, "Example {}: {}", i + 1, e.title);
        if let Some(code) = &e.code {
            let _ = write!(out, "CODE:\n{}\n\n", code);
        }
        let _ = write!(out, "EXPLANATION: {}\n\n", e.explanation);
    }

    if let Some(diagram) = &note.diagram_description {
        let _ = write!(out, "DIAGRAM DESCRIPTION\n{}\n\n", diagram);
    }

    let _ = write!(out, "SUMMARY\n{}\n\n", note.summary);

    out.push_str("PRACTICE QUESTIONS\n");
    for (i, q) in note.practice_questions.iter().enumerate() {
        render_question(out, i, q);
        out.push('\n');
    }
}

fn render_question(out: &mut String, index: usize, q: &PracticeQuestion) {
    let _ = writeln!(
        out,
        "{}. [{}] {}",
        index + 1,
        q.kind.as_str().to_uppercase(),
        q.question
    );
    if let Some(options) = &q.options {
        for (i, opt) in options.iter().enumerate() {
            let _ = writeln!(out, "   {}) {}", option_letter(i), opt);
        }
    }
    if let Some(answer) = &q.correct_answer {
        let _ = writeln!(out, "   Correct Answer: {}", answer);
    }
    if let Some(code) = &q.starter_code {
        let _ = writeln!(out, "   Starter Code:\n{}", code);
    }
    if let Some(solution) = &q.solution {
        let _ = writeln!(out, "   Solution:\n{}", solution);
    }
}
