//! crates/study_notes_core/src/reveal.rs
//!
//! Per-question solution reveal for the reading view.

use serde::Serialize;

use crate::domain::{PracticeQuestion, QuestionType};

pub const MISSING_SOLUTION: &str = "Solution details not provided in the generated content.";

/// What a revealed solution panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionView {
    /// Only set for multiple-choice questions that carry an answer.
    pub correct_option: Option<String>,
    pub solution: String,
    /// Coding solutions render as a code block.
    pub is_code: bool,
}

impl SolutionView {
    pub fn for_question(question: &PracticeQuestion) -> Self {
        let correct_option = match question.kind {
            QuestionType::Mcq => question.correct_answer.clone(),
            _ => None,
        };
        match &question.solution {
            Some(solution) => Self {
                correct_option,
                solution: solution.clone(),
                is_code: question.kind == QuestionType::Coding,
            },
            None => Self {
                correct_option,
                solution: MISSING_SOLUTION.to_string(),
                is_code: false,
            },
        }
    }
}
