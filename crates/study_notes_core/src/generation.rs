//! crates/study_notes_core/src/generation.rs
//!
//! The generation flow: validate the topic input, prompt the model, read its
//! JSON reply into the note schema and record the result in history.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Domain, GeneratedNotes, NewNoteRecord, NoteRecord, TopicNote};
use crate::ports::{NoteGenerationService, NoteRepository, PortError};
use crate::prompt::build_prompt;

//=========================================================================================
// Errors
//=========================================================================================

/// Why a generation request failed.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The topic input held nothing but commas and whitespace.
    #[error("Please enter at least one topic")]
    Validation,

    /// The model provider could not be reached or refused the request.
    #[error("Failed to generate notes: {0}")]
    Provider(#[source] PortError),

    /// The provider answered, but not with `{"notes": [...]}`.
    #[error("The generated notes could not be read: {0}")]
    Parse(#[from] serde_json::Error),
}

//=========================================================================================
// Input and Response Parsing
//=========================================================================================

/// Splits a comma-separated topic string, trimming each entry and dropping empties.
pub fn parse_topics(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
struct NotesResponse {
    notes: Vec<TopicNote>,
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$").expect("valid fence pattern")
    })
}

/// Reads a model reply of the form `{"notes": [...]}`.
///
/// A reply wrapped in a Markdown code fence is unwrapped first.
pub fn parse_notes_response(raw: &str) -> Result<Vec<TopicNote>, serde_json::Error> {
    let body = match code_fence().captures(raw) {
        Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()),
        None => raw,
    };
    let response: NotesResponse = serde_json::from_str(body)?;
    Ok(response.notes)
}

//=========================================================================================
// The Generation Service
//=========================================================================================

/// A successful generation. `id` is `None` when the history write failed.
#[derive(Debug, Clone)]
pub struct Generation {
    pub id: Option<Uuid>,
    pub notes: GeneratedNotes,
}

/// Coordinates the model and the history store for one request at a time.
#[derive(Clone)]
pub struct NotesGenerator {
    llm: Arc<dyn NoteGenerationService>,
    store: Arc<dyn NoteRepository>,
}

impl NotesGenerator {
    pub fn new(llm: Arc<dyn NoteGenerationService>, store: Arc<dyn NoteRepository>) -> Self {
        Self { llm, store }
    }

    /// Generates notes for a comma-separated topic list.
    ///
    /// The history write is best-effort: if it fails the notes are still
    /// returned and the failure is only logged.
    pub async fn generate(
        &self,
        topics: &str,
        domain: Domain,
        sub_level: Option<&str>,
        owner: Option<Uuid>,
    ) -> Result<Generation, GenerateError> {
        let topic_list = parse_topics(topics);
        if topic_list.is_empty() {
            return Err(GenerateError::Validation);
        }
        let sub_level = sub_level.map(str::trim).filter(|s| !s.is_empty());

        let prompt = build_prompt(&topic_list, domain, sub_level);
        info!(
            "Generating notes for {} topic(s) at {} level",
            topic_list.len(),
            domain.level_context(sub_level)
        );
        let raw = self
            .llm
            .generate_json(&prompt)
            .await
            .map_err(GenerateError::Provider)?;

        let notes = parse_notes_response(&raw)?;
        let generated = GeneratedNotes {
            domain,
            sub_level: sub_level.map(str::to_string),
            topics: topic_list,
            notes,
        };

        let record = NewNoteRecord {
            user_id: owner,
            domain: domain.storage_label(sub_level),
            topics: topics.to_string(),
            content: generated.clone(),
        };
        let id = match self.store.save(record).await {
            Ok(saved) => Some(saved.id),
            Err(e) => {
                warn!("Failed to save generated notes to history: {:?}", e);
                None
            }
        };

        Ok(Generation {
            id,
            notes: generated,
        })
    }

    /// Recent history for an owner, or anonymous history for `None`.
    /// A failed read yields an empty list.
    pub async fn history(&self, owner: Option<Uuid>) -> Vec<NoteRecord> {
        match self.store.list(owner).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to fetch history: {:?}", e);
                Vec::new()
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<NoteRecord, PortError> {
        self.store.get_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_are_trimmed_and_empties_dropped() {
        assert_eq!(
            parse_topics(" Algebra , ,Geometry,,  Trigonometry  ,"),
            vec!["Algebra", "Geometry", "Trigonometry"]
        );
    }

    #[test]
    fn blank_topic_input_yields_nothing() {
        assert!(parse_topics("").is_empty());
        assert!(parse_topics("  ,\t, \n ").is_empty());
    }

    #[test]
    fn topic_order_is_preserved() {
        let input = "zeta, alpha, mu";
        assert_eq!(parse_topics(input), vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn fenced_reply_parses_like_bare_json() {
        let bare = r#"{"notes":[{"title":"T","introduction":"I","summary":"S"}]}"#;
        let fenced = format!("```json\n{}\n```", bare);
        assert_eq!(
            parse_notes_response(bare).unwrap(),
            parse_notes_response(&fenced).unwrap()
        );
    }

    #[test]
    fn reply_without_notes_is_rejected() {
        assert!(parse_notes_response(r#"{"chapters":[]}"#).is_err());
        assert!(parse_notes_response("not json at all").is_err());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let notes =
            parse_notes_response(r#"{"notes":[{"title":"T","introduction":"I","summary":"S"}]}"#)
                .unwrap();
        assert!(notes[0].sections.is_empty());
        assert!(notes[0].practice_questions.is_empty());
        assert!(notes[0].diagram_description.is_none());
    }
}
