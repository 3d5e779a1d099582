//! crates/study_notes_core/src/export/mod.rs
//!
//! Serializers that turn a [`GeneratedNotes`] value into downloadable files:
//! a flat plain-text document and a paginated PDF.

pub mod document;
pub mod layout;
pub mod pdf;
pub mod text;

use bytes::Bytes;

use crate::domain::GeneratedNotes;

/// An error raised while producing the bytes of an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to render PDF: {0}")]
    Pdf(String),
}

/// A rendered export, ready to be handed out as a download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Bytes,
}

/// `Study_Notes_<first topic>` with whitespace runs replaced by underscores.
pub fn file_stem(notes: &GeneratedNotes) -> String {
    match notes.topics.first() {
        Some(topic) => format!(
            "Study_Notes_{}",
            topic.split_whitespace().collect::<Vec<_>>().join("_")
        ),
        None => "Study_Notes".to_string(),
    }
}

/// Renders the plain-text export.
pub fn to_text(notes: &GeneratedNotes) -> ExportFile {
    ExportFile {
        file_name: format!("{}.txt", file_stem(notes)),
        content_type: "text/plain; charset=utf-8",
        body: Bytes::from(text::render(notes)),
    }
}

/// Lays out and renders the PDF export.
pub fn to_pdf(notes: &GeneratedNotes) -> Result<ExportFile, ExportError> {
    let laid_out = document::compose(notes);
    let bytes = pdf::render(&laid_out)?;
    Ok(ExportFile {
        file_name: format!("{}.pdf", file_stem(notes)),
        content_type: "application/pdf",
        body: Bytes::from(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    fn notes_with_topics(topics: &[&str]) -> GeneratedNotes {
        GeneratedNotes {
            domain: Domain::School,
            sub_level: None,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            notes: Vec::new(),
        }
    }

    #[test]
    fn file_names_come_from_first_topic() {
        let notes = notes_with_topics(&["Newton's  Laws of\tMotion", "Friction"]);
        assert_eq!(to_text(&notes).file_name, "Study_Notes_Newton's_Laws_of_Motion.txt");
        assert_eq!(file_stem(&notes), "Study_Notes_Newton's_Laws_of_Motion");
    }

    #[test]
    fn file_name_without_topics() {
        assert_eq!(file_stem(&notes_with_topics(&[])), "Study_Notes");
    }
}
