//! crates/study_notes_core/src/domain.rs
//!
//! Defines the core data structures for the application: the shape of a
//! generated chapter, the result of one generation request, the academic
//! levels a request can target, and the stored history records.
//!
//! Field names serialize in camelCase because the same structures are the
//! JSON contract handed to the language model and stored as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Generated Content
//=========================================================================================

/// One generated chapter of notes for a single topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicNote {
    pub title: String,
    pub introduction: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram_description: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub practice_questions: Vec<PracticeQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub explanation: String,
}

/// The kind of a practice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Short,
    Long,
    Mcq,
    Numerical,
    Coding,
}

impl QuestionType {
    /// The lowercase wire name, e.g. `mcq`.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Short => "short",
            QuestionType::Long => "long",
            QuestionType::Mcq => "mcq",
            QuestionType::Numerical => "numerical",
            QuestionType::Coding => "coding",
        }
    }
}

/// A practice question.
///
/// `options` and `correct_answer` are only meaningful for [`QuestionType::Mcq`],
/// `starter_code` only for [`QuestionType::Coding`]. Nothing enforces this; the
/// model is merely asked to follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

/// The result of one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNotes {
    pub domain: Domain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_level: Option<String>,
    pub topics: Vec<String>,
    pub notes: Vec<TopicNote>,
}

impl GeneratedNotes {
    /// `"<Domain> (<subLevel>)"`, or just the domain label.
    pub fn level_context(&self) -> String {
        self.domain.level_context(self.sub_level.as_deref())
    }
}

//=========================================================================================
// Academic Levels
//=========================================================================================

/// The coarse academic context a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    School,
    College,
    #[serde(rename = "Competitive Exam")]
    CompetitiveExam,
}

const SCHOOL_CLASSES: &[&str] = &[
    "Class 6", "Class 7", "Class 8", "Class 9", "Class 10", "Class 11", "Class 12",
];

const COLLEGE_SEMESTERS: &[&str] = &[
    "Semester 1",
    "Semester 2",
    "Semester 3",
    "Semester 4",
    "Semester 5",
    "Semester 6",
    "Semester 7",
    "Semester 8",
];

const COMPETITIVE_EXAMS: &[&str] = &[
    "NEET",
    "JEE-Mains",
    "JEE-Advanced",
    "GATE",
    "UPSC",
    "CAT",
    "CLAT",
    "GRE",
    "GMAT",
    "SAT",
    "IELTS",
    "TOEFL",
    "NDA",
    "CDS",
    "SSC CGL",
];

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::School, Domain::College, Domain::CompetitiveExam];

    /// Human-readable name, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Domain::School => "School",
            Domain::College => "College",
            Domain::CompetitiveExam => "Competitive Exam",
        }
    }

    /// What a sub-level is called within this domain.
    pub fn sub_level_label(self) -> &'static str {
        match self {
            Domain::School => "Class",
            Domain::College => "Semester",
            Domain::CompetitiveExam => "Exam",
        }
    }

    /// The sub-levels offered when building a request.
    pub fn sub_levels(self) -> &'static [&'static str] {
        match self {
            Domain::School => SCHOOL_CLASSES,
            Domain::College => COLLEGE_SEMESTERS,
            Domain::CompetitiveExam => COMPETITIVE_EXAMS,
        }
    }

    pub fn default_sub_level(self) -> &'static str {
        match self {
            Domain::School => "Class 10",
            Domain::College => "Semester 1",
            Domain::CompetitiveExam => "NEET",
        }
    }

    /// Level-specific guidance embedded in the generation prompt.
    pub fn framing(self, sub_level: Option<&str>) -> String {
        match self {
            Domain::School => format!(
                "School: Focus on clarity, foundational principles, and engaging pedagogical tone. Tailor depth to {}.",
                sub_level.unwrap_or("the specified grade")
            ),
            Domain::College => format!(
                "College: Focus on technical depth, theoretical frameworks, formal analysis, and advanced problem-solving techniques. Tailor to {}.",
                sub_level.unwrap_or("university level")
            ),
            Domain::CompetitiveExam => format!(
                "Competitive Exam: Focus on high-yield concepts, exam-specific patterns, shortcuts (if applicable), and rigorous problem-solving typical of {}.",
                sub_level.unwrap_or("competitive exams")
            ),
        }
    }

    /// `"College (Semester 3)"`, or `"College"` without a sub-level.
    pub fn level_context(self, sub_level: Option<&str>) -> String {
        match sub_level {
            Some(level) => format!("{} ({})", self.label(), level),
            None => self.label().to_string(),
        }
    }

    /// The denormalized label stored next to a history entry.
    pub fn storage_label(self, sub_level: Option<&str>) -> String {
        match sub_level {
            Some(level) => format!("{} - {}", self.label(), level),
            None => self.label().to_string(),
        }
    }
}

//=========================================================================================
// History Records
//=========================================================================================

/// The number of entries returned by a history listing.
pub const HISTORY_PAGE_SIZE: usize = 10;

/// A stored generation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteRecord {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub domain: String,
    pub topics: String,
    pub content: GeneratedNotes,
    pub created_at: DateTime<Utc>,
}

/// The insert payload for a history entry. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewNoteRecord {
    pub user_id: Option<Uuid>,
    pub domain: String,
    pub topics: String,
    pub content: GeneratedNotes,
}

//=========================================================================================
// Accounts
//=========================================================================================

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_serializes_with_display_names() {
        let json = serde_json::to_string(&Domain::CompetitiveExam).unwrap();
        assert_eq!(json, "\"Competitive Exam\"");
        let parsed: Domain = serde_json::from_str("\"College\"").unwrap();
        assert_eq!(parsed, Domain::College);
    }

    #[test]
    fn default_sub_level_is_offered() {
        for domain in Domain::ALL {
            assert!(domain.sub_levels().contains(&domain.default_sub_level()));
        }
    }

    #[test]
    fn labels_include_sub_level_when_present() {
        assert_eq!(Domain::School.level_context(Some("Class 9")), "School (Class 9)");
        assert_eq!(Domain::School.level_context(None), "School");
        assert_eq!(
            Domain::CompetitiveExam.storage_label(Some("GATE")),
            "Competitive Exam - GATE"
        );
        assert_eq!(Domain::College.storage_label(None), "College");
    }

    #[test]
    fn framing_falls_back_without_sub_level() {
        assert!(Domain::College.framing(None).ends_with("Tailor to university level."));
        assert!(Domain::School.framing(Some("Class 7")).contains("Class 7"));
    }

    #[test]
    fn question_parses_camel_case_fields() {
        let q: PracticeQuestion = serde_json::from_str(
            r#"{"question":"2+2?","type":"mcq","options":["3","4"],"correctAnswer":"B"}"#,
        )
        .unwrap();
        assert_eq!(q.kind, QuestionType::Mcq);
        assert_eq!(q.correct_answer.as_deref(), Some("B"));
        assert_eq!(q.options.as_ref().map(Vec::len), Some(2));
        assert!(q.solution.is_none());
    }
}
