//! End-to-end tests of the generation flow against fake ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use study_notes_core::{
    Domain, GenerateError, NewNoteRecord, NoteGenerationService, NoteRecord, NoteRepository,
    NotesGenerator, PortError, PortResult, QuestionType, TopicNote,
};
use uuid::Uuid;

const ONE_NOTE: &str = r#"{
  "notes": [{
    "title": "Photosynthesis",
    "introduction": "How plants make food.",
    "sections": [{"heading": "Light reactions", "content": "Happen in the thylakoid."}],
    "definitions": [{"term": "Chlorophyll", "definition": "A green pigment."}],
    "examples": [{"title": "Leaf in sunlight", "explanation": "Produces oxygen."}],
    "diagramDescription": "A chloroplast cross-section.",
    "summary": "Light becomes sugar.",
    "practiceQuestions": [
      {"question": "Where is chlorophyll?", "type": "mcq", "options": ["Root", "Leaf"], "correctAnswer": "B"},
      {"question": "Explain the Calvin cycle.", "type": "long", "solution": "It fixes carbon."}
    ]
  }]
}"#;

struct FakeLlm {
    reply: PortResult<String>,
    calls: AtomicUsize,
}

impl FakeLlm {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(PortError::Unexpected("connection reset".to_string())),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NoteGenerationService for FakeLlm {
    async fn generate_json(&self, _prompt: &str) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

#[derive(Default)]
struct FakeStore {
    rows: Mutex<Vec<NoteRecord>>,
    fail_writes: bool,
    fail_reads: bool,
}

#[async_trait]
impl NoteRepository for FakeStore {
    async fn save(&self, record: NewNoteRecord) -> PortResult<NoteRecord> {
        if self.fail_writes {
            return Err(PortError::Unexpected("store offline".to_string()));
        }
        let row = NoteRecord {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            domain: record.domain,
            topics: record.topics,
            content: record.content,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list(&self, owner: Option<Uuid>) -> PortResult<Vec<NoteRecord>> {
        if self.fail_reads {
            return Err(PortError::Unexpected("store offline".to_string()));
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|r| r.user_id == owner).cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> PortResult<NoteRecord> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(id.to_string()))
    }
}

fn generator(llm: Arc<FakeLlm>, store: Arc<FakeStore>) -> NotesGenerator {
    NotesGenerator::new(llm, store)
}

#[tokio::test]
async fn blank_topics_fail_before_calling_the_model() {
    let llm = Arc::new(FakeLlm::replying(ONE_NOTE));
    let store = Arc::new(FakeStore::default());
    let service = generator(llm.clone(), store.clone());

    for input in ["", "   ", " , ,, "] {
        let result = service.generate(input, Domain::School, None, None).await;
        assert!(matches!(result, Err(GenerateError::Validation)));
    }
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    assert!(store.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn well_formed_reply_round_trips_into_the_result() {
    let llm = Arc::new(FakeLlm::replying(ONE_NOTE));
    let store = Arc::new(FakeStore::default());
    let service = generator(llm.clone(), store.clone());

    let generation = service
        .generate(" Photosynthesis , Respiration,", Domain::School, Some("Class 10"), None)
        .await
        .unwrap();

    let notes = &generation.notes;
    assert_eq!(notes.domain, Domain::School);
    assert_eq!(notes.sub_level.as_deref(), Some("Class 10"));
    assert_eq!(notes.topics, vec!["Photosynthesis", "Respiration"]);
    assert_eq!(notes.notes.len(), 1);

    let reply: Value = serde_json::from_str(ONE_NOTE).unwrap();
    let expected: Vec<TopicNote> = serde_json::from_value(reply["notes"].clone()).unwrap();
    assert_eq!(notes.notes, expected);
    assert_eq!(notes.notes[0].practice_questions[0].kind, QuestionType::Mcq);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn successful_generation_is_recorded_in_history() {
    let llm = Arc::new(FakeLlm::replying(ONE_NOTE));
    let store = Arc::new(FakeStore::default());
    let service = generator(llm, store.clone());
    let owner = Uuid::new_v4();

    let generation = service
        .generate("Photosynthesis", Domain::CompetitiveExam, Some("NEET"), Some(owner))
        .await
        .unwrap();

    let rows = store.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(Some(rows[0].id), generation.id);
    assert_eq!(rows[0].user_id, Some(owner));
    assert_eq!(rows[0].domain, "Competitive Exam - NEET");
    assert_eq!(rows[0].topics, "Photosynthesis");
    assert_eq!(rows[0].content, generation.notes);
}

#[tokio::test]
async fn invalid_json_is_a_parse_error_and_nothing_is_stored() {
    let llm = Arc::new(FakeLlm::replying("Sure! Here are your notes: ..."));
    let store = Arc::new(FakeStore::default());
    let service = generator(llm, store.clone());

    let result = service.generate("Optics", Domain::College, None, None).await;
    assert!(matches!(result, Err(GenerateError::Parse(_))));
    assert!(store.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn reply_without_notes_field_is_a_parse_error() {
    let llm = Arc::new(FakeLlm::replying(r#"{"chapters": []}"#));
    let service = generator(llm, Arc::new(FakeStore::default()));

    let result = service.generate("Optics", Domain::College, None, None).await;
    assert!(matches!(result, Err(GenerateError::Parse(_))));
}

#[tokio::test]
async fn provider_failure_is_distinct_from_parse_failure() {
    let llm = Arc::new(FakeLlm::failing());
    let store = Arc::new(FakeStore::default());
    let service = generator(llm, store.clone());

    let result = service.generate("Optics", Domain::College, None, None).await;
    assert!(matches!(result, Err(GenerateError::Provider(_))));
    assert!(store.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_history_write_does_not_change_the_result() {
    let healthy = generator(
        Arc::new(FakeLlm::replying(ONE_NOTE)),
        Arc::new(FakeStore::default()),
    );
    let broken = generator(
        Arc::new(FakeLlm::replying(ONE_NOTE)),
        Arc::new(FakeStore {
            fail_writes: true,
            ..Default::default()
        }),
    );

    let saved = healthy
        .generate("Photosynthesis", Domain::School, Some("Class 9"), None)
        .await
        .unwrap();
    let unsaved = broken
        .generate("Photosynthesis", Domain::School, Some("Class 9"), None)
        .await
        .unwrap();

    assert_eq!(saved.notes, unsaved.notes);
    assert!(saved.id.is_some());
    assert!(unsaved.id.is_none());
}

#[tokio::test]
async fn failed_history_read_degrades_to_empty() {
    let service = generator(
        Arc::new(FakeLlm::replying(ONE_NOTE)),
        Arc::new(FakeStore {
            fail_reads: true,
            ..Default::default()
        }),
    );
    assert!(service.history(None).await.is_empty());
}

#[tokio::test]
async fn lookup_of_unknown_id_is_not_found() {
    let service = generator(
        Arc::new(FakeLlm::replying(ONE_NOTE)),
        Arc::new(FakeStore::default()),
    );
    let result = service.get(Uuid::new_v4()).await;
    assert!(matches!(result, Err(PortError::NotFound(_))));
}

#[tokio::test]
async fn blank_sub_level_is_treated_as_absent() {
    let store = Arc::new(FakeStore::default());
    let service = generator(Arc::new(FakeLlm::replying(ONE_NOTE)), store.clone());

    let generation = service
        .generate("Photosynthesis", Domain::College, Some("  "), None)
        .await
        .unwrap();
    assert_eq!(generation.notes.sub_level, None);
    assert_eq!(store.rows.lock().unwrap()[0].domain, "College");
}
