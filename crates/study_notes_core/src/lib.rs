pub mod domain;
pub mod export;
pub mod generation;
pub mod ports;
pub mod prompt;
pub mod reveal;

pub use domain::{
    Definition, Domain, Example, GeneratedNotes, NewNoteRecord, NoteRecord, PracticeQuestion,
    QuestionType, Section, TopicNote, User, UserCredentials, HISTORY_PAGE_SIZE,
};
pub use generation::{GenerateError, Generation, NotesGenerator};
pub use ports::{AccountRepository, NoteGenerationService, NoteRepository, PortError, PortResult};
pub use reveal::SolutionView;
