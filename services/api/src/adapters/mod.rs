pub mod db;
pub mod memory;
pub mod notes_llm;

pub use db::DbAdapter;
pub use memory::InMemoryNoteStore;
pub use notes_llm::OpenAiNotesAdapter;
