//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-request identity.

use std::sync::Arc;

use study_notes_core::ports::AccountRepository;
use study_notes_core::NotesGenerator;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: NotesGenerator,
    pub accounts: Arc<dyn AccountRepository>,
}

//=========================================================================================
// CurrentUser (Specific to One Request)
//=========================================================================================

/// The signed-in user for this request, or `None` for anonymous use.
/// Anonymous requests are fully supported and share one public history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurrentUser(pub Option<Uuid>);
