//! crates/study_notes_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{NewNoteRecord, NoteRecord, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait NoteGenerationService: Send + Sync {
    /// Sends a prompt to the model, asking for a JSON-formatted reply,
    /// and returns the raw reply text.
    async fn generate_json(&self, prompt: &str) -> PortResult<String>;
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Inserts one history entry and returns it with its assigned id and timestamp.
    async fn save(&self, record: NewNoteRecord) -> PortResult<NoteRecord>;

    /// Returns the most recent entries, newest first, at most
    /// [`HISTORY_PAGE_SIZE`](crate::domain::HISTORY_PAGE_SIZE) of them.
    /// `Some(owner)` lists that owner's entries; `None` lists anonymous entries only.
    async fn list(&self, owner: Option<Uuid>) -> PortResult<Vec<NoteRecord>>;

    /// Fails with [`PortError::NotFound`] when no entry has this id.
    async fn get_by_id(&self, id: Uuid) -> PortResult<NoteRecord>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fails with [`PortError::Conflict`] when the email is already registered.
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owning user for a live session, `Unauthorized` for an expired one.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}
