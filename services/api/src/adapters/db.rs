//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `NoteRepository` and `AccountRepository` ports from the `core` crate. It
//! handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use study_notes_core::domain::{
    GeneratedNotes, NewNoteRecord, NoteRecord, User, UserCredentials, HISTORY_PAGE_SIZE,
};
use study_notes_core::ports::{AccountRepository, NoteRepository, PortError, PortResult};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the storage ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct NoteRow {
    id: Uuid,
    user_id: Option<Uuid>,
    domain: String,
    topics: String,
    content: Json<GeneratedNotes>,
    created_at: DateTime<Utc>,
}
impl NoteRow {
    fn to_domain(self) -> NoteRecord {
        NoteRecord {
            id: self.id,
            user_id: self.user_id,
            domain: self.domain,
            topics: self.topics,
            content: self.content.0,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    user_id: Uuid,
    email: Option<String>,
}
impl UserRow {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRow {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl CredentialsRow {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct AuthSessionRow {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

const NOTE_COLUMNS: &str = "id, user_id, domain, topics, content, created_at";

/// History listing for one owner, or for anonymous rows only. Both forms
/// filter on a plain predicate so `notes_user_created_idx` serves them.
/// The owner, when present, binds first; the limit binds last.
fn history_query(owner: Option<Uuid>) -> String {
    let filter = match owner {
        Some(_) => "user_id = $1 ORDER BY created_at DESC LIMIT $2",
        None => "user_id IS NULL ORDER BY created_at DESC LIMIT $1",
    };
    format!("SELECT {} FROM notes WHERE {}", NOTE_COLUMNS, filter)
}

//=========================================================================================
// `NoteRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl NoteRepository for DbAdapter {
    async fn save(&self, record: NewNoteRecord) -> PortResult<NoteRecord> {
        let row = sqlx::query_as::<_, NoteRow>(&format!(
            "INSERT INTO notes (user_id, domain, topics, content) VALUES ($1, $2, $3, $4) RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(record.user_id)
        .bind(record.domain)
        .bind(record.topics)
        .bind(Json(record.content))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(row.to_domain())
    }

    async fn list(&self, owner: Option<Uuid>) -> PortResult<Vec<NoteRecord>> {
        let sql = history_query(owner);
        let mut query = sqlx::query_as::<_, NoteRow>(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        let rows = query
            .bind(HISTORY_PAGE_SIZE as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> PortResult<NoteRecord> {
        let row = sqlx::query_as::<_, NoteRow>(&format!(
            "SELECT {} FROM notes WHERE id = $1",
            NOTE_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("Notes {} not found", id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(row.to_domain())
    }
}

//=========================================================================================
// `AccountRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl AccountRepository for DbAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (email, hashed_password) VALUES ($1, $2) RETURNING user_id, email",
        )
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                PortError::Conflict(format!("User {} already exists", email))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(row.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1 AND hashed_password IS NOT NULL",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(row.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            "SELECT user_id, expires_at FROM auth_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => PortError::Unexpected(e.to_string()),
        })?;

        if row.expires_at <= Utc::now() {
            return Err(PortError::Unauthorized);
        }
        Ok(row.user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = include_str!("../../migrations/20250101000000_initial_schema.sql");

    #[test]
    fn history_query_uses_plain_owner_predicates() {
        let owned = history_query(Some(Uuid::new_v4()));
        assert!(owned.contains("WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"));

        let anonymous = history_query(None);
        assert!(anonymous.contains("WHERE user_id IS NULL ORDER BY created_at DESC LIMIT $1"));
        assert!(!anonymous.contains("$2"));
    }

    #[test]
    fn deleting_a_user_removes_their_notes() {
        let notes_table = SCHEMA
            .split("CREATE TABLE")
            .find(|t| t.contains("IF NOT EXISTS notes"))
            .unwrap();
        assert!(notes_table.contains("REFERENCES users (user_id) ON DELETE CASCADE"));
        assert!(!SCHEMA.contains("SET NULL"));
    }
}
