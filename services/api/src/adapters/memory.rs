//! services/api/src/adapters/memory.rs
//!
//! A process-local store implementing the same ports as `DbAdapter`. It backs
//! the service when no database is configured; history is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use study_notes_core::domain::{
    NewNoteRecord, NoteRecord, User, UserCredentials, HISTORY_PAGE_SIZE,
};
use study_notes_core::ports::{AccountRepository, NoteRepository, PortError, PortResult};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    /// Kept in insertion order, which is also `created_at` order.
    notes: Vec<NoteRecord>,
    users: HashMap<String, UserCredentials>,
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
}

#[derive(Default)]
pub struct InMemoryNoteStore {
    tables: RwLock<Tables>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteStore {
    async fn save(&self, record: NewNoteRecord) -> PortResult<NoteRecord> {
        let mut tables = self.tables.write().await;

        // Timestamps stay strictly increasing even when the clock does not.
        let now = Utc::now();
        let created_at = match tables.notes.last() {
            Some(last) if last.created_at >= now => last.created_at + Duration::microseconds(1),
            _ => now,
        };

        let row = NoteRecord {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            domain: record.domain,
            topics: record.topics,
            content: record.content,
            created_at,
        };
        tables.notes.push(row.clone());
        Ok(row)
    }

    async fn list(&self, owner: Option<Uuid>) -> PortResult<Vec<NoteRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .rev()
            .filter(|r| r.user_id == owner)
            .take(HISTORY_PAGE_SIZE)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> PortResult<NoteRecord> {
        let tables = self.tables.read().await;
        tables
            .notes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Notes {} not found", id)))
    }
}

#[async_trait]
impl AccountRepository for InMemoryNoteStore {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(email) {
            return Err(PortError::Conflict(format!("User {} already exists", email)));
        }
        let user_id = Uuid::new_v4();
        tables.users.insert(
            email.to_string(),
            UserCredentials {
                user_id,
                email: email.to_string(),
                hashed_password: hashed_password.to_string(),
            },
        );
        Ok(User {
            user_id,
            email: Some(email.to_string()),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .sessions
            .insert(session_id.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let tables = self.tables.read().await;
        match tables.sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at > Utc::now() => Ok(*user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables.sessions.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_notes_core::domain::{Domain, GeneratedNotes};

    fn record(owner: Option<Uuid>, topics: &str) -> NewNoteRecord {
        NewNoteRecord {
            user_id: owner,
            domain: "School".to_string(),
            topics: topics.to_string(),
            content: GeneratedNotes {
                domain: Domain::School,
                sub_level: None,
                topics: vec![topics.to_string()],
                notes: Vec::new(),
            },
        }
    }

    #[tokio::test]
    async fn anonymous_and_owned_history_never_mix() {
        let store = InMemoryNoteStore::new();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        store.save(record(None, "anon")).await.unwrap();
        store.save(record(Some(u1), "mine")).await.unwrap();
        store.save(record(Some(u2), "theirs")).await.unwrap();

        let anonymous = store.list(None).await.unwrap();
        assert_eq!(anonymous.len(), 1);
        assert!(anonymous.iter().all(|r| r.user_id.is_none()));

        let owned = store.list(Some(u1)).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert!(owned.iter().all(|r| r.user_id == Some(u1)));
    }

    #[tokio::test]
    async fn list_is_capped_and_newest_first() {
        let store = InMemoryNoteStore::new();
        for i in 0..15 {
            store.save(record(None, &format!("topic {}", i))).await.unwrap();
        }

        let rows = store.list(None).await.unwrap();
        assert_eq!(rows.len(), HISTORY_PAGE_SIZE);
        assert_eq!(rows[0].topics, "topic 14");
        assert!(rows.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }

    #[tokio::test]
    async fn get_by_id_distinguishes_missing_rows() {
        let store = InMemoryNoteStore::new();
        let saved = store.save(record(None, "kept")).await.unwrap();

        assert_eq!(store.get_by_id(saved.id).await.unwrap().topics, "kept");
        assert!(matches!(
            store.get_by_id(Uuid::new_v4()).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected() {
        let store = InMemoryNoteStore::new();
        let user = Uuid::new_v4();
        store
            .create_auth_session("live", user, Utc::now() + Duration::days(1))
            .await
            .unwrap();
        store
            .create_auth_session("stale", user, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert_eq!(store.validate_auth_session("live").await.unwrap(), user);
        assert!(matches!(
            store.validate_auth_session("stale").await,
            Err(PortError::Unauthorized)
        ));

        store.delete_auth_session("live").await.unwrap();
        assert!(store.validate_auth_session("live").await.is_err());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryNoteStore::new();
        store.create_user_with_email("a@b.c", "hash").await.unwrap();
        assert!(matches!(
            store.create_user_with_email("a@b.c", "other").await,
            Err(PortError::Conflict(_))
        ));
    }
}
