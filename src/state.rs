//! Shared application state.
//!
//! One `AppState` is built at startup and wrapped in `Arc` so the axum
//! handlers and background save tasks share the same instance. SQLite
//! connections are not pooled: every operation opens a fresh connection
//! from the stored path, which keeps handlers free of lock contention
//! and lets the blocking pool own each connection end to end.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;
use uuid::Uuid;

use crate::api::types::{generate_token, hash_token};
use crate::config::ModelConfig;
use crate::db::sqlite::open_database;
use crate::db::DatabaseError;
use crate::pipeline::intake::AutosaveQueue;
use crate::pipeline::program::ProgramGenerator;

/// Shared state behind every request handler.
pub struct AppState {
    /// Path to the SQLite database. Connections are opened per operation.
    db_path: PathBuf,
    /// Exercise program generator, configured once from the environment.
    pub generator: ProgramGenerator,
    /// Debounced background draft writer.
    pub autosave: AutosaveQueue,
    /// Session tokens, keyed by SHA-256 digest. Raw tokens are never stored.
    sessions: Mutex<HashMap<[u8; 32], Uuid>>,
}

impl AppState {
    pub fn new(db_path: PathBuf, model_config: &ModelConfig) -> Self {
        let generator = ProgramGenerator::from_config(model_config);
        Self::with_generator(db_path, generator)
    }

    /// Build state around a caller-supplied generator. Lets tests inject a
    /// mock model client.
    pub fn with_generator(db_path: PathBuf, generator: ProgramGenerator) -> Self {
        let autosave = AutosaveQueue::new(db_path.clone());
        Self {
            db_path,
            generator,
            autosave,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Open a fresh connection to the application database, running any
    /// pending migrations.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        open_database(&self.db_path)
    }

    /// Issue a bearer token for an owner and return it. Only the token's
    /// digest is kept in memory, so the returned string is the one chance
    /// to hand it to the client.
    pub fn issue_session(&self, owner_id: Uuid) -> String {
        let token = generate_token();
        self.sessions_lock().insert(hash_token(&token), owner_id);
        token
    }

    /// Resolve a bearer token to the owner it was issued for.
    pub fn authenticate(&self, token: &str) -> Option<Uuid> {
        self.sessions_lock().get(&hash_token(token)).copied()
    }

    /// Revoke a single session token.
    pub fn revoke_session(&self, token: &str) -> bool {
        self.sessions_lock().remove(&hash_token(token)).is_some()
    }

    fn sessions_lock(&self) -> MutexGuard<'_, HashMap<[u8; 32], Uuid>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db");
        let state = AppState::new(db_path, &ModelConfig::unconfigured());
        (dir, state)
    }

    #[test]
    fn issued_token_authenticates() {
        let (_dir, state) = test_state();
        let owner = Uuid::new_v4();

        let token = state.issue_session(owner);
        assert_eq!(state.authenticate(&token), Some(owner));
    }

    #[test]
    fn unknown_token_is_rejected() {
        let (_dir, state) = test_state();
        state.issue_session(Uuid::new_v4());

        assert_eq!(state.authenticate("not-a-real-token"), None);
    }

    #[test]
    fn tokens_are_unique_per_session() {
        let (_dir, state) = test_state();
        let owner = Uuid::new_v4();

        let first = state.issue_session(owner);
        let second = state.issue_session(owner);
        assert_ne!(first, second);

        // Both remain valid until revoked.
        assert_eq!(state.authenticate(&first), Some(owner));
        assert_eq!(state.authenticate(&second), Some(owner));
    }

    #[test]
    fn revoked_token_stops_authenticating() {
        let (_dir, state) = test_state();
        let owner = Uuid::new_v4();

        let token = state.issue_session(owner);
        assert!(state.revoke_session(&token));
        assert_eq!(state.authenticate(&token), None);
        assert!(!state.revoke_session(&token));
    }

    #[test]
    fn open_db_creates_and_migrates() {
        let (_dir, state) = test_state();
        let conn = state.open_db().unwrap();
        let tables = crate::db::sqlite::count_tables(&conn).unwrap();
        assert!(tables >= 4, "Expected a migrated schema, got {tables} tables");
    }
}
