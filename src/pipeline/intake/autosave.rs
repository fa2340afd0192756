//! Debounced background draft saves.
//!
//! Change-driven saves coalesce server-side: each schedule bumps a per-owner
//! generation counter and the write fires only when no newer schedule arrived
//! during the debounce window. Fired saves run on blocking threads; failures
//! are logged, never surfaced.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::sqlite::open_database;
use crate::pipeline::intake::drafts::save_draft;

/// Quiet window after the last change before a scheduled save fires.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 800;

#[derive(Clone)]
pub struct AutosaveQueue {
    db_path: PathBuf,
    delay: Duration,
    generations: Arc<Mutex<HashMap<Uuid, u64>>>,
}

impl AutosaveQueue {
    pub fn new(db_path: PathBuf) -> Self {
        Self::with_delay(db_path, Duration::from_millis(AUTOSAVE_DEBOUNCE_MS))
    }

    /// Queue with a custom debounce window. Tests shorten it.
    pub fn with_delay(db_path: PathBuf, delay: Duration) -> Self {
        Self {
            db_path,
            delay,
            generations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Schedule a best-effort save of the owner's questionnaire progress.
    ///
    /// Returns immediately. The save runs after the debounce window unless a
    /// newer schedule for the same owner supersedes it first.
    pub async fn schedule(&self, owner_id: Uuid, data: serde_json::Value, step: i64) {
        let my_generation = {
            let mut generations = self.generations.lock().await;
            let counter = generations.entry(owner_id).or_insert(0);
            *counter += 1;
            *counter
        };

        let generations = Arc::clone(&self.generations);
        let db_path = self.db_path.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // A newer change owns the save now.
            if generations.lock().await.get(&owner_id).copied() != Some(my_generation) {
                return;
            }

            let result = tokio::task::spawn_blocking(move || {
                let conn = open_database(&db_path)?;
                save_draft(&conn, Some(owner_id), &data, step)
            })
            .await;

            match result {
                Ok(Ok(outcome)) => tracing::debug!(
                    owner_id = %owner_id,
                    storage = outcome.storage.as_str(),
                    "Autosaved draft"
                ),
                Ok(Err(e)) => {
                    tracing::warn!(owner_id = %owner_id, error = %e, "Autosave failed")
                }
                Err(e) => {
                    tracing::warn!(owner_id = %owner_id, error = %e, "Autosave task failed")
                }
            }
        });
    }
}
