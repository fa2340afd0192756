//! Draft persistence with a degraded fallback path.
//!
//! Drafts normally live in their own table, one row per owner. Stores that
//! predate that table take a draft-shaped assessment row instead, so autosave
//! keeps working across partially migrated databases.

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::{Assessment, AssessmentStatus, Draft, DraftStorage};

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Draft save requires an authenticated owner")]
    NotAuthenticated,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Reports which storage took the write.
#[derive(Debug, Clone, Serialize)]
pub struct SaveDraftOutcome {
    pub storage: DraftStorage,
}

/// Save questionnaire progress for an owner.
///
/// Idempotent per owner: one draft row, overwritten on every save. When the
/// drafts table is missing, the write degrades to a draft-status assessment
/// row with the deterministic id `draft-<owner>` carrying `{step, answers}`.
/// Any other storage error propagates.
pub fn save_draft(
    conn: &Connection,
    owner_id: Option<Uuid>,
    data: &serde_json::Value,
    step: i64,
) -> Result<SaveDraftOutcome, DraftError> {
    let owner_id = owner_id.ok_or(DraftError::NotAuthenticated)?;

    let draft = Draft {
        owner_id,
        data: data.clone(),
        step,
        updated_at: Utc::now(),
    };

    match repository::upsert_draft(conn, &draft) {
        Ok(()) => Ok(SaveDraftOutcome {
            storage: DraftStorage::Primary,
        }),
        Err(DatabaseError::SchemaMissing { table }) => {
            tracing::warn!(
                owner_id = %owner_id,
                table = %table,
                "Drafts table missing, saving draft as assessment row"
            );
            save_fallback_row(conn, &draft)?;
            Ok(SaveDraftOutcome {
                storage: DraftStorage::AssessmentFallback,
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn save_fallback_row(conn: &Connection, draft: &Draft) -> Result<(), DraftError> {
    let assessment = Assessment {
        id: format!("draft-{}", draft.owner_id),
        owner_id: draft.owner_id,
        created_at: draft.updated_at,
        pain_level: None,
        functional_score: 0,
        red_flag: false,
        region: None,
        chronicity: None,
        status: AssessmentStatus::Draft,
        data: json!({ "step": draft.step, "answers": draft.data }),
    };
    repository::upsert_assessment(conn, &assessment)?;
    Ok(())
}

/// Clear draft state for an owner after a final submission. Both stores are
/// cleared best-effort; failures are logged, never surfaced.
pub fn supersede_drafts(conn: &Connection, owner_id: Uuid) {
    if let Err(e) = repository::delete_draft(conn, &owner_id) {
        tracing::warn!(owner_id = %owner_id, error = %e, "Failed to delete draft row");
    }
    if let Err(e) = repository::delete_assessment(conn, &format!("draft-{owner_id}")) {
        tracing::warn!(owner_id = %owner_id, error = %e, "Failed to delete fallback draft row");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::{open_memory_database, run_migrations_up_to};

    fn setup_db() -> Connection {
        open_memory_database().expect("in-memory DB should open")
    }

    fn answers() -> serde_json::Value {
        json!({"consent": true, "pain_now": 4, "regions": ["neck"]})
    }

    #[test]
    fn save_uses_primary_storage() {
        let conn = setup_db();
        let owner = Uuid::new_v4();

        let outcome = save_draft(&conn, Some(owner), &answers(), 2).unwrap();
        assert_eq!(outcome.storage, DraftStorage::Primary);

        let draft = repository::get_draft(&conn, &owner).unwrap().unwrap();
        assert_eq!(draft.step, 2);
        assert_eq!(draft.data["pain_now"], 4);
    }

    #[test]
    fn no_owner_writes_nothing() {
        let conn = setup_db();

        let err = save_draft(&conn, None, &answers(), 1).unwrap_err();
        assert!(matches!(err, DraftError::NotAuthenticated));

        let drafts: i64 = conn
            .query_row("SELECT COUNT(*) FROM drafts", [], |r| r.get(0))
            .unwrap();
        let assessments: i64 = conn
            .query_row("SELECT COUNT(*) FROM assessments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(drafts, 0);
        assert_eq!(assessments, 0);
    }

    #[test]
    fn missing_drafts_table_falls_back_to_assessment_row() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations_up_to(&conn, 1).unwrap();
        let owner = Uuid::new_v4();

        let outcome = save_draft(&conn, Some(owner), &answers(), 3).unwrap();
        assert_eq!(outcome.storage, DraftStorage::AssessmentFallback);

        let row = repository::get_assessment(&conn, &format!("draft-{owner}"))
            .unwrap()
            .unwrap();
        assert_eq!(row.status, AssessmentStatus::Draft);
        assert_eq!(row.owner_id, owner);
        assert_eq!(row.data["step"], 3);
        assert_eq!(row.data["answers"]["pain_now"], 4);
    }

    #[test]
    fn fallback_row_overwrites_on_resave() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations_up_to(&conn, 1).unwrap();
        let owner = Uuid::new_v4();

        save_draft(&conn, Some(owner), &answers(), 1).unwrap();
        save_draft(&conn, Some(owner), &json!({"consent": true, "pain_now": 7}), 4).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM assessments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let row = repository::get_assessment(&conn, &format!("draft-{owner}"))
            .unwrap()
            .unwrap();
        assert_eq!(row.data["step"], 4);
        assert_eq!(row.data["answers"]["pain_now"], 7);
    }

    #[test]
    fn supersede_clears_both_stores() {
        let conn = setup_db();
        let owner = Uuid::new_v4();

        save_draft(&conn, Some(owner), &answers(), 2).unwrap();
        save_fallback_row(
            &conn,
            &Draft {
                owner_id: owner,
                data: answers(),
                step: 2,
                updated_at: Utc::now(),
            },
        )
        .unwrap();

        supersede_drafts(&conn, owner);

        assert!(repository::get_draft(&conn, &owner).unwrap().is_none());
        assert!(repository::get_assessment(&conn, &format!("draft-{owner}"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn supersede_tolerates_missing_tables() {
        let conn = Connection::open_in_memory().unwrap();
        supersede_drafts(&conn, Uuid::new_v4());
    }
}
