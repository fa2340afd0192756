use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Draft;

/// Upsert the single draft row for an owner. Fails with `SchemaMissing`
/// on databases that predate the drafts table; callers decide the fallback.
pub fn upsert_draft(conn: &Connection, draft: &Draft) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO drafts (owner_id, data, step, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(owner_id) DO UPDATE SET
             data = excluded.data,
             step = excluded.step,
             updated_at = excluded.updated_at",
        params![
            draft.owner_id.to_string(),
            draft.data.to_string(),
            draft.step,
            draft.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_draft(conn: &Connection, owner_id: &Uuid) -> Result<Option<Draft>, DatabaseError> {
    let result = conn.query_row(
        "SELECT owner_id, data, step, updated_at FROM drafts WHERE owner_id = ?1",
        params![owner_id.to_string()],
        |row| {
            Ok(DraftRow {
                owner_id: row.get(0)?,
                data: row.get(1)?,
                step: row.get(2)?,
                updated_at: row.get(3)?,
            })
        },
    );

    match result {
        Ok(row) => Ok(Some(draft_from_row(row))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_draft(conn: &Connection, owner_id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM drafts WHERE owner_id = ?1",
        params![owner_id.to_string()],
    )?;
    Ok(())
}

struct DraftRow {
    owner_id: String,
    data: String,
    step: i64,
    updated_at: String,
}

fn draft_from_row(row: DraftRow) -> Draft {
    Draft {
        owner_id: Uuid::parse_str(&row.owner_id).unwrap_or_default(),
        data: serde_json::from_str(&row.data).unwrap_or(serde_json::Value::Null),
        step: row.step,
        updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default(),
    }
}
