use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Assessment, AssessmentStatus};

pub fn insert_assessment(conn: &Connection, assessment: &Assessment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO assessments
         (id, owner_id, created_at, pain_level, functional_score, red_flag,
          region, chronicity, status, data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            assessment.id,
            assessment.owner_id.to_string(),
            assessment.created_at.to_rfc3339(),
            assessment.pain_level,
            assessment.functional_score,
            assessment.red_flag as i32,
            assessment.region,
            assessment.chronicity,
            assessment.status.as_str(),
            assessment.data.to_string(),
        ],
    )?;
    Ok(())
}

/// Insert or overwrite by id. Used for draft-shaped rows, which keep a
/// deterministic id and are rewritten on every save.
pub fn upsert_assessment(conn: &Connection, assessment: &Assessment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO assessments
         (id, owner_id, created_at, pain_level, functional_score, red_flag,
          region, chronicity, status, data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
             created_at = excluded.created_at,
             pain_level = excluded.pain_level,
             functional_score = excluded.functional_score,
             red_flag = excluded.red_flag,
             region = excluded.region,
             chronicity = excluded.chronicity,
             status = excluded.status,
             data = excluded.data",
        params![
            assessment.id,
            assessment.owner_id.to_string(),
            assessment.created_at.to_rfc3339(),
            assessment.pain_level,
            assessment.functional_score,
            assessment.red_flag as i32,
            assessment.region,
            assessment.chronicity,
            assessment.status.as_str(),
            assessment.data.to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_assessment(conn: &Connection, id: &str) -> Result<Option<Assessment>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, owner_id, created_at, pain_level, functional_score, red_flag,
                region, chronicity, status, data
         FROM assessments WHERE id = ?1",
        params![id],
        read_row,
    );

    match result {
        Ok(row) => Ok(Some(assessment_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_assessment(conn: &Connection, id: &str) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM assessments WHERE id = ?1", params![id])?;
    Ok(())
}

struct AssessmentRow {
    id: String,
    owner_id: String,
    created_at: String,
    pain_level: Option<u8>,
    functional_score: u8,
    red_flag: i32,
    region: Option<String>,
    chronicity: Option<String>,
    status: String,
    data: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AssessmentRow> {
    Ok(AssessmentRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        created_at: row.get(2)?,
        pain_level: row.get(3)?,
        functional_score: row.get(4)?,
        red_flag: row.get(5)?,
        region: row.get(6)?,
        chronicity: row.get(7)?,
        status: row.get(8)?,
        data: row.get(9)?,
    })
}

fn assessment_from_row(row: AssessmentRow) -> Result<Assessment, DatabaseError> {
    Ok(Assessment {
        id: row.id,
        owner_id: Uuid::parse_str(&row.owner_id).unwrap_or_default(),
        created_at: DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default(),
        pain_level: row.pain_level,
        functional_score: row.functional_score,
        red_flag: row.red_flag != 0,
        region: row.region,
        chronicity: row.chronicity,
        status: AssessmentStatus::from_str(&row.status)?,
        data: serde_json::from_str(&row.data).unwrap_or(serde_json::Value::Null),
    })
}
