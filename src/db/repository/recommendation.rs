use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Recommendation, RecommendationSource};

pub fn insert_recommendation(
    conn: &Connection,
    rec: &Recommendation,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO recommendations (id, assessment_id, program, confidence, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            rec.id.to_string(),
            rec.assessment_id,
            rec.program.to_string(),
            rec.confidence,
            rec.source.as_str(),
            rec.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Recommendations for an assessment, newest first.
pub fn list_recommendations_by_assessment(
    conn: &Connection,
    assessment_id: &str,
) -> Result<Vec<Recommendation>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, assessment_id, program, confidence, source, created_at
         FROM recommendations
         WHERE assessment_id = ?1
         ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map(params![assessment_id], |row| {
        Ok(RecommendationRow {
            id: row.get(0)?,
            assessment_id: row.get(1)?,
            program: row.get(2)?,
            confidence: row.get(3)?,
            source: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;

    let mut recs = Vec::new();
    for row in rows {
        recs.push(recommendation_from_row(row?)?);
    }
    Ok(recs)
}

struct RecommendationRow {
    id: String,
    assessment_id: String,
    program: String,
    confidence: f64,
    source: String,
    created_at: String,
}

fn recommendation_from_row(row: RecommendationRow) -> Result<Recommendation, DatabaseError> {
    Ok(Recommendation {
        id: Uuid::parse_str(&row.id).unwrap_or_default(),
        assessment_id: row.assessment_id,
        program: serde_json::from_str(&row.program).unwrap_or(serde_json::Value::Null),
        confidence: row.confidence,
        source: RecommendationSource::from_str(&row.source)?,
        created_at: DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_assessment;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Assessment, AssessmentStatus};

    fn setup_with_assessment() -> (Connection, String) {
        let conn = open_memory_database().expect("in-memory DB should open");
        let assessment = Assessment {
            id: Uuid::new_v4().to_string(),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            pain_level: Some(4),
            functional_score: 1,
            red_flag: false,
            region: None,
            chronicity: None,
            status: AssessmentStatus::Final,
            data: serde_json::json!({}),
        };
        insert_assessment(&conn, &assessment).unwrap();
        (conn, assessment.id)
    }

    fn sample(assessment_id: &str, source: RecommendationSource) -> Recommendation {
        Recommendation {
            id: Uuid::new_v4(),
            assessment_id: assessment_id.to_string(),
            program: serde_json::json!({"title": "General Exercise Program"}),
            confidence: 0.85,
            source,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_and_list_round_trip() {
        let (conn, assessment_id) = setup_with_assessment();
        let rec = sample(&assessment_id, RecommendationSource::Ai);
        insert_recommendation(&conn, &rec).unwrap();

        let listed = list_recommendations_by_assessment(&conn, &assessment_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, rec.id);
        assert_eq!(listed[0].source, RecommendationSource::Ai);
        assert_eq!(listed[0].program["title"], "General Exercise Program");
    }

    #[test]
    fn resubmission_appends_newest_first() {
        let (conn, assessment_id) = setup_with_assessment();

        let mut first = sample(&assessment_id, RecommendationSource::Fallback);
        first.created_at = Utc::now() - chrono::Duration::minutes(5);
        insert_recommendation(&conn, &first).unwrap();

        let second = sample(&assessment_id, RecommendationSource::Ai);
        insert_recommendation(&conn, &second).unwrap();

        let listed = list_recommendations_by_assessment(&conn, &assessment_id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn list_empty_for_unknown_assessment() {
        let (conn, _) = setup_with_assessment();
        let listed = list_recommendations_by_assessment(&conn, "missing").unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn deleting_assessment_cascades() {
        let (conn, assessment_id) = setup_with_assessment();
        insert_recommendation(&conn, &sample(&assessment_id, RecommendationSource::Flagged))
            .unwrap();

        crate::db::repository::delete_assessment(&conn, &assessment_id).unwrap();
        let listed = list_recommendations_by_assessment(&conn, &assessment_id).unwrap();
        assert!(listed.is_empty());
    }
}
