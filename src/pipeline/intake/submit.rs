//! Submission orchestrator.
//!
//! Single entry point that drives a final questionnaire submission:
//! validate → score → persist → safety gate → program generation.
//!
//! Red-flagged submissions stop at the gate and are routed to clinician
//! review; the model is never consulted for them.

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::{
    Assessment, AssessmentStatus, Disposition, IntakeForm, Recommendation, RecommendationSource,
};
use crate::pipeline::intake::drafts;
use crate::pipeline::mapping::map_signals;
use crate::pipeline::program::generator::{
    ProgramGenerator, AI_CONFIDENCE, FALLBACK_CONFIDENCE, FLAGGED_CONFIDENCE,
};
use crate::pipeline::program::types::{AssessmentData, ExerciseProgram};
use crate::pipeline::scoring::score;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Consent is required to submit an assessment")]
    ConsentRequired,

    #[error("{field} must be an integer between 0 and 10")]
    PainOutOfRange { field: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Submission requires an authenticated owner")]
    NotAuthenticated,

    #[error("Invalid submission: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Summary returned to the client after a final submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub assessment_id: String,
    /// False when the assessment store was missing and the result only
    /// lives in the response.
    pub persisted: bool,
    pub outcome: Disposition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_program: Option<ExerciseProgram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fallback: Option<bool>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Run a final submission end to end.
///
/// 1. Reject unauthenticated callers; nothing is written.
/// 2. Validate consent and pain ranges.
/// 3. Score and insert the immutable final assessment. A missing assessment
///    store degrades the submission: the id gains a `local-` prefix and no
///    further write is attempted.
/// 4. Supersede any draft state.
/// 5. Gate on red flags: flagged submissions record a flagged
///    recommendation and go to clinician review without any model call.
/// 6. Otherwise map clinical signals, generate the program, and record the
///    recommendation with its source and confidence.
pub fn submit_assessment(
    conn: &Connection,
    generator: &ProgramGenerator,
    owner_id: Option<Uuid>,
    form: &IntakeForm,
) -> Result<SubmissionOutcome, SubmitError> {
    let owner_id = owner_id.ok_or(SubmitError::NotAuthenticated)?;
    validate(form)?;

    let scores = score(form);

    let mut assessment = Assessment {
        id: Uuid::new_v4().to_string(),
        owner_id,
        created_at: Utc::now(),
        pain_level: scores.pain_level,
        functional_score: scores.functional_score,
        red_flag: scores.red_flag,
        region: scores.region.clone(),
        chronicity: scores.chronicity.clone(),
        status: AssessmentStatus::Final,
        data: serde_json::to_value(form).unwrap_or(serde_json::Value::Null),
    };

    let persisted = match repository::insert_assessment(conn, &assessment) {
        Ok(()) => true,
        Err(DatabaseError::SchemaMissing { table }) => {
            tracing::warn!(
                table = %table,
                "Assessment store missing, submission will not persist"
            );
            assessment.id = format!("local-{}", assessment.id);
            false
        }
        Err(e) => return Err(e.into()),
    };

    if persisted {
        drafts::supersede_drafts(conn, owner_id);
    }

    if scores.red_flag {
        if persisted {
            persist_recommendation(
                conn,
                &assessment.id,
                json!({"flagged": true, "reason": "red_flag"}),
                FLAGGED_CONFIDENCE,
                RecommendationSource::Flagged,
            )?;
        }
        tracing::info!(
            assessment_id = %assessment.id,
            "Red flag present, routing to clinician review"
        );
        return Ok(SubmissionOutcome {
            assessment_id: assessment.id,
            persisted,
            outcome: Disposition::ClinicianReview,
            exercise_program: None,
            is_fallback: None,
        });
    }

    let data = AssessmentData {
        health_data: scores,
        questionnaire_answers: form.clone(),
        ai_mapping: map_signals(form),
        has_video: false,
    };
    let generation = generator.generate(&data);

    if persisted {
        let (confidence, source) = if generation.is_fallback {
            (FALLBACK_CONFIDENCE, RecommendationSource::Fallback)
        } else {
            (AI_CONFIDENCE, RecommendationSource::Ai)
        };
        let program_json =
            serde_json::to_value(&generation.program).unwrap_or(serde_json::Value::Null);
        persist_recommendation(conn, &assessment.id, program_json, confidence, source)?;
    }

    Ok(SubmissionOutcome {
        assessment_id: assessment.id,
        persisted,
        outcome: Disposition::Program,
        exercise_program: Some(generation.program),
        is_fallback: Some(generation.is_fallback),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate(form: &IntakeForm) -> Result<(), ValidationError> {
    if !form.consent {
        return Err(ValidationError::ConsentRequired);
    }
    check_pain_range("pain_now", form.pain_now)?;
    check_pain_range("pain_week", form.pain_week)?;
    Ok(())
}

fn check_pain_range(field: &'static str, value: Option<i64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !(0..=10).contains(&v) => Err(ValidationError::PainOutOfRange { field }),
        _ => Ok(()),
    }
}

fn persist_recommendation(
    conn: &Connection,
    assessment_id: &str,
    program: serde_json::Value,
    confidence: f64,
    source: RecommendationSource,
) -> Result<(), SubmitError> {
    let recommendation = Recommendation {
        id: Uuid::new_v4(),
        assessment_id: assessment_id.to_string(),
        program,
        confidence,
        source,
        created_at: Utc::now(),
    };
    repository::insert_recommendation(conn, &recommendation)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
