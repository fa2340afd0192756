//! Exercise program generation endpoint.
//!
//! The one route whose failure mode is a payload, not a status code:
//! clients always receive HTTP 200 with a program, and degradation is
//! visible only through `isFallback` and `error`.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{Recommendation, RecommendationSource};
use crate::pipeline::program::{
    fallback_program, AssessmentData, ExerciseProgram, GenerationOutcome, AI_CONFIDENCE,
    FALLBACK_CONFIDENCE,
};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    #[serde(rename = "assessmentData")]
    pub assessment_data: AssessmentData,
    #[serde(rename = "assessmentId")]
    pub assessment_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(rename = "exerciseProgram")]
    pub exercise_program: ExerciseProgram,
    #[serde(rename = "isFallback")]
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /api/programs/generate` — generate a program for one assessment.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Json(req): Json<GenerateRequest>,
) -> Json<GenerateResponse> {
    let state = Arc::clone(&ctx.state);

    let result = tokio::task::spawn_blocking(move || {
        let outcome = state.generator.generate(&req.assessment_data);
        if let Some(assessment_id) = req.assessment_id.as_deref() {
            persist_outcome(&state, assessment_id, &outcome);
        }
        outcome
    })
    .await;

    match result {
        Ok(outcome) => Json(GenerateResponse {
            exercise_program: outcome.program,
            is_fallback: outcome.is_fallback,
            error: outcome.error,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Program generation task failed");
            Json(GenerateResponse {
                exercise_program: fallback_program(),
                is_fallback: true,
                error: Some(e.to_string()),
            })
        }
    }
}

/// Record the outcome against its assessment. Failures are logged and
/// swallowed so a storage problem never costs the patient their program.
fn persist_outcome(state: &AppState, assessment_id: &str, outcome: &GenerationOutcome) {
    let (confidence, source) = if outcome.is_fallback {
        (FALLBACK_CONFIDENCE, RecommendationSource::Fallback)
    } else {
        (AI_CONFIDENCE, RecommendationSource::Ai)
    };

    let rec = Recommendation {
        id: Uuid::new_v4(),
        assessment_id: assessment_id.to_string(),
        program: serde_json::to_value(&outcome.program).unwrap_or(serde_json::Value::Null),
        confidence,
        source,
        created_at: Utc::now(),
    };

    let result = state
        .open_db()
        .and_then(|conn| repository::insert_recommendation(&conn, &rec));
    if let Err(e) = result {
        tracing::warn!(
            assessment_id = %assessment_id,
            error = %e,
            "Failed to persist recommendation"
        );
    }
}
