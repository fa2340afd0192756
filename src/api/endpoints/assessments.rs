//! Assessment endpoints.
//!
//! - `POST /api/assessments` — submit a completed intake form
//! - `GET /api/assessments/:id` — fetch one assessment
//! - `GET /api/assessments/:id/recommendations` — recommendation history

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, OwnerContext};
use crate::db::repository;
use crate::models::{Assessment, IntakeForm, Recommendation};
use crate::pipeline::intake::{self, SubmissionOutcome};

/// `POST /api/assessments` — score, persist, and route a submission.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Extension(owner): Extension<OwnerContext>,
    Json(form): Json<IntakeForm>,
) -> Result<Json<SubmissionOutcome>, ApiError> {
    let state = Arc::clone(&ctx.state);
    let owner_id = owner.owner_id;

    let outcome = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let conn = state.open_db()?;
        Ok(intake::submit_assessment(
            &conn,
            &state.generator,
            Some(owner_id),
            &form,
        )?)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(outcome))
}

/// `GET /api/assessments/:id` — fetch one assessment.
///
/// Rows belonging to another owner read as absent, so ids cannot be
/// probed across accounts.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> Result<Json<Assessment>, ApiError> {
    let assessment = fetch_owned(&ctx, owner.owner_id, id).await?;
    Ok(Json(assessment))
}

/// `GET /api/assessments/:id/recommendations` — newest first.
pub async fn recommendations(
    State(ctx): State<ApiContext>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let assessment = fetch_owned(&ctx, owner.owner_id, id).await?;

    let state = Arc::clone(&ctx.state);
    let recs = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let conn = state.open_db()?;
        Ok(repository::list_recommendations_by_assessment(
            &conn,
            &assessment.id,
        )?)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(recs))
}

/// Load an assessment and verify it belongs to the requesting owner.
async fn fetch_owned(
    ctx: &ApiContext,
    owner_id: uuid::Uuid,
    id: String,
) -> Result<Assessment, ApiError> {
    let state = Arc::clone(&ctx.state);

    let assessment = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let conn = state.open_db()?;
        Ok(repository::get_assessment(&conn, &id)?)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    match assessment {
        Some(a) if a.owner_id == owner_id => Ok(a),
        _ => Err(ApiError::NotFound("Assessment not found".into())),
    }
}
