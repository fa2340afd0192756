//! Draft save endpoint.
//!
//! One endpoint, two modes:
//! - blocking: persist now and report which store took the write
//! - background: enqueue a debounced save and return immediately

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, OwnerContext};
use crate::models::DraftStorage;
use crate::pipeline::intake;

#[derive(Deserialize)]
pub struct SaveDraftRequest {
    /// Partial questionnaire answers, opaque to the server.
    pub data: serde_json::Value,
    #[serde(default)]
    pub step: i64,
    #[serde(default)]
    pub background: bool,
}

#[derive(Serialize)]
pub struct SaveDraftResponse {
    pub saved: bool,
    pub storage: DraftStorage,
}

#[derive(Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// `POST /api/drafts` — save questionnaire progress.
///
/// Consent gates every stored byte. A blocking save without consent is
/// rejected; a background save without consent is acknowledged and
/// dropped, because autosave fires mid-form before the consent box is
/// reachable.
pub async fn save(
    State(ctx): State<ApiContext>,
    Extension(owner): Extension<OwnerContext>,
    Json(req): Json<SaveDraftRequest>,
) -> Result<Response, ApiError> {
    let consented = req
        .data
        .get("consent")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if req.background {
        if !consented {
            tracing::debug!(
                owner_id = %owner.owner_id,
                "Dropping background draft save without consent"
            );
            return Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: false }))
                .into_response());
        }
        ctx.state
            .autosave
            .schedule(owner.owner_id, req.data, req.step)
            .await;
        return Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })).into_response());
    }

    if !consented {
        return Err(ApiError::ConsentRequired);
    }

    let state = Arc::clone(&ctx.state);
    let owner_id = owner.owner_id;
    let outcome = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let conn = state.open_db()?;
        Ok(intake::save_draft(&conn, Some(owner_id), &req.data, req.step)?)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(SaveDraftResponse {
        saved: true,
        storage: outcome.storage,
    })
    .into_response())
}
