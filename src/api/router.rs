//! HTTP API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`; everything except `/api/health` sits
//! behind bearer-token auth.
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost
//! layer). Endpoint handlers use `State<ApiContext>` (via `with_state`).

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::state::AppState;

/// Build the API router around shared application state.
pub fn api_router(state: Arc<AppState>) -> Router {
    let ctx = ApiContext::new(state);
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route("/drafts", post(endpoints::drafts::save))
        .route("/assessments", post(endpoints::assessments::submit))
        .route("/assessments/:id", get(endpoints::assessments::detail))
        .route(
            "/assessments/:id/recommendations",
            get(endpoints::assessments::recommendations),
        )
        .route("/programs/generate", post(endpoints::programs::generate))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so the middleware can extract ApiContext
        .layer(axum::Extension(ctx.clone()));

    let unprotected = Router::new()
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    // The questionnaire runs in a browser served from a different origin
    // than the API during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", protected)
        .nest("/api", unprotected)
        .layer(cors)
}
