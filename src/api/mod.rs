//! HTTP API layer.
//!
//! Exposes the intake pipeline as REST endpoints for the questionnaire
//! client. Routes are nested under `/api/` and protected by bearer-token
//! auth, except the health check.
//!
//! The router is composable — `api_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
