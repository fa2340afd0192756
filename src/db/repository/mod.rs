//! Repository layer: entity-scoped database operations.
//!
//! All public functions are re-exported here, so callers use
//! `db::insert_assessment(conn, ...)` without naming sub-modules.

mod assessment;
mod draft;
mod recommendation;

pub use assessment::*;
pub use draft::*;
pub use recommendation::*;
