//! API endpoint handlers.
//!
//! Each module corresponds to one resource of the intake service.

pub mod assessments;
pub mod drafts;
pub mod health;
pub mod programs;
