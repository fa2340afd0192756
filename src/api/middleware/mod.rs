//! API middleware stack.

pub mod auth;
