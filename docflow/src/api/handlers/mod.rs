//! HTTP endpoint handlers.

pub mod auth;
pub mod documents;
pub mod payroll;
pub mod templates;
