//! API request/response models.

pub mod auth;
pub mod documents;
pub mod payroll;
pub mod templates;
