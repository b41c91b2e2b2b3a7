//! Database request/response models, separate from the API DTOs.

pub mod employees;
pub mod ready_documents;
pub mod templates;
pub mod users;
