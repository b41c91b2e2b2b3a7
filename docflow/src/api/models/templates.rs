//! API request/response models for template resolution and registration.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateQuery {
    /// Raw document type; normalized through the synonym table
    pub document_type: String,
    pub company_name: String,
    /// Used to register or refresh the company's director on a lookup miss
    #[serde(default)]
    pub director_name: Option<String>,
}

/// Outcome of a template lookup: either the stored link, or a registration
/// message when no template exists yet for the (company, type) pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TemplateLookupResponse {
    Found { template_link: String },
    NotFound { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateCreatedResponse {
    pub id: i64,
    pub link: String,
    pub message: String,
}
