//! API request/response models for document processing and recording.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessDocumentRequest {
    /// Link returned by `/get_template`
    pub template_path: String,
    /// Literal placeholder strings mapped to their replacement values
    pub placeholders: HashMap<String, String>,
    /// Document amount, recorded with the ready-document row
    #[serde(default)]
    #[schema(value_type = f64)]
    pub sum: Decimal,
    #[serde(rename = "legalEntities")]
    pub legal_entities: String,
    pub signatories: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessedDocumentResponse {
    /// Filled document, base64-encoded
    pub document: String,
    /// Sequential number within the document's calendar month
    pub document_number: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignedDocumentResponse {
    pub message: String,
    pub document_number: i32,
    /// Stored location of the uploaded file
    pub link: String,
}
