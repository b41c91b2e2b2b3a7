use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Request to record a finalized document. The per-month document number is
/// assigned by the recorder, not the caller.
#[derive(Debug, Clone)]
pub struct ReadyDocumentCreateDBRequest {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub legal_entities: String,
    pub signatories: String,
    pub link: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReadyDocumentDBResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub legal_entities: String,
    pub signatories: String,
    pub link: String,
    pub document_number: i32,
}
