//! API request/response models for payroll helpers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalaryRequest {
    pub employee: String,
    #[schema(value_type = f64)]
    pub hours: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalaryBreakdown {
    pub employee: String,
    #[schema(value_type = f64)]
    pub salary_before_vat: Decimal,
    #[schema(value_type = f64)]
    pub vat_rate: Decimal,
    #[schema(value_type = f64)]
    pub vat_amount: Decimal,
    #[schema(value_type = f64)]
    pub salary_with_vat: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkingDaysRequest {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkingDaysResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
