use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct EmployeeCreateDBRequest {
    pub name: String,
    pub hourly_rate: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct EmployeeDBResponse {
    pub name: String,
    pub hourly_rate: Decimal,
}
