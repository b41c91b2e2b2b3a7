use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::payroll::{SalaryBreakdown, SalaryRequest, WorkingDaysRequest, WorkingDaysResponse},
    db::handlers::{Employees, Repository, Settings},
    errors::{Error, Result},
    workdays,
};

/// Compute an employee's salary with VAT
#[utoipa::path(
    post,
    path = "/calculate_salary",
    request_body = SalaryRequest,
    tag = "payroll",
    responses(
        (status = 200, description = "Salary breakdown", body = SalaryBreakdown),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Unknown employee"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn calculate_salary(
    State(state): State<AppState>,
    Json(request): Json<SalaryRequest>,
) -> Result<Json<SalaryBreakdown>> {
    if request.hours.is_sign_negative() {
        return Err(Error::BadRequest {
            message: "Hours must not be negative".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let employee = Employees::new(&mut conn)
        .get_by_id(request.employee.clone())
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Employee".to_string(),
            id: request.employee.clone(),
        })?;

    let vat_rate = Settings::new(&mut conn)
        .vat_rate(state.config.payroll.default_vat_rate)
        .await?;

    let salary_before_vat = employee.hourly_rate * request.hours;
    let vat_amount = salary_before_vat * vat_rate;

    Ok(Json(SalaryBreakdown {
        employee: employee.name,
        salary_before_vat,
        vat_rate,
        vat_amount,
        salary_with_vat: salary_before_vat + vat_amount,
    }))
}

/// First and last working day of a month
#[utoipa::path(
    post,
    path = "/working_days",
    request_body = WorkingDaysRequest,
    tag = "payroll",
    responses(
        (status = 200, description = "Working-day range", body = WorkingDaysResponse),
        (status = 400, description = "Month outside 1-12"),
        (status = 404, description = "Month has no working days"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn working_days(Json(request): Json<WorkingDaysRequest>) -> Result<Json<WorkingDaysResponse>> {
    if !(1..=12).contains(&request.month) {
        return Err(Error::BadRequest {
            message: format!("Invalid month {}, expected 1-12", request.month),
        });
    }

    let (start_date, end_date) =
        workdays::working_day_range(request.year, request.month).ok_or_else(|| Error::NotFound {
            resource: "Working days".to_string(),
            id: format!("{}-{:02}", request.year, request.month),
        })?;

    Ok(Json(WorkingDaysResponse { start_date, end_date }))
}
