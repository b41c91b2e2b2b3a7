//! Database repository for employees and their hourly rates.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::employees::{EmployeeCreateDBRequest, EmployeeDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing employees
#[derive(Debug, Clone)]
pub struct EmployeeFilter {
    pub skip: i64,
    pub limit: i64,
}

impl Default for EmployeeFilter {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

pub struct Employees<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Employees<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Employees<'c> {
    type CreateRequest = EmployeeCreateDBRequest;
    type Response = EmployeeDBResponse;
    type Id = String;
    type Filter = EmployeeFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let employee = sqlx::query_as::<_, EmployeeDBResponse>(
            "INSERT INTO employees (name, hourly_rate) VALUES ($1, $2) RETURNING name, hourly_rate",
        )
        .bind(&request.name)
        .bind(request.hourly_rate)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(employee)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, name: Self::Id) -> Result<Option<Self::Response>> {
        let employee = sqlx::query_as::<_, EmployeeDBResponse>(
            "SELECT name, hourly_rate FROM employees WHERE name = $1",
        )
        .bind(&name)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(employee)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let employees = sqlx::query_as::<_, EmployeeDBResponse>(
            "SELECT name, hourly_rate FROM employees ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(employees)
    }
}
