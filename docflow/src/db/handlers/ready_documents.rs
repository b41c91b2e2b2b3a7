//! Database repository for finalized (ready) documents.
//!
//! Document numbers are sequential within a calendar (year, month). The number
//! is computed as max + 1 and inserted in one short transaction; a unique index
//! over (year, month, document_number) turns a concurrent double-assignment
//! into a unique violation, which the recorder retries with a fresh number.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::ready_documents::{ReadyDocumentCreateDBRequest, ReadyDocumentDBResponse},
};
use chrono::NaiveDate;
use sqlx::{Connection, PgConnection};
use tracing::instrument;

/// Unique index backing the per-month numbering invariant.
const MONTH_NUMBER_INDEX: &str = "ready_documents_month_number_key";

/// Bounded retries for numbering collisions between concurrent writers.
const MAX_NUMBERING_ATTEMPTS: u32 = 5;

/// Filter for listing ready documents
#[derive(Debug, Clone, Default)]
pub struct ReadyDocumentFilter {
    /// Restrict to documents dated within this calendar month
    pub month: Option<(i32, u32)>,
}

pub struct ReadyDocuments<'c> {
    db: &'c mut PgConnection,
}

impl<'c> ReadyDocuments<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Highest document number assigned in the month of `date`, or 0.
    #[instrument(skip(self), err)]
    pub async fn last_number_in_month(&mut self, date: NaiveDate) -> Result<i32> {
        let last: i32 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(document_number), 0)::int
            FROM ready_documents
            WHERE EXTRACT(YEAR FROM date) = EXTRACT(YEAR FROM $1::date)
              AND EXTRACT(MONTH FROM date) = EXTRACT(MONTH FROM $1::date)
            "#,
        )
        .bind(date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(last)
    }

    async fn insert_with_number(&mut self, request: &ReadyDocumentCreateDBRequest, number: i32) -> Result<ReadyDocumentDBResponse> {
        let mut tx = self.db.begin().await?;

        let document = sqlx::query_as::<_, ReadyDocumentDBResponse>(
            r#"
            INSERT INTO ready_documents (date, amount, legal_entities, signatories, link, document_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, date, amount, legal_entities, signatories, link, document_number
            "#,
        )
        .bind(request.date)
        .bind(request.amount)
        .bind(&request.legal_entities)
        .bind(&request.signatories)
        .bind(&request.link)
        .bind(number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(document)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for ReadyDocuments<'c> {
    type CreateRequest = ReadyDocumentCreateDBRequest;
    type Response = ReadyDocumentDBResponse;
    type Id = i64;
    type Filter = ReadyDocumentFilter;

    /// Record a finalized document, assigning the next per-month number.
    #[instrument(skip(self, request), fields(date = %request.date), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let number = self.last_number_in_month(request.date).await? + 1;

            match self.insert_with_number(request, number).await {
                Ok(document) => return Ok(document),
                Err(err) if err.is_unique_violation_on(MONTH_NUMBER_INDEX) && attempt < MAX_NUMBERING_ATTEMPTS => {
                    tracing::debug!(number, attempt, "document number taken by concurrent writer, retrying");
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let document = sqlx::query_as::<_, ReadyDocumentDBResponse>(
            "SELECT id, date, amount, legal_entities, signatories, link, document_number FROM ready_documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(document)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let (year, month) = match filter.month {
            Some((year, month)) => (Some(year as f64), Some(month as f64)),
            None => (None, None),
        };

        let documents = sqlx::query_as::<_, ReadyDocumentDBResponse>(
            r#"
            SELECT id, date, amount, legal_entities, signatories, link, document_number
            FROM ready_documents
            WHERE ($1::float8 IS NULL OR EXTRACT(YEAR FROM date) = $1)
              AND ($2::float8 IS NULL OR EXTRACT(MONTH FROM date) = $2)
            ORDER BY date, document_number
            "#,
        )
        .bind(year)
        .bind(month)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(documents)
    }
}
