//! Repositories for the reference tables behind template resolution:
//! document types and legal entities.
//!
//! Both follow a soft "create on demand" policy: a failed template lookup
//! registers the missing company and document type so a template can be
//! attached to them manually later.

use crate::db::{errors::Result, models::templates::LegalEntityDBResponse};
use sqlx::PgConnection;
use tracing::instrument;

pub struct DocTypes<'c> {
    db: &'c mut PgConnection,
}

impl<'c> DocTypes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn exists(&mut self, doc_type: &str) -> Result<bool> {
        let found: Option<String> = sqlx::query_scalar("SELECT type FROM doc_types WHERE type = $1")
            .bind(doc_type)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(found.is_some())
    }

    /// Create the document type if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure(&mut self, doc_type: &str) -> Result<()> {
        sqlx::query("INSERT INTO doc_types (type) VALUES ($1) ON CONFLICT (type) DO NOTHING")
            .bind(doc_type)
            .execute(&mut *self.db)
            .await?;

        Ok(())
    }
}

pub struct LegalEntities<'c> {
    db: &'c mut PgConnection,
}

impl<'c> LegalEntities<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get(&mut self, name: &str) -> Result<Option<LegalEntityDBResponse>> {
        let entity = sqlx::query_as::<_, LegalEntityDBResponse>(
            "SELECT name, director FROM legal_entities WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(entity)
    }

    /// Soft upsert: create the entity if absent, otherwise update the director
    /// when a non-empty one was supplied. Never overwrites a director with an
    /// empty value.
    #[instrument(skip(self), fields(name = %name), err)]
    pub async fn register(&mut self, name: &str, director: Option<&str>) -> Result<LegalEntityDBResponse> {
        let director = director.map(str::trim).filter(|d| !d.is_empty());

        let entity = match self.get(name).await? {
            None => {
                sqlx::query_as::<_, LegalEntityDBResponse>(
                    "INSERT INTO legal_entities (name, director) VALUES ($1, $2) RETURNING name, director",
                )
                .bind(name)
                .bind(director)
                .fetch_one(&mut *self.db)
                .await?
            }
            Some(existing) => match director {
                Some(director) => {
                    sqlx::query_as::<_, LegalEntityDBResponse>(
                        "UPDATE legal_entities SET director = $2 WHERE name = $1 RETURNING name, director",
                    )
                    .bind(name)
                    .bind(director)
                    .fetch_one(&mut *self.db)
                    .await?
                }
                None => existing,
            },
        };

        Ok(entity)
    }
}
