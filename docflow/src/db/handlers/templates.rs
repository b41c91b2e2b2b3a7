//! Database repository for document templates.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::templates::{DocTemplateCreateDBRequest, DocTemplateDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing templates
#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    pub company_name: Option<String>,
}

pub struct DocTemplates<'c> {
    db: &'c mut PgConnection,
}

impl<'c> DocTemplates<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Resolve the template registered for a (company, document type) pair.
    #[instrument(skip(self), err)]
    pub async fn find_by_company_and_type(&mut self, company_name: &str, doc_type: &str) -> Result<Option<DocTemplateDBResponse>> {
        let template = sqlx::query_as::<_, DocTemplateDBResponse>(
            r#"
            SELECT t.id, t.company_name, t.doc_type, t.link
            FROM doc_templates t
            JOIN legal_entities le ON le.name = t.company_name
            JOIN doc_types dt ON dt.type = t.doc_type
            WHERE le.name = $1 AND dt.type = $2
            "#,
        )
        .bind(company_name)
        .bind(doc_type)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(template)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for DocTemplates<'c> {
    type CreateRequest = DocTemplateCreateDBRequest;
    type Response = DocTemplateDBResponse;
    type Id = i64;
    type Filter = TemplateFilter;

    #[instrument(skip(self, request), fields(company = %request.company_name, doc_type = %request.doc_type), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let template = sqlx::query_as::<_, DocTemplateDBResponse>(
            r#"
            INSERT INTO doc_templates (company_name, doc_type, link)
            VALUES ($1, $2, $3)
            RETURNING id, company_name, doc_type, link
            "#,
        )
        .bind(&request.company_name)
        .bind(&request.doc_type)
        .bind(&request.link)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(template)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let template = sqlx::query_as::<_, DocTemplateDBResponse>(
            "SELECT id, company_name, doc_type, link FROM doc_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(template)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let templates = sqlx::query_as::<_, DocTemplateDBResponse>(
            r#"
            SELECT id, company_name, doc_type, link FROM doc_templates
            WHERE $1::text IS NULL OR company_name = $1
            ORDER BY id
            "#,
        )
        .bind(&filter.company_name)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(templates)
    }
}
