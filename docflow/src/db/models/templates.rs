use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct DocTemplateCreateDBRequest {
    pub company_name: String,
    pub doc_type: String,
    pub link: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct DocTemplateDBResponse {
    pub id: i64,
    pub company_name: String,
    pub doc_type: String,
    pub link: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct LegalEntityDBResponse {
    pub name: String,
    pub director: Option<String>,
}
