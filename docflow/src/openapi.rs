//! OpenAPI documentation for the document-management API.
//!
//! The rendered spec is served at `/docs` (interactive) and `/openapi.json`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Security scheme: HTTP basic auth against the `users` table.
struct BasicAuthAddon;

impl Modify for BasicAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BasicAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Basic)
                        .description(Some("Username and password of a stored credential."))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "docflow API",
        description = "Internal document-management backend: template resolution, \
                       placeholder filling, ready-document numbering, payroll helpers."
    ),
    paths(
        api::handlers::auth::login,
        api::handlers::auth::create_user,
        api::handlers::templates::get_template,
        api::handlers::templates::create_template,
        api::handlers::documents::process_document,
        api::handlers::documents::add_signed_document,
        api::handlers::payroll::calculate_salary,
        api::handlers::payroll::working_days,
    ),
    components(schemas(
        api::models::auth::LoginResponse,
        api::models::auth::UserCreate,
        api::models::auth::UserCreatedResponse,
        api::models::templates::TemplateQuery,
        api::models::templates::TemplateLookupResponse,
        api::models::templates::TemplateCreatedResponse,
        api::models::documents::ProcessDocumentRequest,
        api::models::documents::ProcessedDocumentResponse,
        api::models::documents::SignedDocumentResponse,
        api::models::payroll::SalaryRequest,
        api::models::payroll::SalaryBreakdown,
        api::models::payroll::WorkingDaysRequest,
        api::models::payroll::WorkingDaysResponse,
    )),
    modifiers(&BasicAuthAddon),
    security(("BasicAuth" = [])),
    tags(
        (name = "authentication", description = "Credential management"),
        (name = "templates", description = "Template lookup and registration"),
        (name = "documents", description = "Document filling and recording"),
        (name = "payroll", description = "Salary and working-day helpers"),
    )
)]
pub struct ApiDoc;
