use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::templates::{TemplateCreatedResponse, TemplateLookupResponse, TemplateQuery},
    db::{
        handlers::{DocTemplates, DocTypes, LegalEntities, Repository},
        models::templates::DocTemplateCreateDBRequest,
    },
    documents::normalize_document_type,
    errors::{Error, Result},
};

/// Resolve the template for a (company, document type) pair
///
/// A lookup miss is not an error: the company and the normalized document type
/// are registered so a template can be attached to them later, and the caller
/// gets a message instead of a link.
#[utoipa::path(
    post,
    path = "/get_template",
    request_body = TemplateQuery,
    tag = "templates",
    responses(
        (status = 200, description = "Template link or registration message", body = TemplateLookupResponse),
        (status = 400, description = "Invalid input"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_template(
    State(state): State<AppState>,
    Json(query): Json<TemplateQuery>,
) -> Result<Json<TemplateLookupResponse>> {
    if query.company_name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Company name must not be empty".to_string(),
        });
    }

    let doc_type = normalize_document_type(&query.document_type);
    if doc_type.is_empty() {
        return Err(Error::BadRequest {
            message: "Document type must not be empty".to_string(),
        });
    }
    let company_name = query.company_name.trim();

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let template = DocTemplates::new(&mut tx)
        .find_by_company_and_type(company_name, &doc_type)
        .await?;

    let response = match template {
        Some(template) => TemplateLookupResponse::Found {
            template_link: template.link,
        },
        None => {
            // Register the referents so a template can be attached manually
            LegalEntities::new(&mut tx)
                .register(company_name, query.director_name.as_deref())
                .await?;
            DocTypes::new(&mut tx).ensure(&doc_type).await?;

            TemplateLookupResponse::NotFound {
                message: format!("No template registered for '{company_name}' and type '{doc_type}'"),
            }
        }
    };

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(Json(response))
}

/// Upload a fillable template for an existing (company, document type) pair
#[utoipa::path(
    post,
    path = "/create_template",
    tag = "templates",
    request_body(
        content_type = "multipart/form-data",
        description = "Template file with company_name and document_type fields"
    ),
    responses(
        (status = 201, description = "Template stored", body = TemplateCreatedResponse),
        (status = 400, description = "Invalid input or disallowed file type"),
        (status = 404, description = "Unknown company or document type"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_template(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<TemplateCreatedResponse>)> {
    let mut company_name: Option<String> = None;
    let mut document_type: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "company_name" => company_name = Some(read_text_field(field).await?),
            "document_type" => document_type = Some(read_text_field(field).await?),
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read uploaded file: {e}"),
                })?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let company_name = required(company_name, "company_name")?;
    let doc_type = normalize_document_type(&required(document_type, "document_type")?);
    let (filename, bytes) = file.ok_or_else(|| Error::BadRequest {
        message: "Missing field 'file'".to_string(),
    })?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    // Unlike /get_template, uploading a template never registers referents
    if LegalEntities::new(&mut tx).get(&company_name).await?.is_none() {
        return Err(Error::NotFound {
            resource: "Legal entity".to_string(),
            id: company_name,
        });
    }
    if !DocTypes::new(&mut tx).exists(&doc_type).await? {
        return Err(Error::NotFound {
            resource: "Document type".to_string(),
            id: doc_type,
        });
    }

    let path = state.files.store_template(&filename, &bytes).await?;
    let link = path.to_string_lossy().into_owned();

    let created = DocTemplates::new(&mut tx)
        .create(&DocTemplateCreateDBRequest {
            company_name,
            doc_type,
            link: link.clone(),
        })
        .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((
        StatusCode::CREATED,
        Json(TemplateCreatedResponse {
            id: created.id,
            link,
            message: "Template stored".to_string(),
        }),
    ))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    let name = field.name().unwrap_or("").to_string();
    field.text().await.map_err(|e| Error::BadRequest {
        message: format!("Invalid field '{name}': {e}"),
    })
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(Error::BadRequest {
            message: format!("Missing field '{name}'"),
        }),
    }
}
