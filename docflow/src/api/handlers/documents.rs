use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    AppState,
    api::models::documents::{ProcessDocumentRequest, ProcessedDocumentResponse, SignedDocumentResponse},
    db::{
        handlers::{Employees, ReadyDocuments, Repository},
        models::ready_documents::ReadyDocumentCreateDBRequest,
    },
    documents::fill,
    errors::{Error, Result},
};

/// Fill a template and record the result as a numbered ready document
#[utoipa::path(
    post,
    path = "/process_document",
    request_body = ProcessDocumentRequest,
    tag = "documents",
    responses(
        (status = 200, description = "Filled document with its assigned number", body = ProcessedDocumentResponse),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Template could not be processed"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn process_document(
    State(state): State<AppState>,
    Json(request): Json<ProcessDocumentRequest>,
) -> Result<Json<ProcessedDocumentResponse>> {
    let path = state.files.template_path(&request.template_path);
    let filled = fill::fill_template(&path, &request.placeholders).await?;
    let document = fill::encode_document(&filled);

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let recorded = ReadyDocuments::new(&mut conn)
        .create(&ReadyDocumentCreateDBRequest {
            date: request.date,
            amount: request.sum,
            legal_entities: request.legal_entities,
            signatories: request.signatories,
            link: request.template_path,
        })
        .await?;

    Ok(Json(ProcessedDocumentResponse {
        document,
        document_number: recorded.document_number,
    }))
}

/// Form fields accompanying a signed-document upload.
#[derive(Debug, Default)]
struct SignedDocumentForm {
    date: Option<NaiveDate>,
    legal_entities: Option<String>,
    signatories: Option<String>,
    sum: Option<Decimal>,
    employee: Option<String>,
    hours: Option<Decimal>,
    file: Option<(String, Vec<u8>)>,
}

/// Store an externally signed document and record it
///
/// The recorded amount is the `sum` field when supplied, otherwise it is
/// computed from the named employee's hourly rate and the `hours` field.
#[utoipa::path(
    post,
    path = "/add_signed_document",
    tag = "documents",
    request_body(
        content_type = "multipart/form-data",
        description = "Signed document with date, legalEntities, signatories and either sum or employee+hours"
    ),
    responses(
        (status = 201, description = "Document stored and numbered", body = SignedDocumentResponse),
        (status = 400, description = "Invalid input or disallowed file type"),
        (status = 404, description = "Unknown employee"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_signed_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SignedDocumentResponse>)> {
    let form = parse_signed_document_form(&mut multipart).await?;

    let date = form.date.ok_or_else(|| Error::BadRequest {
        message: "Missing field 'date'".to_string(),
    })?;
    let legal_entities = form.legal_entities.unwrap_or_default();
    let signatories = form.signatories.unwrap_or_default();
    let (filename, bytes) = form.file.ok_or_else(|| Error::BadRequest {
        message: "Missing field 'file'".to_string(),
    })?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let amount = match (form.sum, form.employee) {
        (Some(sum), _) => sum,
        (None, Some(employee)) => {
            let hours = form.hours.ok_or_else(|| Error::BadRequest {
                message: "Field 'hours' is required with 'employee'".to_string(),
            })?;
            let found = Employees::new(&mut conn)
                .get_by_id(employee.clone())
                .await?
                .ok_or_else(|| Error::NotFound {
                    resource: "Employee".to_string(),
                    id: employee,
                })?;
            found.hourly_rate * hours
        }
        (None, None) => Decimal::ZERO,
    };

    // Extension check happens inside the store before anything is recorded
    let path = state.files.store_upload(&filename, &bytes).await?;
    let link = path.to_string_lossy().into_owned();

    let recorded = ReadyDocuments::new(&mut conn)
        .create(&ReadyDocumentCreateDBRequest {
            date,
            amount,
            legal_entities,
            signatories,
            link: link.clone(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignedDocumentResponse {
            message: "Document recorded".to_string(),
            document_number: recorded.document_number,
            link,
        }),
    ))
}

async fn parse_signed_document_form(multipart: &mut Multipart) -> Result<SignedDocumentForm> {
    let mut form = SignedDocumentForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or("").to_string();
            let bytes = field.bytes().await.map_err(|e| Error::BadRequest {
                message: format!("Failed to read uploaded file: {e}"),
            })?;
            form.file = Some((filename, bytes.to_vec()));
            continue;
        }

        let value = field.text().await.map_err(|e| Error::BadRequest {
            message: format!("Invalid field '{name}': {e}"),
        })?;
        match name.as_str() {
            "date" => {
                form.date = Some(value.parse().map_err(|_| Error::BadRequest {
                    message: format!("Invalid date '{value}', expected YYYY-MM-DD"),
                })?);
            }
            "legalEntities" => form.legal_entities = Some(value),
            "signatories" => form.signatories = Some(value),
            "sum" => form.sum = Some(parse_decimal(&value, "sum")?),
            "employee" => form.employee = Some(value),
            "hours" => form.hours = Some(parse_decimal(&value, "hours")?),
            _ => {}
        }
    }

    Ok(form)
}

fn parse_decimal(value: &str, name: &str) -> Result<Decimal> {
    value.parse().map_err(|_| Error::BadRequest {
        message: format!("Invalid number '{value}' for field '{name}'"),
    })
}
