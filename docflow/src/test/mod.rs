//! End-to-end endpoint tests running against a real database and a throwaway
//! storage directory.

pub mod utils;

use crate::db::handlers::{DocTemplates, Repository};
use crate::db::models::templates::DocTemplateCreateDBRequest;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use base64::{Engine as _, engine::general_purpose};
use rust_decimal::Decimal;
use sqlx::PgPool;
use utils::{
    ADMIN_PASSWORD, ADMIN_USERNAME, basic_auth, create_test_app, create_test_employee, ensure_doc_type, register_company,
};

#[sqlx::test]
#[test_log::test]
async fn test_health_is_public(pool: PgPool) {
    let (server, _storage) = create_test_app(pool).await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");
}

#[sqlx::test]
#[test_log::test]
async fn test_login_with_admin_credentials(pool: PgPool) {
    let (server, _storage) = create_test_app(pool).await;

    let response = server
        .post("/login")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], ADMIN_USERNAME);

    // Wrong password and missing header are both 401
    let response = server
        .post("/login")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, "wrong"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server.post("/login").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
#[test_log::test]
async fn test_create_user_and_login(pool: PgPool) {
    let (server, _storage) = create_test_app(pool).await;
    let admin = basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD);

    let response = server
        .post("/create_user")
        .add_header("authorization", admin.clone())
        .json(&serde_json::json!({"username": "alice", "password": "correct-horse-battery"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = server
        .post("/login")
        .add_header("authorization", basic_auth("alice", "correct-horse-battery"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Too-short password is rejected before anything is stored
    let response = server
        .post("/create_user")
        .add_header("authorization", admin.clone())
        .json(&serde_json::json!({"username": "bob", "password": "short"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Duplicate username is a conflict
    let response = server
        .post("/create_user")
        .add_header("authorization", admin)
        .json(&serde_json::json!({"username": "alice", "password": "another-long-password"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[sqlx::test]
#[test_log::test]
async fn test_get_template_miss_registers_company(pool: PgPool) {
    let (server, _storage) = create_test_app(pool.clone()).await;

    let response = server
        .post("/get_template")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .json(&serde_json::json!({
            "document_type": "  ЗАЯВКА  ",
            "company_name": "Acme",
            "director_name": "Ivanov"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("Заказ"));
    assert!(body.get("template_link").is_none());

    // The miss registered the company and the normalized type
    let director: Option<String> = sqlx::query_scalar("SELECT director FROM legal_entities WHERE name = 'Acme'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(director.as_deref(), Some("Ivanov"));
    let type_exists: Option<String> = sqlx::query_scalar("SELECT type FROM doc_types WHERE type = 'Заказ'")
        .fetch_optional(&pool)
        .await
        .unwrap();
    assert!(type_exists.is_some());
}

#[sqlx::test]
#[test_log::test]
async fn test_get_template_returns_stored_link(pool: PgPool) {
    let (server, _storage) = create_test_app(pool.clone()).await;
    register_company(&pool, "Acme", Some("Ivanov")).await;
    ensure_doc_type(&pool, "Акт").await;

    let mut conn = pool.acquire().await.unwrap();
    DocTemplates::new(&mut conn)
        .create(&DocTemplateCreateDBRequest {
            company_name: "Acme".to_string(),
            doc_type: "Акт".to_string(),
            link: "templates/acme_act.txt".to_string(),
        })
        .await
        .unwrap();

    let response = server
        .post("/get_template")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .json(&serde_json::json!({"document_type": "акт", "company_name": "Acme"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["template_link"], "templates/acme_act.txt");
}

#[sqlx::test]
#[test_log::test]
async fn test_process_document_fills_and_numbers(pool: PgPool) {
    let (server, storage) = create_test_app(pool).await;
    let admin = basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD);

    let templates_dir = storage.path().join("templates");
    std::fs::create_dir_all(&templates_dir).unwrap();
    std::fs::write(templates_dir.join("greeting.txt"), "Dear {name}, total {amount}").unwrap();

    let request = |date: &str| {
        serde_json::json!({
            "template_path": "greeting.txt",
            "placeholders": {"{name}": "Bob", "{amount}": "100"},
            "sum": 100.0,
            "legalEntities": "Acme",
            "signatories": "Ivanov",
            "date": date
        })
    };

    let response = server
        .post("/process_document")
        .add_header("authorization", admin.clone())
        .json(&request("2024-03-05"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["document_number"], 1);
    let decoded = general_purpose::STANDARD.decode(body["document"].as_str().unwrap()).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), "Dear Bob, total 100");

    // Same month continues the sequence, the next month restarts it
    let body: serde_json::Value = server
        .post("/process_document")
        .add_header("authorization", admin.clone())
        .json(&request("2024-03-20"))
        .await
        .json();
    assert_eq!(body["document_number"], 2);

    let body: serde_json::Value = server
        .post("/process_document")
        .add_header("authorization", admin)
        .json(&request("2024-04-01"))
        .await
        .json();
    assert_eq!(body["document_number"], 1);
}

#[sqlx::test]
#[test_log::test]
async fn test_calculate_salary_with_vat(pool: PgPool) {
    let (server, _storage) = create_test_app(pool.clone()).await;
    create_test_employee(&pool, "Bob", Decimal::new(10, 0)).await;

    let response = server
        .post("/calculate_salary")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .json(&serde_json::json!({"employee": "Bob", "hours": 5}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["salary_before_vat"].as_f64().unwrap(), 50.0);
    assert_eq!(body["vat_rate"].as_f64().unwrap(), 0.05);
    assert_eq!(body["vat_amount"].as_f64().unwrap(), 2.5);
    assert_eq!(body["salary_with_vat"].as_f64().unwrap(), 52.5);

    let response = server
        .post("/calculate_salary")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .json(&serde_json::json!({"employee": "Nobody", "hours": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[test_log::test]
async fn test_working_days_endpoint(pool: PgPool) {
    let (server, _storage) = create_test_app(pool).await;
    let admin = basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD);

    let response = server
        .post("/working_days")
        .add_header("authorization", admin.clone())
        .json(&serde_json::json!({"year": 2024, "month": 5}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["start_date"], "2024-05-02");
    assert_eq!(body["end_date"], "2024-05-31");

    let response = server
        .post("/working_days")
        .add_header("authorization", admin)
        .json(&serde_json::json!({"year": 2024, "month": 13}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
#[test_log::test]
async fn test_add_signed_document_computes_amount_from_rate(pool: PgPool) {
    let (server, _storage) = create_test_app(pool.clone()).await;
    create_test_employee(&pool, "Bob", Decimal::new(10, 0)).await;

    let form = MultipartForm::new()
        .add_text("date", "2024-03-05")
        .add_text("legalEntities", "Acme")
        .add_text("signatories", "Ivanov")
        .add_text("employee", "Bob")
        .add_text("hours", "2")
        .add_part("file", Part::bytes(b"%PDF-".as_slice()).file_name("act_signed.pdf"));

    let response = server
        .post("/add_signed_document")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["document_number"], 1);

    let amount: Decimal = sqlx::query_scalar("SELECT amount FROM ready_documents WHERE document_number = 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(amount, Decimal::new(20, 0));
}

#[sqlx::test]
#[test_log::test]
async fn test_upload_rejects_disallowed_extension(pool: PgPool) {
    let (server, _storage) = create_test_app(pool).await;

    let form = MultipartForm::new()
        .add_text("date", "2024-03-05")
        .add_text("sum", "10")
        .add_part("file", Part::bytes(b"MZ".as_slice()).file_name("malware.exe"));

    let response = server
        .post("/add_signed_document")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("exe"));
}

#[sqlx::test]
#[test_log::test]
async fn test_create_template_stores_file_and_row(pool: PgPool) {
    let (server, storage) = create_test_app(pool.clone()).await;
    register_company(&pool, "Acme", None).await;
    ensure_doc_type(&pool, "Акт").await;

    let form = MultipartForm::new()
        .add_text("company_name", "Acme")
        .add_text("document_type", "акт")
        .add_part("file", Part::bytes(b"Act for {company}".as_slice()).file_name("acme_act.txt"));

    let response = server
        .post("/create_template")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    let link = body["link"].as_str().unwrap();
    assert!(link.contains("acme_act.txt"));
    assert!(storage.path().join("templates").join("acme_act.txt").exists());

    // Unknown company: nothing stored
    let form = MultipartForm::new()
        .add_text("company_name", "Globex")
        .add_text("document_type", "акт")
        .add_part("file", Part::bytes(b"x".as_slice()).file_name("globex.txt"));

    let response = server
        .post("/create_template")
        .add_header("authorization", basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
