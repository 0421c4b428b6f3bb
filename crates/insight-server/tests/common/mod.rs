//! Shared helpers for the HTTP integration tests
//!
//! Every test gets its own in-memory SQLite database with the seeded
//! master options and users, and its own upload directory.

#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    App,
    body::{BoxBody, EitherBody},
    dev::{Service, ServiceResponse},
    http::header,
    test, web,
};
use config::Config;
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use tempfile::TempDir;

use insight_migration::{Migrator, MigratorTrait};
use insight_persistence::{ExternalDbPersistService, PersistenceService};
use insight_server::{
    middleware::auth::Authentication,
    model::{AppState, Configuration},
    startup,
};

pub const SECRET: &str = "SW5zaWdodE1hbmFnZXJEZWZhdWx0VG9rZW5TZWNyZXRLZXkwMTIzNDU2Nzg5";
pub const BOUNDARY: &str = "----insight-test-boundary";

pub trait TestApp:
    Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>
{
}

impl<S> TestApp for S where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>
{
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub upload_dir: TempDir,
}

pub async fn setup() -> TestContext {
    let upload_dir = tempfile::tempdir().unwrap();

    let config = Config::builder()
        .set_override("insight.auth.token.secret.key", SECRET)
        .unwrap()
        .set_override("insight.auth.token.expire.seconds", 3600)
        .unwrap()
        .set_override(
            "insight.upload.dir",
            upload_dir.path().to_string_lossy().to_string(),
        )
        .unwrap()
        .set_override("insight.upload.max_file_size", 1024)
        .unwrap()
        .build()
        .unwrap();

    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let persistence: Arc<dyn PersistenceService> = Arc::new(ExternalDbPersistService::new(db));
    let state = AppState::new(Configuration::from_config(config), persistence);

    TestContext {
        state: web::Data::new(state),
        upload_dir,
    }
}

pub async fn init_app(ctx: &TestContext) -> impl TestApp {
    let state = ctx.state.clone();
    let configuration = state.configuration.clone();

    test::init_service(
        App::new()
            .wrap(Authentication)
            .app_data(state)
            .configure(|cfg| startup::configure(cfg, &configuration)),
    )
    .await
}

pub async fn call<S: TestApp>(app: &S, req: Request) -> (u16, Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn login<S: TestApp>(app: &S, username: &str, password: &str) -> String {
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": username, "password": password }))
        .to_request();
    let (status, body) = call(app, req).await;
    assert_eq!(status, 200, "login as {} failed: {}", username, body);
    body["token"].as_str().unwrap().to_string()
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Build a multipart body with a single `file` field
pub fn multipart_body(file_name: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> (header::HeaderName, String) {
    (
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    )
}

pub fn insight_json(creation_number: i32, insight_id: &str) -> Value {
    serde_json::json!({
        "creationNumber": creation_number,
        "subject": format!("Subject {}", creation_number),
        "insightId": insight_id,
        "mainCategory": "tips",
        "targetBanks": ["Fukuoka"],
        "targetTables": ["Accounts"],
    })
}
