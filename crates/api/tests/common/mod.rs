#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use civic_api::auth::jwt::{generate_access_token, JwtConfig};
use civic_api::config::ServerConfig;
use civic_api::router::build_app_router;
use civic_api::state::AppState;
use civic_core::roles::{ROLE_CITIZEN, ROLE_HIGHER_OFFICIAL, ROLE_OFFICIAL};
use civic_db::models::citizen::CreateCitizen;
use civic_db::models::official::CreateOfficial;
use civic_db::models::user::CreateUser;
use civic_db::repositories::{CategoryRepo, CitizenRepo, OfficialRepo, UserRepo};

pub const MULTIPART_BOUNDARY: &str = "civic-test-boundary";

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        max_attachment_bytes: 1024 * 1024,
        officials_handle_escalated: false,
        auto_escalation_interval_secs: 0,
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// A file part for [`multipart_body`]: `(filename, content type, bytes)`.
pub type FilePart<'a> = (&'a str, &'a str, &'a [u8]);

/// Encode text fields and file parts as a `multipart/form-data` body.
pub fn multipart_body(fields: &[(&str, &str)], files: &[FilePart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
                 {value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (filename, mimetype, data) in files {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"attachments\"; filename=\"{filename}\"\r\n\
                 Content-Type: {mimetype}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    files: &[FilePart<'_>],
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(multipart_body(fields, files)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// A seeded account and a valid access token for it.
pub struct TestUser {
    pub user_id: i64,
    pub token: String,
}

fn token_for(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

async fn insert_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let user = UserRepo::create(
        &mut tx,
        &CreateUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    user.id
}

pub async fn seed_citizen(pool: &PgPool, email: &str) -> TestUser {
    let user_id = insert_user(pool, email, ROLE_CITIZEN).await;
    let mut tx = pool.begin().await.unwrap();
    CitizenRepo::create(
        &mut tx,
        &CreateCitizen {
            user_id,
            phone: "5551234567".to_string(),
            address: "12 Main Street, Springfield".to_string(),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    TestUser {
        user_id,
        token: token_for(user_id, ROLE_CITIZEN),
    }
}

async fn seed_official_with_role(
    pool: &PgPool,
    email: &str,
    role: &str,
    categories: &[i64],
) -> TestUser {
    let user_id = insert_user(pool, email, role).await;
    let profile = OfficialRepo::create(
        pool,
        &CreateOfficial {
            user_id,
            reports_to: None,
        },
    )
    .await
    .unwrap();
    for &category_id in categories {
        OfficialRepo::assign_category(pool, profile.id, category_id)
            .await
            .unwrap();
    }
    TestUser {
        user_id,
        token: token_for(user_id, role),
    }
}

pub async fn seed_official(pool: &PgPool, email: &str, categories: &[i64]) -> TestUser {
    seed_official_with_role(pool, email, ROLE_OFFICIAL, categories).await
}

pub async fn seed_higher_official(pool: &PgPool, email: &str) -> TestUser {
    seed_official_with_role(pool, email, ROLE_HIGHER_OFFICIAL, &[]).await
}

/// Id of one of the seeded categories.
pub async fn category_id(pool: &PgPool, name: &str) -> i64 {
    CategoryRepo::list_active(pool)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .unwrap()
        .id
}
