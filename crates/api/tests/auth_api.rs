//! HTTP-level tests for registration, login and the profile endpoint.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use civic_api::auth::jwt::Claims;
use common::{body_json, get, get_auth, post_json};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use sqlx::PgPool;

fn registration(email: &str) -> serde_json::Value {
    json!({
        "name": "Asha Verma",
        "email": email,
        "password": "Str0ngPass",
        "phone": "9876543210",
        "address": "221 Baker Street, Pune"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_citizen(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/register", registration("Asha@Example.com")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "asha@example.com");
    assert_eq!(json["data"]["user"]["role"], "citizen");
    assert_eq!(json["data"]["citizen"]["phone"], "9876543210");
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first = post_json(app.clone(), "/api/v1/auth/register", registration("dup@example.com")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app, "/api/v1/auth/register", registration("DUP@example.com")).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_validation_names_the_field(pool: PgPool) {
    let app = common::build_test_app(pool);

    let cases = [
        ("password", json!("alllowercase1")),
        ("phone", json!("555-123-4567")),
        ("email", json!("not-an-email")),
        ("name", json!("R2D2")),
        ("address", json!("short")),
    ];

    for (field, value) in cases {
        let mut body = registration("valid@example.com");
        body[field] = value;
        let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {field}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["field"], field);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_then_me(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/api/v1/auth/register", registration("me@example.com")).await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": "ME@example.com", "password": "Str0ngPass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["expires_in"], 3600);
    let token = json["data"]["access_token"].as_str().unwrap().to_string();

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "me@example.com");
    assert_eq!(json["data"]["citizen"]["address"], "221 Baker Street, Pune");
    assert!(json["data"].get("official").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_and_unknown_email_look_the_same(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/api/v1/auth/register", registration("pw@example.com")).await;

    let wrong = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": "pw@example.com", "password": "Wr0ngPass" }),
    )
    .await;
    let unknown = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "nobody@example.com", "password": "Str0ngPass" }),
    )
    .await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong).await, body_json(unknown).await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn official_profile_lists_categories(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let official = common::seed_official(&pool, "roads@city.gov", &[roads]).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &official.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["role"], "official");
    assert_eq!(json["data"]["category_ids"], json!([roads]));
    assert!(json["data"].get("citizen").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/issues").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/issues", "not-a-token").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_token_is_token_expired(pool: PgPool) {
    let citizen = common::seed_citizen(&pool, "late@example.com").await;
    let app = common::build_test_app(pool);

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: citizen.user_id,
        role: "citizen".to_string(),
        exp: now - 300,
        iat: now - 4000,
        jti: "expired".to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::test_config().jwt.secret.as_bytes()),
    )
    .unwrap();

    let response = get_auth(app, "/api/v1/issues", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "TOKEN_EXPIRED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_for_deleted_user_is_unauthorized(pool: PgPool) {
    let citizen = common::seed_citizen(&pool, "gone@example.com").await;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(citizen.user_id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/issues", &citizen.token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
