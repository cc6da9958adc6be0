//! End-to-end HTTP tests for filing, acting on and escalating issues.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_bytes, body_json, get_auth, post_json_auth, post_multipart_auth};
use serde_json::json;
use sqlx::PgPool;

/// File an issue over HTTP and return its id.
async fn file_issue(app: axum::Router, token: &str, category_id: i64) -> i64 {
    let category = category_id.to_string();
    let response = post_multipart_auth(
        app,
        "/api/v1/issues",
        &[
            ("category_id", category.as_str()),
            ("title", "Pothole on 5th Avenue"),
            ("description", "Deep pothole near the bus stop"),
        ],
        &[],
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn backdate(pool: &PgPool, issue_id: i64, hours: i64) {
    sqlx::query("UPDATE issues SET created_at = $1 WHERE id = $2")
        .bind(Utc::now() - Duration::hours(hours))
        .bind(issue_id)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn citizen_files_issue_with_photo(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let citizen = common::seed_citizen(&pool, "c1@example.com").await;
    let app = common::build_test_app(pool);

    let category = roads.to_string();
    let response = post_multipart_auth(
        app.clone(),
        "/api/v1/issues",
        &[
            ("category_id", category.as_str()),
            ("description", "  Streetlight flickering all night  "),
        ],
        &[("photo.jpg", "image/jpeg", b"\xff\xd8\xff\xe0fake-jpeg")],
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let issue = &json["data"];
    assert_eq!(issue["status"], "created");
    assert_eq!(issue["category"], "Roads");
    assert_eq!(issue["description"], "Streetlight flickering all night");
    assert!(issue["title"].is_null());
    assert_eq!(issue["attachments"][0]["filename"], "photo.jpg");
    assert_eq!(issue["attachments"][0]["mimetype"], "image/jpeg");

    let attachment_id = issue["attachments"][0]["id"].as_i64().unwrap();
    let response = get_auth(
        app,
        &format!("/api/v1/attachments/{attachment_id}"),
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/jpeg");
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"photo.jpg\""
    );
    assert_eq!(body_bytes(response).await, b"\xff\xd8\xff\xe0fake-jpeg");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn filing_rejects_bad_input(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let citizen = common::seed_citizen(&pool, "c1@example.com").await;
    let official = common::seed_official(&pool, "o@city.gov", &[roads]).await;
    let app = common::build_test_app(pool);
    let category = roads.to_string();

    let response = post_multipart_auth(
        app.clone(),
        "/api/v1/issues",
        &[("category_id", category.as_str()), ("description", "   ")],
        &[],
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "description");

    let response = post_multipart_auth(
        app.clone(),
        "/api/v1/issues",
        &[("category_id", "abc"), ("description", "Broken bench")],
        &[],
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "category_id");

    let response = post_multipart_auth(
        app,
        "/api/v1/issues",
        &[("category_id", category.as_str()), ("description", "Broken bench")],
        &[],
        &official.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn citizens_only_see_their_own_issues(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let alice = common::seed_citizen(&pool, "alice@example.com").await;
    let bob = common::seed_citizen(&pool, "bob@example.com").await;
    let app = common::build_test_app(pool);

    let issue_id = file_issue(app.clone(), &alice.token, roads).await;

    let response = get_auth(app.clone(), &format!("/api/v1/issues/{issue_id}"), &bob.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/issues/{issue_id}/comments"),
        &bob.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app.clone(), "/api/v1/issues", &bob.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 0);

    let response = get_auth(app, "/api/v1/issues", &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["id"], issue_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_filters_and_paginates(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let citizen = common::seed_citizen(&pool, "c1@example.com").await;
    let app = common::build_test_app(pool);

    for _ in 0..3 {
        file_issue(app.clone(), &citizen.token, roads).await;
    }

    let response = get_auth(app.clone(), "/api/v1/issues?page=2&limit=2", &citizen.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["pages"], 2);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);

    let response = get_auth(app.clone(), "/api/v1/issues?status=completed", &citizen.token).await;
    assert_eq!(body_json(response).await["data"]["total"], 0);

    let response = get_auth(app, "/api/v1/issues?status=archived", &citizen.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "status");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn official_moves_issue_through_its_lifecycle(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let citizen = common::seed_citizen(&pool, "c1@example.com").await;
    let official = common::seed_official(&pool, "roads@city.gov", &[roads]).await;
    let app = common::build_test_app(pool);

    let issue_id = file_issue(app.clone(), &citizen.token, roads).await;
    let uri = format!("/api/v1/issues/{issue_id}/comments");

    let response = post_multipart_auth(
        app.clone(),
        &uri,
        &[
            ("comment", "Crew dispatched"),
            ("status", "in_progress"),
            ("expected_status", "created"),
        ],
        &[("work-order.pdf", "application/pdf", b"%PDF-1.4")],
        &official.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["issue"]["status"], "in_progress");
    assert_eq!(json["data"]["comment"]["body"], "Crew dispatched");
    let comment_id = json["data"]["comment"]["id"].clone();
    assert_eq!(json["data"]["attachments"][0]["comment_id"], comment_id);

    let response = post_multipart_auth(
        app.clone(),
        &uri,
        &[("status", "completed")],
        &[],
        &official.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["issue"]["status"], "completed");
    assert!(json["data"]["comment"].is_null());

    // Terminal: no further moves, and nothing is written.
    let response = post_multipart_auth(
        app.clone(),
        &uri,
        &[("comment", "Reopening"), ("status", "in_progress")],
        &[],
        &official.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert_eq!(json["details"]["current"], "completed");
    assert_eq!(json["details"]["allowed"], json!([]));

    // The citizen sees one comment with its file.
    let response = get_auth(app, &uri, &citizen.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let comments = json["data"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["author_role"], "official");
    assert_eq!(comments[0]["attachments"][0]["filename"], "work-order.pdf");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_action_rules(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let water = common::category_id(&pool, "Water Supply").await;
    let citizen = common::seed_citizen(&pool, "c1@example.com").await;
    let outsider = common::seed_official(&pool, "water@city.gov", &[water]).await;
    let official = common::seed_official(&pool, "roads@city.gov", &[roads]).await;
    let app = common::build_test_app(pool);

    let issue_id = file_issue(app.clone(), &citizen.token, roads).await;
    let uri = format!("/api/v1/issues/{issue_id}/comments");

    // Officials cannot escalate through the comment endpoint.
    let response = post_multipart_auth(
        app.clone(),
        &uri,
        &[("status", "escalated")],
        &[],
        &official.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "status");

    let response = post_multipart_auth(app.clone(), &uri, &[], &[], &official.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "status");

    let response = post_multipart_auth(
        app.clone(),
        &uri,
        &[("status", "in_progress")],
        &[],
        &outsider.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_multipart_auth(
        app.clone(),
        &uri,
        &[("status", "in_progress")],
        &[],
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_multipart_auth(
        app.clone(),
        &uri,
        &[("status", "rejected"), ("expected_status", "in_progress")],
        &[],
        &official.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONCURRENT_MODIFICATION");

    let response = post_multipart_auth(
        app,
        "/api/v1/issues/999999/comments",
        &[("status", "in_progress")],
        &[],
        &official.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_upload_is_rejected(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let citizen = common::seed_citizen(&pool, "c1@example.com").await;
    let app = common::build_test_app(pool.clone());

    let category = roads.to_string();
    let big = vec![0u8; common::test_config().max_attachment_bytes + 1];
    let response = post_multipart_auth(
        app,
        "/api/v1/issues",
        &[("category_id", category.as_str()), ("description", "Flooded underpass")],
        &[("video.mp4", "video/mp4", &big)],
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "attachments");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM issues")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_escalation_hands_issue_to_higher_official(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let citizen = common::seed_citizen(&pool, "c1@example.com").await;
    let official = common::seed_official(&pool, "roads@city.gov", &[roads]).await;
    let higher = common::seed_higher_official(&pool, "chief@city.gov").await;
    let app = common::build_test_app(pool);

    let issue_id = file_issue(app.clone(), &citizen.token, roads).await;
    let uri = format!("/api/v1/issues/{issue_id}/escalate");

    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "reason": "No response", "note": "short" }),
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"]["field"], "note");

    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "reason": "No response", "note": "Nobody has looked at this in weeks" }),
        &official.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "reason": "No response", "note": "Nobody has looked at this in weeks" }),
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["issue"]["status"], "escalated");
    assert!(json["data"]["comment"]["body"]
        .as_str()
        .unwrap()
        .starts_with("[ESCALATION]"));
    assert!(json["data"].get("expected_resolution_hours").is_none());

    // Already escalated.
    let response = post_json_auth(
        app.clone(),
        &uri,
        json!({ "reason": "Still nothing", "note": "Nobody has looked at this in weeks" }),
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INVALID_TRANSITION");

    // The regular official loses the issue; the higher official takes it.
    let response = get_auth(app.clone(), "/api/v1/issues", &official.token).await;
    assert_eq!(body_json(response).await["data"]["total"], 0);

    let response = post_multipart_auth(
        app.clone(),
        &format!("/api/v1/issues/{issue_id}/comments"),
        &[("comment", "Taking over"), ("status", "in_progress")],
        &[],
        &higher.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["issue"]["status"], "in_progress");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_escalation_waits_for_threshold(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let citizen = common::seed_citizen(&pool, "c1@example.com").await;
    let app = common::build_test_app(pool.clone());

    let issue_id = file_issue(app.clone(), &citizen.token, roads).await;
    let uri = format!("/api/v1/issues/{issue_id}/escalate/category");

    backdate(&pool, issue_id, 60).await;
    let response = post_json_auth(app.clone(), &uri, json!({}), &citizen.token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ESCALATION_TOO_EARLY");
    let remaining = json["details"]["hours_remaining"].as_f64().unwrap();
    assert!((11.9..=12.0).contains(&remaining), "remaining = {remaining}");

    backdate(&pool, issue_id, 73).await;
    let response = post_json_auth(
        app,
        &uri,
        json!({ "reason": "Still broken" }),
        &citizen.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["issue"]["status"], "escalated");
    assert_eq!(json["data"]["expected_resolution_hours"], 168);
    assert_eq!(
        json["data"]["comment"]["body"],
        "[CATEGORY ESCALATION - HIGH] Reason: Still broken"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attachment_of_hidden_issue_is_not_found(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let alice = common::seed_citizen(&pool, "alice@example.com").await;
    let bob = common::seed_citizen(&pool, "bob@example.com").await;
    let app = common::build_test_app(pool);

    let category = roads.to_string();
    let response = post_multipart_auth(
        app.clone(),
        "/api/v1/issues",
        &[("category_id", category.as_str()), ("description", "Graffiti on wall")],
        &[("wall.png", "image/png", b"\x89PNG")],
        &alice.token,
    )
    .await;
    let json = body_json(response).await;
    let attachment_id = json["data"]["attachments"][0]["id"].as_i64().unwrap();

    let response = get_auth(app, &format!("/api/v1/attachments/{attachment_id}"), &bob.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_and_categories(pool: PgPool) {
    let roads = common::category_id(&pool, "Roads").await;
    let water = common::category_id(&pool, "Water Supply").await;
    let citizen = common::seed_citizen(&pool, "c1@example.com").await;
    let official = common::seed_official(&pool, "roads@city.gov", &[roads]).await;
    let higher = common::seed_higher_official(&pool, "chief@city.gov").await;
    let app = common::build_test_app(pool);

    file_issue(app.clone(), &citizen.token, roads).await;
    file_issue(app.clone(), &citizen.token, water).await;

    let response = get_auth(app.clone(), "/api/v1/dashboard/statistics", &official.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["created"], 1);

    let response = get_auth(app.clone(), "/api/v1/dashboard/statistics", &higher.token).await;
    assert_eq!(body_json(response).await["data"]["total"], 2);

    let response = get_auth(app.clone(), "/api/v1/dashboard/statistics", &citizen.token).await;
    assert_eq!(body_json(response).await["data"]["total"], 2);

    let response = get_auth(app, "/api/v1/categories", &citizen.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Roads"));
    assert!(names.contains(&"Parks"));
}
