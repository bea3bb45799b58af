use axum::http::StatusCode;
use serde_json::{json, Value};

use super::harness::{decode_json, TestHarness};

#[tokio::test]
async fn get_me_creates_default_profile_from_identity() {
    let harness = TestHarness::setup();
    let response = harness
        .send("GET", "/v1/users/me", Some(("t1", "teacher")), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = decode_json(response).await;
    assert_eq!(body["uid"], "t1");
    assert_eq!(body["role"], "teacher");
    assert_eq!(body["courses"], json!([]));
}

#[tokio::test]
async fn upsert_me_merges_fields() {
    let harness = TestHarness::setup();
    let first = harness
        .send(
            "POST",
            "/v1/users/me",
            Some(("s1", "student")),
            Some(json!({ "department": "CS", "courses": ["cs101"] })),
        )
        .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = harness
        .send(
            "POST",
            "/v1/users/me",
            Some(("s1", "student")),
            Some(json!({ "courses": ["cs101", "ml201", "cs101"] })),
        )
        .await;
    let body: Value = decode_json(second).await;
    assert_eq!(body["department"], "CS");
    assert_eq!(body["role"], "student");
    assert_eq!(body["courses"], json!(["cs101", "ml201"]));

    let fetched = harness
        .send("GET", "/v1/users/me", Some(("s1", "student")), None)
        .await;
    let body: Value = decode_json(fetched).await;
    assert_eq!(body["courses"], json!(["cs101", "ml201"]));
}

#[tokio::test]
async fn profile_role_does_not_grant_cross_course_access() {
    let harness = TestHarness::setup();
    harness
        .send(
            "POST",
            "/v1/users/me",
            Some(("s1", "student")),
            Some(json!({ "role": "teacher" })),
        )
        .await;

    let response = harness
        .send(
            "POST",
            "/v1/documents:search",
            Some(("s1", "student")),
            Some(json!({ "query": "anything" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bypass_mode_identifies_e2e_user() {
    let harness = TestHarness::bypass();
    let response = harness.send("GET", "/v1/users/me", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = decode_json(response).await;
    assert_eq!(body["uid"], "e2e-user");
    assert_eq!(body["role"], "student");
}
