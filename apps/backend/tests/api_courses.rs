//! Catalog browsing API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::fixtures;
use common::TestContext;

/// Test the dashboard lists a created subject.
#[tokio::test]
#[ignore = "requires database"]
async fn test_dashboard_lists_subjects() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let name = fixtures::unique_name("dashboard-subject");
    let subject = ctx.create_subject(&name).await;

    let response = server.get("/api/dashboard").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let subjects = body["subjects"].as_array().unwrap();
    assert!(subjects.iter().any(|s| s["name"] == name.as_str()));
    assert_eq!(body["total_subjects"], subjects.len());

    ctx.cleanup_subject(subject.id).await;
}

/// Test dashboard search filters by substring, case-insensitively.
#[tokio::test]
#[ignore = "requires database"]
async fn test_dashboard_search() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let name = fixtures::unique_name("Anatomy");
    let subject = ctx.create_subject(&name).await;
    let other = ctx.create_subject(&fixtures::unique_name("Physics")).await;

    let response = server
        .get("/api/dashboard")
        .add_query_param("search", "anatomy")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let subjects = body["subjects"].as_array().unwrap();
    assert!(subjects.iter().any(|s| s["name"] == name.as_str()));
    assert!(!subjects.iter().any(|s| s["id"] == other.id.to_string()));

    ctx.cleanup_subject(subject.id).await;
    ctx.cleanup_subject(other.id).await;
}

/// Test disabled subjects are hidden unless include_disabled is set.
#[tokio::test]
#[ignore = "requires database"]
async fn test_dashboard_hides_disabled_subjects() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let name = fixtures::unique_name("hidden-subject");
    let subject = ctx.create_subject(&name).await;
    ctx.db.set_subject_active(subject.id, false).await.unwrap();

    let response = server.get("/api/dashboard").await;
    let body: serde_json::Value = response.json();
    let subjects = body["subjects"].as_array().unwrap();
    assert!(!subjects.iter().any(|s| s["id"] == subject.id.to_string()));

    let response = server
        .get("/api/dashboard")
        .add_query_param("include_disabled", "true")
        .await;
    let body: serde_json::Value = response.json();
    let subjects = body["subjects"].as_array().unwrap();
    assert!(subjects.iter().any(|s| s["id"] == subject.id.to_string()));

    ctx.cleanup_subject(subject.id).await;
}

/// Test course detail includes modules, submodules, and question counts.
#[tokio::test]
#[ignore = "requires database"]
async fn test_course_detail() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let name = fixtures::unique_name("course");
    let subject = ctx.create_subject(&name).await;
    let module_id = ctx.create_module(subject.id, "Module 1").await;
    let submodule = ctx.create_submodule(module_id, "Quiz 1").await;
    ctx.seed_questions(submodule.id, 3).await;

    let response = server.get(&format!("/api/courses/{name}")).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["subject"]["id"], subject.id.to_string());
    assert_eq!(body["total_modules"], 1);

    let module = &body["modules"][0];
    assert_eq!(module["total_sub_modules"], 1);
    assert_eq!(module["sub_modules"][0]["question_count"], 3);

    ctx.cleanup_subject(subject.id).await;
}

/// Test course detail lookup is case-insensitive.
#[tokio::test]
#[ignore = "requires database"]
async fn test_course_detail_case_insensitive() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let name = fixtures::unique_name("MixedCase");
    let subject = ctx.create_subject(&name).await;

    let response = server.get(&format!("/api/courses/{}", name.to_lowercase())).await;

    response.assert_status_ok();

    ctx.cleanup_subject(subject.id).await;
}

/// Test unknown subject returns 404.
#[tokio::test]
#[ignore = "requires database"]
async fn test_course_detail_not_found() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/api/courses/no-such-subject-ever").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

/// Test module submodule listing and its 404 on empty modules.
#[tokio::test]
#[ignore = "requires database"]
async fn test_module_submodules() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let subject = ctx.create_subject(&fixtures::unique_name("subject")).await;
    let full_module = ctx.create_module(subject.id, "Full").await;
    let empty_module = ctx.create_module(subject.id, "Empty").await;
    ctx.create_submodule(full_module, "Quiz A").await;
    ctx.create_submodule(full_module, "Quiz B").await;

    let response = server
        .get(&format!("/api/modules/submodules/{full_module}"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_sub_modules"], 2);

    let response = server
        .get(&format!("/api/modules/submodules/{empty_module}"))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_subject(subject.id).await;
}

/// Test keyset pagination walks every question exactly once, in order.
#[tokio::test]
#[ignore = "requires database"]
async fn test_question_pagination() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let name = fixtures::unique_name("paged");
    let subject = ctx.create_subject(&name).await;
    let module_id = ctx.create_module(subject.id, "Module").await;
    let submodule = ctx.create_submodule(module_id, "Quiz").await;
    let seeded = ctx.seed_questions(submodule.id, 5).await;

    let mut seen: Vec<i64> = Vec::new();
    let mut cursor: Option<i64> = None;

    loop {
        let mut request = server
            .get(&format!("/api/courses/{name}/{}", submodule.id))
            .add_query_param("limit", "2");
        if let Some(c) = cursor {
            request = request.add_query_param("last_question_id", c.to_string());
        }

        let response = request.await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();

        assert_eq!(body["pagination"]["total_questions"], 5);
        let questions = body["questions"].as_array().unwrap();
        assert!(questions.len() <= 2);
        for q in questions {
            seen.push(q["id"].as_i64().unwrap());
        }

        if body["pagination"]["has_more"].as_bool().unwrap() {
            cursor = Some(body["pagination"]["next_cursor"].as_i64().unwrap());
        } else {
            break;
        }
    }

    assert_eq!(seen, seeded);

    ctx.cleanup_subject(subject.id).await;
}

/// Test a submodule outside the named subject returns 404.
#[tokio::test]
#[ignore = "requires database"]
async fn test_question_page_wrong_subject() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let subject_a = ctx.create_subject(&fixtures::unique_name("subject-a")).await;
    let subject_b = ctx.create_subject(&fixtures::unique_name("subject-b")).await;
    let module_b = ctx.create_module(subject_b.id, "Module").await;
    let submodule_b = ctx.create_submodule(module_b, "Quiz").await;

    let response = server
        .get(&format!("/api/courses/{}/{}", subject_a.name, submodule_b.id))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_subject(subject_a.id).await;
    ctx.cleanup_subject(subject_b.id).await;
}
