// ABOUTME: HTTP integration tests for the club API router
// ABOUTME: Exercises club resolution, status codes and error bodies through the full middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

#![allow(missing_docs, clippy::unwrap_used)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_resources, ClubFixture};
use courtside::server::router;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use uuid::Uuid;

fn app(fx: &ClubFixture) -> axum::Router {
    router(create_test_resources(&fx.database))
}

#[tokio::test]
async fn test_health_needs_no_club() {
    let fx = ClubFixture::new_default().await.unwrap();

    let body: Value = AxumTestRequest::get("/health")
        .send(app(&fx))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_club_context_is_required() {
    let fx = ClubFixture::new_default().await.unwrap();

    let body: Value = AxumTestRequest::get("/api/cancellations")
        .send(app(&fx))
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .json();
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");

    AxumTestRequest::get("/api/cancellations")
        .header("x-club", "riverside")
        .send(app(&fx))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    AxumTestRequest::get("/api/cancellations")
        .header("x-club", "riverside")
        .header("x-user-id", "not-a-uuid")
        .send(app(&fx))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let body: Value = AxumTestRequest::get("/api/cancellations")
        .as_member("nowhere", fx.admin.user_id)
        .send(app(&fx))
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");

    AxumTestRequest::get("/api/cancellations")
        .as_member("riverside", Uuid::new_v4())
        .send(app(&fx))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_host_subdomain_selects_the_club() {
    let fx = ClubFixture::new_default().await.unwrap();

    AxumTestRequest::get("/api/cancellations")
        .header("host", "riverside.courtside.test")
        .header("x-user-id", &fx.admin.user_id.to_string())
        .send(app(&fx))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_cancellation_lifecycle_over_http() {
    let fx = ClubFixture::new_default().await.unwrap();

    let created: Value = AxumTestRequest::post("/api/cancellations")
        .as_member("riverside", fx.admin.user_id)
        .json(&json!({
            "scope": "week",
            "week_start": "2025-10-27",
            "week_end": "2025-10-31",
            "reason": "Half term"
        }))
        .send(app(&fx))
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(created["scope"], "week");
    assert_eq!(created["state"], "active");
    let id = created["id"].as_str().unwrap().to_owned();

    let listed: Value = AxumTestRequest::get("/api/cancellations")
        .as_member("riverside", fx.admin.user_id)
        .send(app(&fx))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(listed["total"], 1);

    let cancelled: Value = AxumTestRequest::get(
        "/api/sessions/cancelled?start=2025-10-20&end=2025-11-03",
    )
    .as_member("riverside", fx.admin.user_id)
    .send(app(&fx))
    .await
    .assert_status(StatusCode::OK)
    .json();
    assert_eq!(cancelled["total"], 1);
    assert_eq!(cancelled["sessions"][0]["date"], "2025-10-27");
    assert_eq!(cancelled["sessions"][0]["reason"], "Half term");

    AxumTestRequest::delete(&format!("/api/cancellations/{id}"))
        .as_member("riverside", fx.admin.user_id)
        .send(app(&fx))
        .await
        .assert_status(StatusCode::OK);

    let check: Value = AxumTestRequest::get(&format!(
        "/api/sessions/check?slot_id={}&date=2025-10-27",
        fx.slot.id
    ))
    .as_member("riverside", fx.admin.user_id)
    .send(app(&fx))
    .await
    .assert_status(StatusCode::OK)
    .json();
    assert_eq!(check["cancelled"], false);
}

#[tokio::test]
async fn test_validation_errors_name_the_field() {
    let fx = ClubFixture::new_default().await.unwrap();

    let body: Value = AxumTestRequest::post("/api/cancellations")
        .as_member("riverside", fx.admin.user_id)
        .json(&json!({ "scope": "session", "date": "2025-10-13" }))
        .send(app(&fx))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
    assert!(body["error"]["message"].as_str().unwrap().contains("slot_id"));

    let body: Value = AxumTestRequest::get("/api/sessions/cancelled?start=2020-01-01&end=2025-12-31")
        .as_member("riverside", fx.admin.user_id)
        .send(app(&fx))
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_coach_cannot_cancel_a_day_over_http() {
    let fx = ClubFixture::new_default().await.unwrap();

    let body: Value = AxumTestRequest::post("/api/cancellations")
        .as_member("riverside", fx.coach.user_id)
        .json(&json!({ "scope": "day", "date": "2025-10-13" }))
        .send(app(&fx))
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .json();
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_open_register_reports_creation_by_status() {
    let fx = ClubFixture::new_default().await.unwrap();
    let student = fx.enrolled_student("Ana", "Silva").await.unwrap();
    let body = json!({ "slot_id": fx.slot.id, "date": "2025-10-13" });

    let first: Value = AxumTestRequest::post("/api/registers")
        .as_member("riverside", fx.admin.user_id)
        .json(&body)
        .send(app(&fx))
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(first["created"], true);
    let register_id = first["register"]["id"].as_str().unwrap().to_owned();

    let second: Value = AxumTestRequest::post("/api/registers")
        .as_member("riverside", fx.admin.user_id)
        .json(&body)
        .send(app(&fx))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(second["created"], false);
    assert_eq!(second["register"]["id"], register_id.as_str());

    let marked: Value = AxumTestRequest::put(&format!(
        "/api/registers/{register_id}/entries/{}",
        student.id
    ))
    .as_member("riverside", fx.admin.user_id)
    .json(&json!({ "status": "present" }))
    .send(app(&fx))
    .await
    .assert_status(StatusCode::OK)
    .json();
    assert_eq!(marked["status"], "present");
    assert_eq!(marked["predicted"], false);
}

#[tokio::test]
async fn test_other_club_sees_generic_not_found() {
    let fx = ClubFixture::new_default().await.unwrap();
    let other = ClubFixture::create(&fx.database, "hilltop").await.unwrap();
    let created: Value = AxumTestRequest::post("/api/registers")
        .as_member("riverside", fx.admin.user_id)
        .json(&json!({ "slot_id": fx.slot.id, "date": "2025-10-13" }))
        .send(app(&fx))
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    let register_id = created["register"]["id"].as_str().unwrap().to_owned();

    let body: Value = AxumTestRequest::get(&format!("/api/registers/{register_id}"))
        .as_member("hilltop", other.admin.user_id)
        .send(app(&fx))
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(
        body["error"]["message"],
        "The requested resource was not found"
    );
}
