mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use campus_activity_server::routes::create_routes;
use campus_activity_server::AppState;

use common::{create_upcoming_event, create_user};

fn app(pool: &PgPool) -> Router {
    create_routes(AppState::new(pool.clone()))
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

fn post_json(path: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[sqlx::test]
async fn health_check_reports_ok(pool: PgPool) {
    let response = app(&pool).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("ok"));
}

#[sqlx::test]
async fn event_listing_is_open_and_paginated(pool: PgPool) {
    let organizer = create_user(&pool, "organizer").await;
    create_upcoming_event(&pool, &organizer, "Open day", 24, 50).await;

    let response = app(&pool).oneshot(get("/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["count"], json!(1));
    assert_eq!(body["data"]["results"][0]["title"], json!("Open day"));
    assert_eq!(body["data"]["results"][0]["is_registered"], json!(false));
}

#[sqlx::test]
async fn writes_require_authentication(pool: PgPool) {
    let response = app(&pool)
        .oneshot(post_json("/events", None, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("AUTH_ERROR"));
}

#[sqlx::test]
async fn unknown_tokens_are_rejected_everywhere(pool: PgPool) {
    let request = Request::builder()
        .uri("/events")
        .header(header::AUTHORIZATION, "Bearer bogus")
        .body(Body::empty())
        .unwrap();

    let response = app(&pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn event_creation_round_trips(pool: PgPool) {
    let organizer = create_user(&pool, "organizer").await;
    let start_time = Utc::now() + Duration::days(1);

    let payload = json!({
        "title": "Career fair",
        "description": "Meet employers",
        "location": "Gym",
        "start_time": start_time.to_rfc3339(),
        "end_time": (start_time + Duration::hours(4)).to_rfc3339(),
        "capacity": 300,
    });

    let response = app(&pool)
        .oneshot(post_json("/events", Some(&organizer.api_token), payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], json!("Career fair"));
    assert_eq!(body["data"]["organizer"]["username"], json!("organizer"));
    assert_eq!(body["data"]["status"], json!("published"));
}

#[sqlx::test]
async fn invalid_event_payload_is_a_400(pool: PgPool) {
    let organizer = create_user(&pool, "organizer").await;
    let start_time = Utc::now() + Duration::days(1);

    let payload = json!({
        "title": "Backwards",
        "description": "Ends before it starts",
        "location": "Gym",
        "start_time": start_time.to_rfc3339(),
        "end_time": (start_time - Duration::hours(1)).to_rfc3339(),
    });

    let response = app(&pool)
        .oneshot(post_json("/events", Some(&organizer.api_token), payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[sqlx::test]
async fn registration_endpoint_enforces_conflicts(pool: PgPool) {
    let organizer = create_user(&pool, "organizer").await;
    let attendee = create_user(&pool, "attendee").await;
    let event_id = create_upcoming_event(&pool, &organizer, "Workshop", 24, 50).await;

    let response = app(&pool)
        .oneshot(post_json(
            &format!("/events/{event_id}/register"),
            Some(&attendee.api_token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["event"]["is_registered"], json!(true));
    assert_eq!(body["data"]["attended"], json!(false));

    let repeat = app(&pool)
        .oneshot(post_json(
            &format!("/events/{event_id}/register"),
            Some(&attendee.api_token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(repeat.status(), StatusCode::BAD_REQUEST);

    let body = body_json(repeat).await;
    assert_eq!(body["error"]["code"], json!("CONFLICT"));
}

#[sqlx::test]
async fn bookmark_removal_always_returns_no_content(pool: PgPool) {
    let organizer = create_user(&pool, "organizer").await;
    let reader = create_user(&pool, "reader").await;
    let event_id = create_upcoming_event(&pool, &organizer, "Lecture", 24, 50).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/events/{event_id}/bookmark"))
        .header(header::AUTHORIZATION, format!("Bearer {}", reader.api_token))
        .body(Body::empty())
        .unwrap();

    let response = app(&pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test]
async fn unknown_event_is_a_404(pool: PgPool) {
    let response = app(&pool)
        .oneshot(get(&format!("/events/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
}

#[sqlx::test]
async fn my_registrations_require_authentication(pool: PgPool) {
    let response = app(&pool).oneshot(get("/my-registrations")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
