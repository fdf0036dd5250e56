//! Integration tests for web routes.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use freefeed_bff::config::Config;
use freefeed_bff::web::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test app that talks to the given mock upstream.
fn create_test_app(mock_server: &MockServer) -> Router {
    let config = Config {
        api_host: mock_server.uri(),
        ..Config::for_testing()
    };
    create_app(AppState::new(&config).expect("Failed to create app state"))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_home_page_returns_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/timelines/home"))
        .and(query_param("offset", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timelines": { "id": "t1", "name": "RiverOfNews" },
            "posts": [{ "id": "p1", "createdBy": "7", "attachments": ["a1"] }],
            "attachments": [{
                "id": "a1",
                "mediaType": "general",
                "fileName": "notes.txt",
                "fileSize": "1024",
                "url": "https://media.example/a1.txt"
            }],
            "users": [{ "id": "7", "username": "bob" }],
            "comments": [],
            "subscriptions": []
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let (status, body) = get(app, "/homepage?offset=30").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["me"], Value::Null);
    assert_eq!(body["posts"]["p1"]["attachmentIds"], json!(["a1"]));
    assert_eq!(body["attachments"]["a1"]["fileName"], "notes.txt");
    assert_eq!(body["users"]["7"]["username"], "bob");
    assert_eq!(body["comments"], json!({}));
    assert_eq!(body["feeds"], json!({}));
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/timelines/home"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "err": "Boom" })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let (status, body) = get(app, "/homepage").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "message": "Boom" }));
}

#[tokio::test]
async fn test_post_page_not_found_degrades() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/posts/99"))
        .and(query_param("maxLikes", "all"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "err": "Not found" })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let (status, body) = get(app, "/postpage/99?maxLikes=all").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["posts"]["99"],
        json!({ "errorCode": 404, "errorMessage": "Not found" })
    );
    assert_eq!(body["users"], json!({}));
}

#[tokio::test]
async fn test_search_page_forwards_query_and_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/users/whoami"))
        .and(header_matcher("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": { "id": "42", "username": "me" },
            "subscriptions": []
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/search"))
        .and(query_param("qs", "from:bob"))
        .and(query_param("offset", "0"))
        .and(header_matcher("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [],
            "users": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/searchpage?q=from%3Abob&offset=nope")
                .header(header::AUTHORIZATION, "Bearer abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["me"]["id"], "42");
    assert_eq!(body["users"]["42"]["username"], "me");
    assert_eq!(body["attachments"], Value::Null);
}

#[tokio::test]
async fn test_cors_reflects_origin() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header(header::ORIGIN, "https://client.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("https://client.example")
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    let (status, _) = get(app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let app = create_app(AppState::new(&Config::for_testing()).expect("Failed to create app state"));

    let (status, body) = get(app, "/userpage/bob").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.starts_with("upstream request failed"), "got {message:?}");
}
