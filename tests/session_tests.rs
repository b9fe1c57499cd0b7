// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, logout and session probe tests.
//!
//! The session cookie is the only credential: login sets it, logout always
//! clears it, and the probe derives its answer from it without any remote call.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use tower::ServiceExt;

mod common;

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (app, _stub) = common::create_test_app_with_stub().await;

    let response = app.oneshot(login_request("admin", "secret")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookie_headers(&response);
    let cookie = cookies
        .iter()
        .find(|c| c.starts_with("admin_token=stub-token"))
        .unwrap_or_else(|| panic!("missing session cookie: {cookies:?}"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(!cookie.contains("Secure"));

    let body = common::body_json(response).await;
    assert_eq!(body["authenticated"], true);
}

#[tokio::test]
async fn test_login_cookie_is_secure_for_https_frontend() {
    let stub = common::StubApi::spawn().await;
    let (app, _) =
        common::create_test_app_with_frontend_url(&stub.base_url, "https://joash.example");

    let response = app.oneshot(login_request("admin", "secret")).await.unwrap();
    let cookies = set_cookie_headers(&response);
    assert!(cookies[0].contains("Secure"));
}

#[tokio::test]
async fn test_invalid_credentials_set_no_cookie() {
    let (app, _stub) = common::create_test_app_with_stub().await;

    let response = app
        .clone()
        .oneshot(login_request("admin", "wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie_headers(&response).is_empty());

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "invalid_credentials");

    let response = app.oneshot(login_request("", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_probe_reads_cookie_only() {
    // Unreachable content API: the probe must not need it
    let (app, _) = common::create_test_app("http://127.0.0.1:9/api");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/session")
                .header(header::COOKIE, common::SESSION_COOKIE)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(common::body_json(response).await["authenticated"], true);

    let response = app
        .oneshot(Request::builder().uri("/api/session").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(common::body_json(response).await["authenticated"], false);
}

#[tokio::test]
async fn test_logout_clears_cookie_when_remote_logout_fails() {
    let (app, stub) = common::create_test_app_with_stub().await;
    stub.with(|s| s.fail_logout = true);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/logout")
                .header(header::COOKIE, common::SESSION_COOKIE)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/admin");
    assert_eq!(stub.with(|s| s.logout_calls), 1);

    let cookies = set_cookie_headers(&response);
    let cookie = cookies
        .iter()
        .find(|c| c.starts_with("admin_token="))
        .unwrap_or_else(|| panic!("missing removal cookie: {cookies:?}"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_logout_without_session_skips_remote_call() {
    let (app, stub) = common::create_test_app_with_stub().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(stub.with(|s| s.logout_calls), 0);
    // No cookie was sent, so there is nothing to remove
    assert!(set_cookie_headers(&response).is_empty());
}

#[tokio::test]
async fn test_credentialed_cors_only_for_known_origins() {
    let stub = common::StubApi::spawn().await;
    let (app, _) =
        common::create_test_app_with_frontend_url(&stub.base_url, "https://joash.example");

    let cases = [
        ("https://joash.example", true),
        ("http://localhost:5173", true),
        ("http://127.0.0.1", true),
        ("http://localhost.attacker.example", false),
        ("http://127.0.0.1.attacker.example", false),
    ];
    for (origin, allowed) in cases {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/session")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let allow_origin = response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
        if allowed {
            assert_eq!(allow_origin.unwrap(), origin, "{origin}");
        } else {
            assert!(allow_origin.is_none(), "{origin}");
        }
    }
}
