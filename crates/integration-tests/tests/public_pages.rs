//! Integration tests for the public site.
//!
//! These run against an in-process server with in-memory stores; no
//! database is needed.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use wfa_integration_tests::TestApp;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;

    let live = app.get("/health").await;
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(live.text().await.unwrap(), "ok");

    let ready = app.get("/health/ready").await;
    assert_eq!(ready.status(), StatusCode::OK);
}

// ============================================================================
// Static Pages
// ============================================================================

#[tokio::test]
async fn test_landing_and_contact_render() {
    let app = TestApp::spawn().await;

    for path in ["/", "/contact"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(content_type.starts_with("text/html"), "GET {path}: {content_type}");
    }
}

#[tokio::test]
async fn test_responses_carry_security_headers_and_request_id() {
    let app = TestApp::spawn().await;
    let response = app.get("/").await;

    let headers = response.headers();
    assert!(headers.contains_key("content-security-policy"));
    assert_eq!(
        headers.get("x-content-type-options").and_then(|v| v.to_str().ok()),
        Some("nosniff")
    );
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let app = TestApp::spawn().await;
    let response = app.get("/static/css/site.css").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_filters_by_category() {
    let app = TestApp::spawn().await;
    app.seed_product("Brake Pad", "parts", "49.99").await;
    app.seed_product("Ceramic Wax", "detailing", "120").await;

    let all = app.get("/catalog").await.text().await.unwrap();
    assert!(all.contains("Brake Pad"));
    assert!(all.contains("Ceramic Wax"));

    let parts = app.get("/catalog?cat=parts").await.text().await.unwrap();
    assert!(parts.contains("Brake Pad"));
    assert!(!parts.contains("Ceramic Wax"));

    let detailing = app.get("/catalog?cat=detailing").await.text().await.unwrap();
    assert!(!detailing.contains("Brake Pad"));
    assert!(detailing.contains("Ceramic Wax"));
}

#[tokio::test]
async fn test_catalog_unknown_filter_lists_everything() {
    let app = TestApp::spawn().await;
    app.seed_product("Brake Pad", "parts", "49.99").await;
    app.seed_product("Ceramic Wax", "detailing", "120").await;

    let response = app.get("/catalog?cat=tyres").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Brake Pad"));
    assert!(body.contains("Ceramic Wax"));
}

#[tokio::test]
async fn test_catalog_lists_newest_first() {
    let app = TestApp::spawn().await;
    app.seed_product("Older Filter", "parts", "10").await;
    app.seed_product("Newer Filter", "parts", "12").await;

    let body = app.get("/catalog").await.text().await.unwrap();
    let newer = body.find("Newer Filter").unwrap();
    let older = body.find("Older Filter").unwrap();
    assert!(newer < older);
}

#[tokio::test]
async fn test_empty_catalog_renders() {
    let app = TestApp::spawn().await;
    let response = app.get("/catalog").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("No products yet."));
}

#[tokio::test]
async fn test_legacy_listing_maps_piese_to_parts() {
    let app = TestApp::spawn().await;
    app.seed_product("Brake Pad", "parts", "49.99").await;
    app.seed_product("Ceramic Wax", "detailing", "120").await;

    let body = app.get("/produse?cat=piese").await.text().await.unwrap();
    assert!(body.contains("Brake Pad"));
    assert!(!body.contains("Ceramic Wax"));
}
