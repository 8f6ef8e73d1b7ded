//! Integration tests for admin login, logout and route protection.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use wfa_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, location, product_form};

// ============================================================================
// Protection
// ============================================================================

#[tokio::test]
async fn test_anonymous_admin_pages_redirect_to_login() {
    let app = TestApp::spawn_with_admin().await;
    let product = app.seed_product("Brake Pad", "parts", "49.99").await;

    for path in [
        "/admin".to_owned(),
        "/admin/products/new".to_owned(),
        format!("/admin/products/{}/edit", product.id),
    ] {
        let response = app.get(&path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "GET {path}");
        assert_eq!(location(&response).as_deref(), Some("/admin/login"));
    }
}

#[tokio::test]
async fn test_anonymous_mutations_change_nothing() {
    let app = TestApp::spawn_with_admin().await;
    let product = app.seed_product("Brake Pad", "parts", "49.99").await;

    let create = app
        .post_multipart(
            "/admin/products/new",
            product_form("Sneaky", "parts", "1", None),
        )
        .await;
    assert_eq!(location(&create).as_deref(), Some("/admin/login"));

    let delete = app
        .post_empty(&format!("/admin/products/{}/delete", product.id))
        .await;
    assert_eq!(location(&delete).as_deref(), Some("/admin/login"));

    let products = app.catalog.list(None).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Brake Pad");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_success_shows_dashboard() {
    let app = TestApp::spawn_with_admin().await;

    let response = app.post_login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/admin"));
    assert!(response.headers().contains_key(reqwest::header::SET_COOKIE));

    let dashboard = app.get("/admin").await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let body = dashboard.text().await.unwrap();
    assert!(body.contains("Login successful."));
    assert!(body.contains(ADMIN_USERNAME));

    // Flash messages are shown once.
    let again = app.get("/admin").await.text().await.unwrap();
    assert!(!again.contains("Login successful."));
}

#[tokio::test]
async fn test_login_failure_returns_to_form() {
    let app = TestApp::spawn_with_admin().await;

    for (username, password) in [
        (ADMIN_USERNAME, "wrong-password"),
        ("nobody", ADMIN_PASSWORD),
        ("", ""),
    ] {
        let response = app.post_login(username, password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/admin/login"));

        let page = app.get("/admin/login").await.text().await.unwrap();
        assert!(page.contains("Invalid login details."));

        let admin = app.get("/admin").await;
        assert_eq!(location(&admin).as_deref(), Some("/admin/login"));
    }
}

#[tokio::test]
async fn test_login_form_without_fields_is_rejected() {
    let app = TestApp::spawn_with_admin().await;

    let response = app
        .client
        .post(app.url("/admin/login"))
        .form(&[("username", ADMIN_USERNAME)])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response).as_deref(), Some("/admin/login"));
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::spawn_with_admin().await;
    app.login().await;
    assert_eq!(app.get("/admin").await.status(), StatusCode::OK);

    let response = app.get("/admin/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/admin/login"));

    let page = app.get("/admin/login").await.text().await.unwrap();
    assert!(page.contains("Logged out."));

    let admin = app.get("/admin").await;
    assert_eq!(location(&admin).as_deref(), Some("/admin/login"));
}

#[tokio::test]
async fn test_logout_without_session_is_harmless() {
    let app = TestApp::spawn_with_admin().await;

    let first = app.get("/admin/logout").await;
    assert_eq!(location(&first).as_deref(), Some("/admin/login"));
    let second = app.get("/admin/logout").await;
    assert_eq!(location(&second).as_deref(), Some("/admin/login"));

    let page = app.get("/admin/login").await;
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sessions_are_per_client() {
    let app = TestApp::spawn_with_admin().await;
    app.login().await;

    let other = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let response = other.get(app.url("/admin")).send().await.unwrap();
    assert_eq!(location(&response).as_deref(), Some("/admin/login"));
}
