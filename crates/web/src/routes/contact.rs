//! Static contact page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;

#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate;

/// GET /contact
pub async fn index() -> impl IntoResponse {
    ContactTemplate
}
