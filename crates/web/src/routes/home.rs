//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// GET /
pub async fn index() -> impl IntoResponse {
    IndexTemplate
}
