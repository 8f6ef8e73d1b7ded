//! Admin management list.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, take_flashes};
use crate::models::Flash;
use crate::routes::ProductView;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub flashes: Vec<Flash>,
    pub username: String,
    pub products: Vec<ProductView>,
}

/// GET /admin
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<DashboardTemplate> {
    let products = state.catalog().list_category(None).await?;

    Ok(DashboardTemplate {
        flashes: take_flashes(&session).await,
        username: admin.username.into_inner(),
        products: products.iter().map(ProductView::from).collect(),
    })
}
