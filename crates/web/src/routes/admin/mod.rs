//! Admin panel routes.
//!
//! Every handler except the login form takes [`RequireAdminAuth`], so
//! anonymous requests are redirected to `/admin/login` before any work is
//! done.
//!
//! [`RequireAdminAuth`]: crate::middleware::RequireAdminAuth

pub mod auth;
pub mod dashboard;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router.
///
/// Product forms accept bodies up to `max_upload_bytes` so images fit.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    let product_forms = Router::new()
        .route(
            "/admin/products/new",
            get(products::new_form).post(products::create),
        )
        .route(
            "/admin/products/{id}/edit",
            get(products::edit_form).post(products::update),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", get(auth::logout))
        .route("/admin", get(dashboard::index))
        .route("/admin/products/{id}/delete", post(products::delete))
        .merge(product_forms)
}
