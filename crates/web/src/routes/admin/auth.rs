//! Admin login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, log_in, log_out, push_flash, take_flashes};
use crate::models::{CurrentAdmin, Flash};
use crate::services::AuthError;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub flashes: Vec<Flash>,
}

/// GET /admin/login
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        flashes: take_flashes(&session).await,
    }
}

/// POST /admin/login
///
/// Unknown users and wrong passwords get the same notice.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state
        .auth()
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(identity) => {
            log_in(&session, &CurrentAdmin::from(&identity)).await?;
            tracing::info!(admin_id = %identity.id, "Admin logged in");
            push_flash(&session, Flash::success("Login successful.")).await;
            Ok(Redirect::to("/admin").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Admin login failed");
            push_flash(&session, Flash::danger("Invalid login details.")).await;
            Ok(Redirect::to("/admin/login").into_response())
        }
        Err(e) => Err(AppError::Auth(e)),
    }
}

/// GET /admin/logout
///
/// Safe to repeat: an anonymous session is just sent back to the login page.
pub async fn logout(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    session: Session,
) -> Result<Redirect> {
    if let Some(admin) = admin {
        log_out(&session).await?;
        tracing::info!(admin_id = %admin.id, "Admin logged out");
        push_flash(&session, Flash::info("Logged out.")).await;
    }
    Ok(Redirect::to("/admin/login"))
}
