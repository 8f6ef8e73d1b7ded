//! Admin product create/edit/delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use wfa_core::{Category, ProductId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAdminAuth, push_flash, take_flashes};
use crate::models::{Flash, Product, ProductForm};
use crate::routes::parse_product_id;
use crate::services::{CatalogError, Upload};
use crate::state::AppState;

const INVALID_CATEGORY_NOTICE: &str = "Please choose a valid category.";

// =============================================================================
// Templates
// =============================================================================

/// One `<option>` of the category select.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Shared create/edit form.
#[derive(Template, WebTemplate)]
#[template(path = "admin/product_form.html")]
pub struct ProductFormTemplate {
    pub flashes: Vec<Flash>,
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub name: String,
    pub price: String,
    pub description: String,
    pub categories: Vec<CategoryOption>,
    /// Preview of the current image (edit only).
    pub image_url: Option<String>,
}

impl ProductFormTemplate {
    fn new_product(flashes: Vec<Flash>) -> Self {
        Self {
            flashes,
            heading: "Add product",
            action: "/admin/products/new".to_owned(),
            submit_label: "Add",
            name: String::new(),
            price: String::new(),
            description: String::new(),
            categories: category_options(None),
            image_url: None,
        }
    }

    fn edit_product(flashes: Vec<Flash>, product: &Product) -> Self {
        Self {
            flashes,
            heading: "Edit product",
            action: edit_path(product.id),
            submit_label: "Save",
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone().unwrap_or_default(),
            categories: category_options(Some(product.category)),
            image_url: product.image.as_ref().map(|name| format!("/uploads/{name}")),
        }
    }
}

fn category_options(selected: Option<Category>) -> Vec<CategoryOption> {
    Category::ALL
        .iter()
        .map(|&category| CategoryOption {
            value: category.as_str(),
            label: category.label(),
            selected: selected == Some(category),
        })
        .collect()
}

fn edit_path(id: ProductId) -> String {
    format!("/admin/products/{id}/edit")
}

// =============================================================================
// Multipart
// =============================================================================

/// Read the text fields and the optional `image` file part.
///
/// A file part with an empty filename means no file was chosen.
async fn read_product_form(mut multipart: Multipart) -> Result<(ProductForm, Option<Upload>)> {
    let mut form = ProductForm::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let filename = field.file_name().map(str::to_owned).unwrap_or_default();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            if !filename.trim().is_empty() {
                upload = Some(Upload::new(filename, bytes));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        match name.as_str() {
            "name" => form.name = value,
            "category" => form.category = value,
            "price" => form.price = Some(value),
            "description" => form.description = Some(value),
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok((form, upload))
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /admin/products/new
pub async fn new_form(
    RequireAdminAuth(_admin): RequireAdminAuth,
    session: Session,
) -> impl IntoResponse {
    ProductFormTemplate::new_product(take_flashes(&session).await)
}

/// POST /admin/products/new
#[instrument(skip_all)]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let (form, upload) = read_product_form(multipart).await?;

    match state.catalog().create(&admin, &form, upload.as_ref()).await {
        Ok(_) => {
            push_flash(&session, Flash::success("Product added.")).await;
            Ok(Redirect::to("/admin").into_response())
        }
        Err(CatalogError::InvalidCategory(category)) => {
            tracing::info!(category = %category, "Rejected product with unknown category");
            push_flash(&session, Flash::danger(INVALID_CATEGORY_NOTICE)).await;
            Ok(Redirect::to("/admin/products/new").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /admin/products/{id}/edit
pub async fn edit_form(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let id = parse_product_id(&id)?;
    let product = state.catalog().get(id).await?;

    Ok(ProductFormTemplate::edit_product(
        take_flashes(&session).await,
        &product,
    ))
}

/// POST /admin/products/{id}/edit
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    let (form, upload) = read_product_form(multipart).await?;

    match state
        .catalog()
        .update(&admin, id, &form, upload.as_ref())
        .await
    {
        Ok(_) => {
            push_flash(&session, Flash::success("Product updated.")).await;
            Ok(Redirect::to("/admin").into_response())
        }
        Err(CatalogError::InvalidCategory(category)) => {
            tracing::info!(category = %category, "Rejected product with unknown category");
            push_flash(&session, Flash::danger(INVALID_CATEGORY_NOTICE)).await;
            Ok(Redirect::to(&edit_path(id)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /admin/products/{id}/delete
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_product_id(&id)?;
    state.catalog().delete(&admin, id).await?;

    push_flash(&session, Flash::warning("Product deleted.")).await;
    Ok(Redirect::to("/admin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_options_mark_selection() {
        let options = category_options(Some(Category::Detailing));
        assert_eq!(options.len(), 2);
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(options[1].value, "detailing");

        assert!(category_options(None).iter().all(|o| !o.selected));
    }
}
