//! Public product catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use wfa_core::Category;

use super::ProductView;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Query parameters for the catalog page.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub cat: Option<String>,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub products: Vec<ProductView>,
    /// Active filter (`parts`/`detailing`), empty for "all".
    pub active: &'static str,
}

/// GET /catalog
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogTemplate> {
    let products = state.catalog().list(query.cat.as_deref()).await?;
    let active = Category::from_filter(query.cat.as_deref());
    Ok(render(&products, active))
}

/// GET /produse
///
/// Old links use `cat=piese` for parts.
#[instrument(skip(state))]
pub async fn legacy_index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogTemplate> {
    let category = Category::from_legacy_filter(query.cat.as_deref());
    let products = state.catalog().list_category(category).await?;
    Ok(render(&products, category))
}

fn render(products: &[crate::models::Product], active: Option<Category>) -> CatalogTemplate {
    CatalogTemplate {
        products: products.iter().map(ProductView::from).collect(),
        active: active.map_or("", Category::as_str),
    }
}
