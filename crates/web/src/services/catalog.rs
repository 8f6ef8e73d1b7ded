//! Catalog service: product listing and admin-only mutations.
//!
//! Mutating operations take a [`CurrentAdmin`] as proof that the caller holds
//! an authenticated session; there is no way to call them anonymously.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use wfa_core::{Category, ProductId};

use super::images::{ImageError, ImageStore, Upload};
use crate::db::{ProductStore, RepositoryError};
use crate::models::{CurrentAdmin, Product, ProductForm};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this id.
    #[error("product not found")]
    NotFound,

    /// Category input is not one of the known categories.
    #[error("unknown category: {0:?}")]
    InvalidCategory(String),

    /// Storing the uploaded image failed.
    #[error("image error: {0}")]
    Image(#[from] ImageError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog operations over a product store and the image area.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductStore>,
    images: ImageStore,
}

impl CatalogService {
    #[must_use]
    pub fn new(products: Arc<dyn ProductStore>, images: ImageStore) -> Self {
        Self { products, images }
    }

    /// The image area this service writes uploads to.
    #[must_use]
    pub const fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Products newest first.
    ///
    /// A filter naming a known category restricts the listing; any other
    /// value, or none, lists everything.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<Product>, CatalogError> {
        let category = Category::from_filter(filter);
        if category.is_none()
            && let Some(raw) = filter
            && !raw.is_empty()
        {
            tracing::debug!(filter = raw, "Ignoring unknown category filter");
        }
        self.list_category(category).await
    }

    /// Products newest first, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list_category(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list(category).await?)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products.get(id).await?.ok_or(CatalogError::NotFound)
    }

    /// Create a product, storing the upload if one was submitted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidCategory` for an unknown category,
    /// `CatalogError::Image` if the upload cannot be written.
    #[instrument(skip_all, fields(admin = %admin.username))]
    pub async fn create(
        &self,
        admin: &CurrentAdmin,
        form: &ProductForm,
        upload: Option<&Upload>,
    ) -> Result<Product, CatalogError> {
        let draft = form
            .to_draft()
            .map_err(|e| CatalogError::InvalidCategory(e.0))?;
        let image = self.ingest(upload).await?;

        let product = self.products.insert(&draft, image.as_ref()).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Overwrite a product's fields. The image is only replaced when a new
    /// upload is present.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist,
    /// `CatalogError::InvalidCategory` for an unknown category.
    #[instrument(skip_all, fields(admin = %admin.username, product_id = %id))]
    pub async fn update(
        &self,
        admin: &CurrentAdmin,
        id: ProductId,
        form: &ProductForm,
        upload: Option<&Upload>,
    ) -> Result<Product, CatalogError> {
        let draft = form
            .to_draft()
            .map_err(|e| CatalogError::InvalidCategory(e.0))?;

        if self.products.get(id).await?.is_none() {
            return Err(CatalogError::NotFound);
        }
        let image = self.ingest(upload).await?;

        let product = self
            .products
            .update(id, &draft, image.as_ref())
            .await?
            .ok_or(CatalogError::NotFound)?;
        tracing::info!("Product updated");
        Ok(product)
    }

    /// Remove a product. Its image file is left in place.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    #[instrument(skip_all, fields(admin = %admin.username, product_id = %id))]
    pub async fn delete(&self, admin: &CurrentAdmin, id: ProductId) -> Result<(), CatalogError> {
        if !self.products.delete(id).await? {
            return Err(CatalogError::NotFound);
        }
        tracing::info!("Product deleted");
        Ok(())
    }

    /// Check that the product store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the ping fails.
    pub async fn ping(&self) -> Result<(), CatalogError> {
        Ok(self.products.ping().await?)
    }

    async fn ingest(
        &self,
        upload: Option<&Upload>,
    ) -> Result<Option<wfa_core::StoredImageName>, CatalogError> {
        match self.images.store(upload).await {
            Ok(name) => Ok(Some(name)),
            Err(ImageError::EmptyUpload) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use wfa_core::{AdminId, Username};

    use super::*;
    use crate::db::memory::MemoryProductStore;

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminId::new(1),
            username: Username::parse("wfa_admin").unwrap(),
        }
    }

    fn form(name: &str, category: &str, price: &str) -> ProductForm {
        ProductForm {
            name: name.to_owned(),
            category: category.to_owned(),
            price: Some(price.to_owned()),
            description: None,
        }
    }

    fn service(dir: &tempfile::TempDir) -> CatalogService {
        CatalogService::new(
            Arc::new(MemoryProductStore::new()),
            ImageStore::new(dir.path()),
        )
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(&dir);

        let created = catalog
            .create(&admin(), &form("Brake Pad", "parts", "49.99"), None)
            .await
            .unwrap();
        let fetched = catalog.get(created.id).await.unwrap();

        assert_eq!(fetched.name, "Brake Pad");
        assert_eq!(fetched.category, Category::Parts);
        assert_eq!(fetched.price.amount(), Decimal::new(4999, 2));
        assert_eq!(fetched.image, None);
    }

    #[tokio::test]
    async fn test_bad_price_becomes_zero() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(&dir);

        let p = catalog
            .create(&admin(), &form("Cloth", "detailing", "cheap"), None)
            .await
            .unwrap();
        assert_eq!(p.price.amount(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_category_rejected_before_upload() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(&dir);
        let upload = Upload::new("x.jpg", &b"x"[..]);

        let err = catalog
            .create(&admin(), &form("X", "tyres", "1"), Some(&upload))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCategory(c) if c == "tyres"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(&dir);
        let a = catalog.create(&admin(), &form("A", "parts", "1"), None).await.unwrap();
        let b = catalog
            .create(&admin(), &form("B", "detailing", "1"), None)
            .await
            .unwrap();

        let ids = |v: Vec<Product>| v.into_iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids(catalog.list(Some("parts")).await.unwrap()), vec![a.id]);
        assert_eq!(ids(catalog.list(Some("detailing")).await.unwrap()), vec![b.id]);
        assert_eq!(ids(catalog.list(Some("other")).await.unwrap()), vec![b.id, a.id]);
        assert_eq!(ids(catalog.list(None).await.unwrap()), vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_update_keeps_image_without_upload() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(&dir);
        let upload = Upload::new("pad.jpg", &b"img"[..]);
        let p = catalog
            .create(&admin(), &form("Pad", "parts", "5"), Some(&upload))
            .await
            .unwrap();
        let image = p.image.clone().unwrap();

        let updated = catalog
            .update(&admin(), p.id, &form("Pad v2", "parts", "6"), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "Pad v2");
        assert_eq!(updated.image, Some(image.clone()));

        let replaced = catalog
            .update(
                &admin(),
                p.id,
                &form("Pad v3", "parts", "6"),
                Some(&Upload::new("new.jpg", &b"new"[..])),
            )
            .await
            .unwrap();
        assert_ne!(replaced.image, Some(image.clone()));
        // Old file is kept.
        assert!(dir.path().join(image.as_str()).exists());
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(&dir);
        let err = catalog
            .update(&admin(), ProductId::new(99), &form("X", "parts", "1"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(&dir);
        let p = catalog.create(&admin(), &form("A", "parts", "1"), None).await.unwrap();

        catalog.delete(&admin(), p.id).await.unwrap();
        assert!(matches!(catalog.get(p.id).await, Err(CatalogError::NotFound)));
        assert!(matches!(
            catalog.delete(&admin(), p.id).await,
            Err(CatalogError::NotFound)
        ));
    }
}
