//! `PostgreSQL` product repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use wfa_core::{Category, Price, ProductId, StoredImageName};

use super::{ProductStore, RepositoryError};
use crate::models::{Product, ProductDraft};

const PRODUCT_COLUMNS: &str =
    "id, name, category, price, description, image_filename, created_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    category: String,
    price: Decimal,
    description: Option<String>,
    image_filename: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            category,
            price,
            description: row.description,
            image: row.image_filename.map(StoredImageName::from_stored),
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Products stored in `catalog.product`.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self, category: Option<Category>) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM catalog.product
            WHERE $1::TEXT IS NULL OR category = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(category.map(Category::as_str))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM catalog.product
            WHERE id = $1
            "
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn insert(
        &self,
        draft: &ProductDraft,
        image: Option<&StoredImageName>,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO catalog.product (name, category, price, description, image_filename)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&draft.name)
        .bind(draft.category.as_str())
        .bind(draft.price.amount())
        .bind(draft.description.as_deref())
        .bind(image.map(StoredImageName::as_str))
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        image: Option<&StoredImageName>,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE catalog.product
            SET name = $2,
                category = $3,
                price = $4,
                description = $5,
                image_filename = COALESCE($6, image_filename)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(draft.category.as_str())
        .bind(draft.price.amount())
        .bind(draft.description.as_deref())
        .bind(image.map(StoredImageName::as_str))
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
