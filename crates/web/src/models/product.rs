//! Catalog product types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wfa_core::{Category, CategoryError, Price, ProductId, StoredImageName};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, immutable ID.
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Price,
    pub description: Option<String>,
    /// Name of the product photo inside the image area.
    pub image: Option<StoredImageName>,
    /// Immutable creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Editable product fields, as submitted through the admin forms.
///
/// Used for both creation and update. The image reference is handled
/// separately because an update without an upload keeps the old image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category: Category,
    pub price: Price,
    pub description: Option<String>,
}

impl ProductDraft {
    /// Build a draft from raw form values.
    ///
    /// Text is trimmed and a blank description becomes `None`. The price is
    /// parsed leniently (zero on bad input).
    #[must_use]
    pub fn from_form(
        name: &str,
        category: Category,
        price: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        Self {
            name: name.trim().to_owned(),
            category,
            price: Price::parse_lenient(price),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_owned),
        }
    }
}

/// Raw text fields of a product form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub price: Option<String>,
    pub description: Option<String>,
}

impl ProductForm {
    /// Validate the category and normalize the remaining fields.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError` if the category is not a known one.
    pub fn to_draft(&self) -> Result<ProductDraft, CategoryError> {
        let category: Category = self.category.trim().parse()?;
        Ok(ProductDraft::from_form(
            &self.name,
            category,
            self.price.as_deref(),
            self.description.as_deref(),
        ))
    }
}
