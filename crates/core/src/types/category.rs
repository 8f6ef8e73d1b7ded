//! Product category.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// Classification tag on a product.
///
/// The catalog only knows two kinds of products: spare parts and detailing
/// supplies/services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Spare parts.
    Parts,
    /// Detailing products and services.
    Detailing,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 2] = [Self::Parts, Self::Detailing];

    /// Stable identifier used in URLs, forms and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parts => "parts",
            Self::Detailing => "detailing",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Parts => "Parts",
            Self::Detailing => "Detailing",
        }
    }

    /// Interpret a catalog filter value.
    ///
    /// Returns `None` ("show everything") for a missing filter and for any
    /// value that does not name a known category.
    #[must_use]
    pub fn from_filter(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| v.parse().ok())
    }

    /// Like [`Category::from_filter`], but also accepts the Romanian
    /// `piese` spelling used by old `/produse` links.
    #[must_use]
    pub fn from_legacy_filter(value: Option<&str>) -> Option<Self> {
        match value {
            Some("piese") => Some(Self::Parts),
            other => Self::from_filter(other),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parts" => Ok(Self::Parts),
            "detailing" => Ok(Self::Detailing),
            _ => Err(CategoryError(s.to_owned())),
        }
    }
}
