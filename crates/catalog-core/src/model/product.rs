// ── Product domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};

use super::ProductId;
use crate::error::CoreError;

/// Minimum accepted length of a product name, in characters.
const MIN_NAME_LEN: usize = 3;
/// Smallest accepted price.
const MIN_PRICE: f64 = 0.01;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: String,
    pub stock: u32,
    pub rating: f64,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Known product categories.
///
/// `Product::category` stays a free string so records from other sources
/// still load; this enum is what front ends offer and validate against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Home,
    Books,
    Other,
}

/// Input for creating a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: String,
    pub stock: u32,
    pub rating: f64,
    pub tags: Vec<String>,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            ..Self::default()
        }
    }

    /// Check the fields a product form would refuse to submit.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(CoreError::ValidationFailed {
                message: format!("name must be at least {MIN_NAME_LEN} characters"),
            });
        }
        if !self.price.is_finite() || self.price < MIN_PRICE {
            return Err(CoreError::ValidationFailed {
                message: format!("price must be at least {MIN_PRICE}"),
            });
        }
        if self.category.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "category is required".into(),
            });
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(CoreError::ValidationFailed {
                message: "rating must be between 0 and 5".into(),
            });
        }
        Ok(())
    }

    /// The local stand-in shown while the create request is in flight.
    pub(crate) fn to_placeholder(&self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            category: self.category.clone(),
            image_url: self.image_url.clone(),
            stock: self.stock,
            rating: self.rating,
            tags: self.tags.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Partial update. `None` fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ProductUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
            && self.stock.is_none()
            && self.rating.is_none()
            && self.tags.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn create_defaults_optional_fields() {
        let data = ProductCreate::new("Widget", 9.99, "Other");
        assert!(data.description.is_empty());
        assert_eq!(data.stock, 0);
        assert!(data.tags.is_empty());
        assert!(data.validate().is_ok());
    }

    #[test]
    fn short_name_fails_validation() {
        let data = ProductCreate::new("ab", 9.99, "Other");
        assert!(matches!(
            data.validate(),
            Err(CoreError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn zero_price_fails_validation() {
        let data = ProductCreate::new("Widget", 0.0, "Other");
        assert!(data.validate().is_err());
    }

    #[test]
    fn missing_category_fails_validation() {
        let data = ProductCreate::new("Widget", 1.0, "  ");
        assert!(data.validate().is_err());
    }

    #[test]
    fn placeholder_carries_timestamps() {
        let now = Utc::now();
        let p = ProductCreate::new("Widget", 9.99, "Other").to_placeholder(ProductId::temporary(), now);
        assert!(p.id.is_temporary());
        assert_eq!(p.created_at, Some(now));
        assert_eq!(p.updated_at, Some(now));
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(ProductUpdate::default().is_empty());
        let update = ProductUpdate {
            stock: Some(0),
            ..ProductUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            ProductCategory::from_str("electronics").ok(),
            Some(ProductCategory::Electronics)
        );
        assert_eq!(ProductCategory::Books.to_string(), "Books");
    }
}
