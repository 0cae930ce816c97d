//! Catalog products.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::Category;
use super::id::ProductId;
use super::price::Yen;

/// Highest rating a product can carry.
pub const MAX_RATING: f32 = 5.0;

/// Image used when an operator creates a product without choosing one.
pub const DEFAULT_PRODUCT_IMAGE: &str =
    "https://images.unsplash.com/photo-1541643600914-78b084683601?auto=format&fit=crop&q=80&w=800";

/// Color label used for newly created products.
pub const DEFAULT_PRODUCT_COLOR: &str = "ホワイト";

/// A purchasable product.
///
/// Owned by the catalog store. Carts hold copies, so later catalog edits do
/// not reach items already in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identity within the catalog.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price in whole yen.
    pub price: Yen,
    /// Product line.
    pub category: Category,
    /// Marketing copy.
    pub description: String,
    /// Image URI (remote URL or data URL).
    pub image: String,
    /// Color label.
    pub color: String,
    /// Average rating, 0.0 to 5.0.
    pub rating: f32,
}

/// Validation failures for operator-supplied product data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("product name must not be empty")]
    EmptyName,
    #[error("product image must not be empty")]
    EmptyImage,
    #[error("rating must be between 0 and 5 (got {0})")]
    RatingOutOfRange(String),
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
}

/// Product fields as edited in the admin panel, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: u64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub color: String,
    pub rating: f32,
}

impl Default for ProductDraft {
    /// Blank form for a new product.
    fn default() -> Self {
        Self {
            name: String::new(),
            price: 0,
            category: Category::Perfume,
            description: String::new(),
            image: DEFAULT_PRODUCT_IMAGE.to_string(),
            color: DEFAULT_PRODUCT_COLOR.to_string(),
            rating: MAX_RATING,
        }
    }
}

impl ProductDraft {
    /// Validate the draft and attach an identity.
    ///
    /// # Errors
    ///
    /// Returns `ProductError` if the name or image is blank or the rating is
    /// outside `0.0..=5.0`.
    pub fn into_product(self, id: ProductId) -> Result<Product, ProductError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ProductError::EmptyName);
        }
        let image = self.image.trim().to_string();
        if image.is_empty() {
            return Err(ProductError::EmptyImage);
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(ProductError::RatingOutOfRange(self.rating.to_string()));
        }

        Ok(Product {
            id,
            name,
            price: Yen::new(self.price),
            category: self.category,
            description: self.description.trim().to_string(),
            image,
            color: self.color.trim().to_string(),
            rating: self.rating,
        })
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.amount(),
            category: product.category,
            description: product.description.clone(),
            image: product.image.clone(),
            color: product.color.clone(),
            rating: product.rating,
        }
    }
}

/// Check that every product id in a catalog is unique.
///
/// # Errors
///
/// Returns `ProductError::DuplicateId` for the first repeated id.
pub fn validate_catalog(products: &[Product]) -> Result<(), ProductError> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(&product.id) {
            return Err(ProductError::DuplicateId(product.id.clone()));
        }
    }
    Ok(())
}
