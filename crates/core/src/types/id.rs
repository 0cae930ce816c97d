//! Newtype IDs for type-safe entity references.
//!
//! Product IDs are opaque strings: the seed catalog uses short numeric
//! strings (`"1"`, `"2"`, ...) while products created from the admin panel
//! get a generated identifier. Nothing may assume a particular shape.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a product within the catalog.
///
/// Serialized transparently as a plain JSON string so persisted catalogs and
/// model responses (`recommendedProductIds`) map onto it directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, collision-resistant product ID.
    ///
    /// Uses the simple (hyphen-free) form of a UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ::core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
