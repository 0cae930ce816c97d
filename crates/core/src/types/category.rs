//! Product categories and the shop's category filter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Product category.
///
/// The boutique carries exactly two lines. Categories serialize as their
/// Japanese display labels (the format of persisted catalogs) and also
/// accept the English slugs used in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Fragrances.
    #[serde(rename = "香水", alias = "perfume")]
    Perfume,
    /// Skincare and cosmetics.
    #[serde(rename = "化粧品", alias = "cosmetics")]
    Cosmetics,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 2] = [Self::Perfume, Self::Cosmetics];

    /// Japanese display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfume => "香水",
            Self::Cosmetics => "化粧品",
        }
    }

    /// URL-safe slug.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Perfume => "perfume",
            Self::Cosmetics => "cosmetics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s || c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

/// The active category selection on the shop page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Show the whole catalog.
    #[default]
    All,
    /// Show a single category.
    Only(Category),
    /// A tag that names no known category; matches nothing.
    Unknown(String),
}

impl CategoryFilter {
    /// Japanese label of the "all" tag.
    pub const ALL_LABEL: &'static str = "すべて";

    /// Parse a `?category=` query value.
    ///
    /// A missing or empty value, `all` or `すべて` selects everything.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        let Some(raw) = param.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::All;
        };
        if raw == Self::ALL_LABEL || raw.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        raw.parse::<Category>()
            .map_or_else(|_| Self::Unknown(raw.to_string()), Self::Only)
    }

    /// Whether a product passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == *category,
            Self::Unknown(_) => false,
        }
    }

    /// Query value that round-trips through [`CategoryFilter::from_param`].
    #[must_use]
    pub fn param(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.slug(),
            Self::Unknown(raw) => raw,
        }
    }
}

/// Select the products in the active category, preserving catalog order.
///
/// `CategoryFilter::All` returns the catalog unchanged; an unknown tag yields
/// an empty list rather than an error.
#[must_use]
pub fn filter_by_category(catalog: &[Product], active: &CategoryFilter) -> Vec<Product> {
    catalog
        .iter()
        .filter(|product| active.matches(product))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductId, Yen};

    fn product(id: &str, category: Category) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Yen::new(1_000),
            category,
            description: String::new(),
            image: "https://example.com/p.jpg".to_string(),
            color: "ゴールド".to_string(),
            rating: 4.5,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", Category::Perfume),
            product("2", Category::Cosmetics),
            product("3", Category::Cosmetics),
            product("4", Category::Perfume),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_all_returns_catalog_unchanged() {
        let catalog = catalog();
        let filtered = filter_by_category(&catalog, &CategoryFilter::All);
        assert_eq!(filtered, catalog);
    }

    #[test]
    fn test_only_preserves_relative_order() {
        let catalog = catalog();
        let perfume = filter_by_category(&catalog, &CategoryFilter::Only(Category::Perfume));
        assert_eq!(ids(&perfume), vec!["1", "4"]);

        let cosmetics = filter_by_category(&catalog, &CategoryFilter::Only(Category::Cosmetics));
        assert_eq!(ids(&cosmetics), vec!["2", "3"]);
    }

    #[test]
    fn test_zero_matches_is_empty() {
        let catalog = vec![product("1", Category::Perfume)];
        let filtered = filter_by_category(&catalog, &CategoryFilter::Only(Category::Cosmetics));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let filter = CategoryFilter::from_param(Some("jewelry"));
        assert_eq!(filter, CategoryFilter::Unknown("jewelry".to_string()));
        assert!(filter_by_category(&catalog(), &filter).is_empty());
    }

    #[test]
    fn test_from_param() {
        assert_eq!(CategoryFilter::from_param(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_param(Some("")), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_param(Some("all")), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_param(Some("すべて")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_param(Some("香水")),
            CategoryFilter::Only(Category::Perfume)
        );
        assert_eq!(
            CategoryFilter::from_param(Some("Cosmetics")),
            CategoryFilter::Only(Category::Cosmetics)
        );
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::Perfume).expect("serialize");
        assert_eq!(json, "\"香水\"");

        let from_label: Category = serde_json::from_str("\"化粧品\"").expect("label");
        let from_slug: Category = serde_json::from_str("\"cosmetics\"").expect("slug");
        assert_eq!(from_label, Category::Cosmetics);
        assert_eq!(from_slug, Category::Cosmetics);
    }
}
