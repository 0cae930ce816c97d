//! Shop page: the full catalog with a category filter.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use lumina_luxe_core::{AppSection, Category, CategoryFilter, Product, filter_by_category};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Nav;
use crate::error::Result;
use crate::state::AppState;

/// Shop query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
}

/// A category button.
#[derive(Debug, Clone)]
pub struct CategoryTab {
    pub label: &'static str,
    pub param: &'static str,
    pub active: bool,
}

/// Buttons for "all" plus every category, with the active one flagged.
#[must_use]
pub fn category_tabs(active: &CategoryFilter) -> Vec<CategoryTab> {
    let all = CategoryTab {
        label: CategoryFilter::ALL_LABEL,
        param: "all",
        active: *active == CategoryFilter::All,
    };

    std::iter::once(all)
        .chain(Category::ALL.into_iter().map(|category| CategoryTab {
            label: category.label(),
            param: category.slug(),
            active: *active == CategoryFilter::Only(category),
        }))
        .collect()
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub nav: Nav,
    pub tabs: Vec<CategoryTab>,
    pub products: Vec<Product>,
}

/// Display the shop page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ShopQuery>,
) -> Result<ShopTemplate> {
    let active = CategoryFilter::from_param(query.category.as_deref());
    let products = filter_by_category(&state.catalog().products().await, &active);

    let current_path = match &active {
        CategoryFilter::All => AppSection::Shop.path().to_string(),
        filter => format!("{}?category={}", AppSection::Shop.path(), filter.param()),
    };
    let nav = Nav::load(&session, Some(AppSection::Shop), &current_path).await?;

    Ok(ShopTemplate {
        nav,
        tabs: category_tabs(&active),
        products,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_default_to_all() {
        let tabs = category_tabs(&CategoryFilter::All);
        let labels: Vec<&str> = tabs.iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["すべて", "香水", "化粧品"]);
        assert!(tabs.first().is_some_and(|t| t.active));
        assert_eq!(tabs.iter().filter(|t| t.active).count(), 1);
    }

    #[test]
    fn test_tabs_mark_selected_category() {
        let tabs = category_tabs(&CategoryFilter::Only(Category::Cosmetics));
        let active: Vec<&str> = tabs.iter().filter(|t| t.active).map(|t| t.label).collect();
        assert_eq!(active, vec!["化粧品"]);
    }

    #[test]
    fn test_unknown_filter_marks_nothing() {
        let tabs = category_tabs(&CategoryFilter::Unknown("bags".to_string()));
        assert!(tabs.iter().all(|t| !t.active));
    }
}
