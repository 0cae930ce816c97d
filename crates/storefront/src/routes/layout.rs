//! Page chrome shared by every template: navigation links and cart badge.

use lumina_luxe_core::AppSection;
use tower_sessions::Session;

use crate::error::Result;
use crate::models::session::load_cart;

/// One entry in the top navigation.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
    /// Carries the cart count badge.
    pub is_cart: bool,
}

/// Navigation context rendered by `base.html`.
#[derive(Debug, Clone)]
pub struct Nav {
    pub links: Vec<NavLink>,
    pub cart_count: u32,
    /// Path of the page being rendered, used as `return_to` by cart forms.
    pub current_path: String,
    pub in_concierge: bool,
}

impl Nav {
    /// Build navigation for a page, with the badge taken from `cart_count`.
    #[must_use]
    pub fn new(current: Option<AppSection>, current_path: &str, cart_count: u32) -> Self {
        let links = AppSection::ALL
            .into_iter()
            .map(|section| NavLink {
                path: section.path(),
                label: section.label(),
                active: current == Some(section),
                is_cart: section == AppSection::Cart,
            })
            .collect();

        Self {
            links,
            cart_count,
            current_path: current_path.to_string(),
            in_concierge: current_path.starts_with("/concierge"),
        }
    }

    /// Build navigation reading the cart count from the visitor's session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn load(
        session: &Session,
        current: Option<AppSection>,
        current_path: &str,
    ) -> Result<Self> {
        let cart = load_cart(session).await?;
        Ok(Self::new(current, current_path, cart.count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_active_section() {
        let nav = Nav::new(Some(AppSection::Shop), "/shop", 0);
        let active: Vec<&str> = nav
            .links
            .iter()
            .filter(|l| l.active)
            .map(|l| l.path)
            .collect();
        assert_eq!(active, vec!["/shop"]);
        assert_eq!(nav.links.len(), AppSection::ALL.len());
    }

    #[test]
    fn test_cart_link_flagged() {
        let nav = Nav::new(None, "/concierge", 3);
        let cart = nav.links.iter().find(|l| l.is_cart).expect("cart link");
        assert_eq!(cart.path, "/cart");
        assert_eq!(nav.cart_count, 3);
        assert!(nav.in_concierge);
        assert!(nav.links.iter().all(|l| !l.active));
    }
}
