//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Adds and removes are plain form
//! posts answered with a redirect, so the page re-renders with the new
//! badge count.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::Redirect,
};
use lumina_luxe_core::{AppSection, Cart, ProductId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Nav;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Page to return to after adding.
    pub return_to: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart count response.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub nav: Nav,
    pub cart: Cart,
}

/// Only same-site absolute paths are followed; anything else goes to the shop.
fn safe_return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => AppSection::Shop.path(),
    }
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await?;
    let nav = Nav::new(Some(AppSection::Cart), AppSection::Cart.path(), cart.count());
    Ok(CartShowTemplate { nav, cart })
}

/// Add one unit of a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut cart = load_cart(&session).await?;
    cart.add(&product);
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
    tracing::debug!(product_id = %id, count = cart.count(), "Added to cart");

    Ok(Redirect::to(safe_return_path(form.return_to.as_deref())))
}

/// Remove a product's line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    let mut cart = load_cart(&session).await?;
    cart.remove(&id);
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id.as_str())]));
    Ok(Redirect::to(AppSection::Cart.path()))
}

/// Number of units in the cart, for the badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: cart.count(),
    }))
}
