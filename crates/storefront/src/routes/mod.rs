//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page (hero + featured products)
//! GET  /health                        - Health check
//! GET  /shop?category=                - Catalog grid with category filter
//!
//! # Cart
//! GET  /cart                          - Cart page
//! POST /cart/add                      - Add one unit (redirects to return_to)
//! POST /cart/remove                   - Remove a line (redirects to /cart)
//! GET  /cart/count                    - Badge count (JSON)
//!
//! # AI stylist
//! GET  /stylist                       - Idle stylist page
//! POST /stylist                       - Recommendation (multipart: prompt, image)
//!
//! # Concierge
//! GET  /concierge                     - Transcript page
//! POST /concierge                     - Send message (form), redirects back
//! GET  /api/concierge                 - Transcript (JSON)
//! POST /api/concierge/messages        - Send message (JSON)
//!
//! # Admin
//! GET  /admin                         - Product table
//! GET  /admin/products/new            - New product form
//! POST /admin/products                - Create product
//! GET  /admin/products/{id}/edit      - Edit form
//! POST /admin/products/{id}           - Update product
//! POST /admin/products/{id}/delete    - Delete product
//!
//! # API
//! GET  /api/catalog                   - Catalog snapshot (JSON)
//! ```

pub mod admin;
pub mod api;
pub mod cart;
pub mod concierge;
pub mod home;
pub mod layout;
pub mod shop;
pub mod stylist;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Upload limit for forms that carry an image.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/products", post(admin::create))
        .route("/products/new", get(admin::new_product))
        .route("/products/{id}", post(admin::update))
        .route("/products/{id}/edit", get(admin::edit))
        .route("/products/{id}/delete", post(admin::delete))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(api::catalog::index))
        .route("/concierge", get(concierge::api_show))
        .route("/concierge/messages", post(concierge::api_send))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/shop", get(shop::index))
        .nest("/cart", cart_routes())
        .route(
            "/stylist",
            get(stylist::show)
                .post(stylist::recommend)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/concierge",
            get(concierge::show).post(concierge::send_form),
        )
        .nest("/admin", admin_routes())
        .nest("/api", api_routes())
}
