//! Read-only catalog snapshot.

use axum::{Json, extract::State};
use lumina_luxe_core::Product;
use tracing::instrument;

use crate::state::AppState;

/// The current catalog, in display order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().products().await)
}
