//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use lumina_luxe_core::{AppSection, Product};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Nav;
use crate::error::Result;
use crate::state::AppState;

/// Number of products shown in the featured row.
pub const FEATURED_COUNT: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub featured: Vec<Product>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let nav = Nav::load(&session, Some(AppSection::Home), AppSection::Home.path()).await?;
    let featured = state
        .catalog()
        .products()
        .await
        .into_iter()
        .take(FEATURED_COUNT)
        .collect();

    Ok(HomeTemplate { nav, featured })
}
