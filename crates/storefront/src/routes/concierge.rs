//! Concierge chat: an HTML transcript page plus a small JSON API.
//!
//! The visitor's conversation id is kept in the session, so the page and the
//! API share one transcript.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::Redirect,
};
use lumina_luxe_core::ChatMessage;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Nav;
use crate::error::{Result, add_breadcrumb};
use crate::models::session::ensure_concierge_id;
use crate::services::ConversationSnapshot;
use crate::services::concierge::GREETING;
use crate::state::AppState;

const CONCIERGE_PATH: &str = "/concierge";

/// Message form / JSON body.
#[derive(Debug, Deserialize)]
pub struct MessageInput {
    pub message: String,
}

/// Concierge page template.
#[derive(Template, WebTemplate)]
#[template(path = "concierge.html")]
pub struct ConciergeTemplate {
    pub nav: Nav,
    pub greeting: &'static str,
    pub messages: Vec<ChatMessage>,
    pub composing: bool,
}

async fn current_snapshot(state: &AppState, session: &Session) -> Result<ConversationSnapshot> {
    let id = ensure_concierge_id(session).await?;
    let conversation = state.concierge().conversation(id).await;
    Ok(conversation.snapshot().await)
}

async fn send_message(state: &AppState, session: &Session, text: &str) -> Result<ConversationSnapshot> {
    let id = ensure_concierge_id(session).await?;
    let conversation = state.concierge().conversation(id).await;
    let catalog = state.catalog().products().await;

    add_breadcrumb("concierge", "Message sent", None);
    Ok(state.concierge().send(&conversation, text, &catalog).await)
}

/// Display the transcript.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<ConciergeTemplate> {
    let nav = Nav::load(&session, None, CONCIERGE_PATH).await?;
    let snapshot = current_snapshot(&state, &session).await?;

    Ok(ConciergeTemplate {
        nav,
        greeting: GREETING,
        messages: snapshot.messages,
        composing: snapshot.composing,
    })
}

/// Send a message from the page form.
#[instrument(skip(state, session, form))]
pub async fn send_form(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<MessageInput>,
) -> Result<Redirect> {
    send_message(&state, &session, &form.message).await?;
    Ok(Redirect::to(CONCIERGE_PATH))
}

/// Current transcript as JSON.
#[instrument(skip(state, session))]
pub async fn api_show(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ConversationSnapshot>> {
    Ok(Json(current_snapshot(&state, &session).await?))
}

/// Send a message and return the updated transcript as JSON.
#[instrument(skip(state, session, input))]
pub async fn api_send(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<MessageInput>,
) -> Result<Json<ConversationSnapshot>> {
    Ok(Json(send_message(&state, &session, &input.message).await?))
}
