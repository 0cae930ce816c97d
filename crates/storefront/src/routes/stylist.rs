//! AI stylist page.
//!
//! The form posts `prompt` text and an optional `image` file as multipart.
//! The reply is rendered in place of the idle panel; a failed model call
//! shows an apology instead of an error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Multipart, State};
use lumina_luxe_core::{
    AppSection, ImagePayload, Product, Recommendation, StylistRequest, StylistRequestError,
};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Nav;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::StylistService;
use crate::state::AppState;

/// Recommendation with product ids resolved against the catalog.
#[derive(Debug, Clone)]
pub struct StylistResultView {
    pub explanation: String,
    pub products: Vec<Product>,
    pub styling_tips: Vec<String>,
}

impl StylistResultView {
    #[must_use]
    pub fn new(recommendation: Recommendation, catalog: &[Product]) -> Self {
        let products = recommendation.resolve(catalog);
        Self {
            explanation: recommendation.explanation,
            products,
            styling_tips: recommendation.styling_tips,
        }
    }
}

/// Stylist page template.
#[derive(Template, WebTemplate)]
#[template(path = "stylist.html")]
pub struct StylistTemplate {
    pub nav: Nav,
    /// Prompt echoed back into the textarea.
    pub prompt: String,
    pub result: Option<StylistResultView>,
    /// The model was asked but produced nothing usable.
    pub failed: bool,
    /// Input problem to show above the result panel.
    pub notice: Option<String>,
}

impl StylistTemplate {
    fn idle(nav: Nav) -> Self {
        Self {
            nav,
            prompt: String::new(),
            result: None,
            failed: false,
            notice: None,
        }
    }
}

/// Shopper-facing message for rejected input.
const fn request_error_message(err: &StylistRequestError) -> &'static str {
    match err {
        StylistRequestError::Empty => "ご要望を入力するか、参考写真をアップロードしてください。",
        StylistRequestError::EmptyImage => "アップロードされた画像が空です。",
        StylistRequestError::UnsupportedMediaType(_) => "画像ファイルのみアップロードできます。",
    }
}

/// Raw fields pulled out of the multipart form.
#[derive(Debug, Default)]
struct StylistForm {
    prompt: Option<String>,
    image: Option<(Option<String>, Vec<u8>)>,
}

async fn read_form(mut multipart: Multipart) -> Result<StylistForm> {
    let mut form = StylistForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        match field.name() {
            Some("prompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.prompt = Some(text);
            }
            Some("image") => {
                let media_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                // Browsers send an empty part when no file was chosen.
                if !data.is_empty() {
                    form.image = Some((media_type, data.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Display the idle stylist page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<StylistTemplate> {
    let nav = Nav::load(&session, Some(AppSection::Stylist), AppSection::Stylist.path()).await?;
    Ok(StylistTemplate::idle(nav))
}

/// Ask the stylist for a recommendation.
#[instrument(skip(state, session, multipart))]
pub async fn recommend(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<StylistTemplate> {
    let nav = Nav::load(&session, Some(AppSection::Stylist), AppSection::Stylist.path()).await?;
    let form = read_form(multipart).await?;
    let prompt = form.prompt.clone().unwrap_or_default();

    let request = form
        .image
        .map(|(media_type, data)| ImagePayload::new(media_type.as_deref(), data))
        .transpose()
        .and_then(|image| StylistRequest::new(form.prompt.as_deref(), image));

    let request = match request {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected stylist input");
            return Ok(StylistTemplate {
                prompt,
                notice: Some(request_error_message(&e).to_string()),
                ..StylistTemplate::idle(nav)
            });
        }
    };

    add_breadcrumb(
        "stylist",
        "Recommendation requested",
        Some(&[(
            "has_image",
            if request.image().is_some() { "true" } else { "false" },
        )]),
    );

    let catalog = state.catalog().products().await;
    let recommendation = StylistService::new(state.gemini())
        .recommend(&request, &catalog)
        .await;

    let failed = recommendation.is_none();
    Ok(StylistTemplate {
        prompt,
        result: recommendation.map(|r| StylistResultView::new(r, &catalog)),
        failed,
        ..StylistTemplate::idle(nav)
    })
}

#[cfg(test)]
mod tests {
    use lumina_luxe_core::ProductId;

    use super::*;
    use crate::catalog::default_products;

    #[test]
    fn test_result_view_drops_unknown_ids() {
        let recommendation = Recommendation {
            explanation: "夜の装いに".to_string(),
            recommended_product_ids: vec![ProductId::new("2"), ProductId::new("99")],
            styling_tips: vec!["手首に一滴".to_string()],
        };

        let view = StylistResultView::new(recommendation, &default_products());
        let ids: Vec<&str> = view.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
        assert_eq!(view.styling_tips, vec!["手首に一滴".to_string()]);
    }

    #[test]
    fn test_request_error_messages_are_distinct() {
        let messages = [
            request_error_message(&StylistRequestError::Empty),
            request_error_message(&StylistRequestError::EmptyImage),
            request_error_message(&StylistRequestError::UnsupportedMediaType(
                "text/plain".to_string(),
            )),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
    }
}
