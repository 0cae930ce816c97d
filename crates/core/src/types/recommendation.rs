//! AI Stylist requests and recommendations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::product::Product;

/// Prompt used when the shopper uploads a photo without typing anything.
pub const DEFAULT_STYLIST_PROMPT: &str = "私に似合う最新のコレクションを提案してください。";

/// Media type assumed for uploads that don't declare one.
pub const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

/// Invalid stylist input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StylistRequestError {
    #[error("a prompt or an image is required")]
    Empty,
    #[error("uploaded image is empty")]
    EmptyImage,
    #[error("unsupported image type: {0}")]
    UnsupportedMediaType(String),
}

/// An uploaded photo to send alongside the prompt.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    media_type: String,
    data: Vec<u8>,
}

impl ImagePayload {
    /// Wrap raw image bytes.
    ///
    /// A missing media type defaults to `image/jpeg`.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is empty or the media type is not `image/*`.
    pub fn new(media_type: Option<&str>, data: Vec<u8>) -> Result<Self, StylistRequestError> {
        if data.is_empty() {
            return Err(StylistRequestError::EmptyImage);
        }
        let media_type = media_type
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MEDIA_TYPE)
            .to_ascii_lowercase();
        if !media_type.starts_with("image/") {
            return Err(StylistRequestError::UnsupportedMediaType(media_type));
        }
        Ok(Self { media_type, data })
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("media_type", &self.media_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Validated input for a stylist recommendation.
///
/// At least one of prompt text or image is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylistRequest {
    prompt: String,
    image: Option<ImagePayload>,
}

impl StylistRequest {
    /// Build a request from what the shopper submitted.
    ///
    /// A blank prompt is replaced by [`DEFAULT_STYLIST_PROMPT`] when an image
    /// is attached.
    ///
    /// # Errors
    ///
    /// Returns `StylistRequestError::Empty` when there is neither text nor an
    /// image.
    pub fn new(
        prompt: Option<&str>,
        image: Option<ImagePayload>,
    ) -> Result<Self, StylistRequestError> {
        let prompt = prompt.map(str::trim).filter(|s| !s.is_empty());
        match (prompt, image) {
            (None, None) => Err(StylistRequestError::Empty),
            (Some(text), image) => Ok(Self {
                prompt: text.to_string(),
                image,
            }),
            (None, Some(image)) => Ok(Self {
                prompt: DEFAULT_STYLIST_PROMPT.to_string(),
                image: Some(image),
            }),
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub const fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }
}

/// Structured stylist output returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Why the suggested style suits the shopper.
    pub explanation: String,
    /// Suggested products, best first. May reference ids that don't exist.
    pub recommended_product_ids: Vec<ProductId>,
    /// Free-text styling advice.
    pub styling_tips: Vec<String>,
}

impl Recommendation {
    /// Map recommended ids onto catalog entries, in recommended order.
    ///
    /// Ids with no matching product are skipped.
    #[must_use]
    pub fn resolve(&self, catalog: &[Product]) -> Vec<Product> {
        self.recommended_product_ids
            .iter()
            .filter_map(|id| catalog.iter().find(|product| product.id == *id))
            .cloned()
            .collect()
    }

    /// Recommended ids that name no catalog entry.
    #[must_use]
    pub fn unresolved_ids<'a>(&'a self, catalog: &[Product]) -> Vec<&'a ProductId> {
        self.recommended_product_ids
            .iter()
            .filter(|id| !catalog.iter().any(|product| product.id == **id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Yen};

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Yen::new(10_000),
            category: Category::Perfume,
            description: String::new(),
            image: "https://example.com/p.jpg".to_string(),
            color: "ローズ".to_string(),
            rating: 4.9,
        }
    }

    fn jpeg() -> ImagePayload {
        ImagePayload::new(Some("image/jpeg"), vec![0xFF, 0xD8, 0xFF]).expect("image")
    }

    #[test]
    fn test_request_requires_text_or_image() {
        assert_eq!(
            StylistRequest::new(None, None),
            Err(StylistRequestError::Empty)
        );
        assert_eq!(
            StylistRequest::new(Some("   "), None),
            Err(StylistRequestError::Empty)
        );
    }

    #[test]
    fn test_image_only_uses_default_prompt() {
        let request = StylistRequest::new(Some(""), Some(jpeg())).expect("valid");
        assert_eq!(request.prompt(), DEFAULT_STYLIST_PROMPT);
        assert!(request.image().is_some());
    }

    #[test]
    fn test_text_is_trimmed() {
        let request = StylistRequest::new(Some("  夜のディナーに  "), None).expect("valid");
        assert_eq!(request.prompt(), "夜のディナーに");
        assert!(request.image().is_none());
    }

    #[test]
    fn test_image_payload_validation() {
        assert_eq!(
            ImagePayload::new(Some("image/png"), Vec::new()),
            Err(StylistRequestError::EmptyImage)
        );
        assert_eq!(
            ImagePayload::new(Some("application/pdf"), vec![1]),
            Err(StylistRequestError::UnsupportedMediaType(
                "application/pdf".to_string()
            ))
        );
        let defaulted = ImagePayload::new(None, vec![1]).expect("image");
        assert_eq!(defaulted.media_type(), DEFAULT_IMAGE_MEDIA_TYPE);
    }

    #[test]
    fn test_parse_model_output() {
        let json = r#"{"explanation":"x","recommendedProductIds":["1","9"],"stylingTips":["t"]}"#;
        let rec: Recommendation = serde_json::from_str(json).expect("parse");
        assert_eq!(rec.explanation, "x");
        assert_eq!(rec.recommended_product_ids.len(), 2);
        assert_eq!(rec.styling_tips, vec!["t".to_string()]);
    }

    #[test]
    fn test_resolve_drops_unknown_ids() {
        let rec = Recommendation {
            explanation: "x".to_string(),
            recommended_product_ids: vec![ProductId::new("1"), ProductId::new("9")],
            styling_tips: vec!["t".to_string()],
        };
        let catalog = vec![product("1")];

        let resolved = rec.resolve(&catalog);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.first().map(|p| p.id.as_str()), Some("1"));
        assert_eq!(rec.unresolved_ids(&catalog), vec![&ProductId::new("9")]);
    }

    #[test]
    fn test_resolve_keeps_recommended_order() {
        let rec = Recommendation {
            explanation: String::new(),
            recommended_product_ids: vec![ProductId::new("3"), ProductId::new("1")],
            styling_tips: Vec::new(),
        };
        let catalog = vec![product("1"), product("2"), product("3")];
        let ids: Vec<String> = rec
            .resolve(&catalog)
            .into_iter()
            .map(|p| p.id.into())
            .collect();
        assert_eq!(ids, vec!["3".to_string(), "1".to_string()]);
    }
}
