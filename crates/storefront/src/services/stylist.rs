//! AI stylist recommendations.
//!
//! One request per submission: the condensed catalog goes into the system
//! instruction, the shopper's text (and optional photo) form the user turn,
//! and the model must answer with JSON matching [`response_schema`].

use lumina_luxe_core::{Product, Recommendation, StylistRequest};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::gemini::{Content, GeminiClient, GeminiError, GenerateContentRequest, GenerationConfig, Part};

const PERSONA: &str = "あなたは「Lumina Luxe」の高級パーソナルスタイリストです。\
ユーザーの要望やファッションの好みを分析し、私たちのカタログから最適な1〜3点の商品を提案してください。";

const OUTPUT_FORMAT: &str = r#"必ず以下のJSON形式で、日本語で回答してください：
{
  "explanation": "なぜそのスタイルがユーザーに合うのか、洗練されたエレガントな日本語で解説してください。",
  "recommendedProductIds": ["id1", "id2"],
  "stylingTips": ["着こなしのアドバイス1", "着こなしのアドバイス2"]
}"#;

/// Errors from a recommendation attempt.
#[derive(Debug, Error)]
pub enum StylistError {
    /// The Gemini call failed.
    #[error("Gemini error: {0}")]
    Gemini(#[from] GeminiError),

    /// The model's text was not a valid recommendation.
    #[error("malformed recommendation: {0}")]
    MalformedResponse(String),
}

/// Catalog fields the stylist is shown.
#[derive(Serialize)]
struct CatalogEntry<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    description: &'a str,
}

/// Serialize the `id, name, category, description` projection of the catalog.
#[must_use]
pub fn catalog_context(catalog: &[Product]) -> String {
    let entries: Vec<CatalogEntry<'_>> = catalog
        .iter()
        .map(|p| CatalogEntry {
            id: p.id.as_str(),
            name: &p.name,
            category: p.category.label(),
            description: &p.description,
        })
        .collect();
    serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
}

/// Stylist system instruction for the given catalog.
#[must_use]
pub fn system_instruction(catalog: &[Product]) -> String {
    format!(
        "{PERSONA}\n\nカタログ: {}\n\n{OUTPUT_FORMAT}",
        catalog_context(catalog)
    )
}

/// Schema the model's JSON output must follow.
#[must_use]
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "explanation": { "type": "STRING" },
            "recommendedProductIds": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "stylingTips": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["explanation", "recommendedProductIds", "stylingTips"]
    })
}

/// Build the `generateContent` request for a stylist submission.
#[must_use]
pub fn build_request(request: &StylistRequest, catalog: &[Product]) -> GenerateContentRequest {
    let mut parts = vec![Part::text(request.prompt())];
    if let Some(image) = request.image() {
        parts.push(Part::image(image));
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        system_instruction: Some(Content::system(system_instruction(catalog))),
        generation_config: Some(GenerationConfig::json(response_schema())),
    }
}

/// Parse the model's text as a recommendation.
///
/// Tolerates a Markdown code fence around the JSON.
///
/// # Errors
///
/// Returns `StylistError::MalformedResponse` if the text isn't a
/// recommendation object.
pub fn parse_recommendation(text: &str) -> Result<Recommendation, StylistError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim()).map_err(|e| StylistError::MalformedResponse(e.to_string()))
}

/// Stylist service over a Gemini client.
pub struct StylistService<'a> {
    gemini: &'a GeminiClient,
}

impl<'a> StylistService<'a> {
    /// Create a new stylist service.
    #[must_use]
    pub const fn new(gemini: &'a GeminiClient) -> Self {
        Self { gemini }
    }

    /// Ask the model for a recommendation.
    ///
    /// # Errors
    ///
    /// Returns `StylistError::Gemini` if the call fails or yields no text and
    /// `StylistError::MalformedResponse` if the JSON doesn't parse.
    #[instrument(skip(self, request, catalog), fields(has_image = request.image().is_some()))]
    pub async fn try_recommend(
        &self,
        request: &StylistRequest,
        catalog: &[Product],
    ) -> Result<Recommendation, StylistError> {
        let text = self
            .gemini
            .generate_text(&build_request(request, catalog))
            .await?;
        let recommendation = parse_recommendation(&text)?;

        let unknown = recommendation.unresolved_ids(catalog);
        if !unknown.is_empty() {
            tracing::debug!(?unknown, "Recommendation references unknown products");
        }

        Ok(recommendation)
    }

    /// Ask the model for a recommendation, collapsing any failure to `None`.
    pub async fn recommend(
        &self,
        request: &StylistRequest,
        catalog: &[Product],
    ) -> Option<Recommendation> {
        match self.try_recommend(request, catalog).await {
            Ok(recommendation) => Some(recommendation),
            Err(e) => {
                tracing::warn!(error = %e, "Stylist recommendation failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lumina_luxe_core::ImagePayload;

    use super::*;
    use crate::catalog::default_products;

    #[test]
    fn test_catalog_context_is_condensed() {
        let context = catalog_context(&default_products());
        let entries: Vec<serde_json::Value> = serde_json::from_str(&context).expect("json");

        assert_eq!(entries.len(), 6);
        let first = entries.first().and_then(|v| v.as_object()).expect("object");
        let mut keys: Vec<&str> = first.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["category", "description", "id", "name"]);
        assert_eq!(first["category"], "香水");
    }

    #[test]
    fn test_request_shape_with_image() {
        let image = ImagePayload::new(Some("image/jpeg"), vec![0xFF, 0xD8]).expect("image");
        let request = StylistRequest::new(None, Some(image)).expect("request");
        let built = build_request(&request, &default_products());
        let json = serde_json::to_value(&built).expect("serialize");

        let parts = json["contents"][0]["parts"].as_array().expect("parts");
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts.first().map(|p| p["text"].clone()),
            Some(serde_json::json!("私に似合う最新のコレクションを提案してください。"))
        );
        assert_eq!(parts.get(1).map(|p| p["inlineData"]["mimeType"].clone()), Some(serde_json::json!("image/jpeg")));
        assert_eq!(
            json["generationConfig"]["responseSchema"]["required"],
            serde_json::json!(["explanation", "recommendedProductIds", "stylingTips"])
        );
        let system = json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .expect("system text");
        assert!(system.contains("Lumina Luxe"));
        assert!(system.contains("ルミナ・オー・ド・パルファム"));
    }

    #[test]
    fn test_text_only_request_has_one_part() {
        let request = StylistRequest::new(Some("夏のデートに"), None).expect("request");
        let built = build_request(&request, &default_products());
        assert_eq!(built.contents.first().map(|c| c.parts.len()), Some(1));
    }

    #[test]
    fn test_parse_recommendation() {
        let rec = parse_recommendation(
            r#"{"explanation":"上品","recommendedProductIds":["1","4"],"stylingTips":["夜に"]}"#,
        )
        .expect("parse");
        assert_eq!(rec.recommended_product_ids.len(), 2);

        let fenced = parse_recommendation(
            "```json\n{\"explanation\":\"x\",\"recommendedProductIds\":[],\"stylingTips\":[]}\n```",
        )
        .expect("fenced");
        assert_eq!(fenced.explanation, "x");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_recommendation("申し訳ありません"),
            Err(StylistError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_recommendation(r#"{"explanation":"missing fields"}"#),
            Err(StylistError::MalformedResponse(_))
        ));
    }
}
