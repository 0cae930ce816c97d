//! Google Gemini API integration.
//!
//! Used by the AI stylist (schema-constrained JSON output) and the
//! concierge chat (multi-turn text).

pub mod client;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};
