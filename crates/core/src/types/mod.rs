//! Core types for Lumina Luxe.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod category;
pub mod chat;
pub mod id;
pub mod price;
pub mod product;
pub mod recommendation;
pub mod section;

pub use cart::{Cart, CartLineItem};
pub use category::{Category, CategoryFilter, filter_by_category};
pub use chat::{ChatMessage, ChatRole, Transcript};
pub use id::ProductId;
pub use price::Yen;
pub use product::{
    DEFAULT_PRODUCT_COLOR, DEFAULT_PRODUCT_IMAGE, MAX_RATING, Product, ProductDraft, ProductError,
    validate_catalog,
};
pub use recommendation::{
    DEFAULT_IMAGE_MEDIA_TYPE, DEFAULT_STYLIST_PROMPT, ImagePayload, Recommendation,
    StylistRequest, StylistRequestError,
};
pub use section::AppSection;
