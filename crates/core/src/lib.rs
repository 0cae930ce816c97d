//! Lumina Luxe Core - Shared domain types.
//!
//! This crate provides the types used by every Lumina Luxe component:
//! - `storefront` - Public-facing shop, AI stylist, concierge and admin panel
//! - `cli` - Command-line tools for catalog management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. Cart aggregation, category filtering, recommendation
//! resolution and the chat transcript all live here so they can be tested
//! without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Products, prices, cart, categories, chat and recommendations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
