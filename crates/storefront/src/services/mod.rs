//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `stylist` - AI stylist recommendations (Gemini, JSON output)
//! - `concierge` - Concierge support chat (Gemini, multi-turn)
//! - `catalog_admin` - Product create/update/delete for the admin panel

pub mod catalog_admin;
pub mod concierge;
pub mod stylist;

pub use catalog_admin::{AdminError, CatalogAdminService};
pub use concierge::{Concierge, Conversation, ConversationSnapshot};
pub use stylist::{StylistError, StylistService};
