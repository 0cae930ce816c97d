//! Session-stored visitor state.

use lumina_luxe_core::Cart;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::Result;

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the visitor's concierge conversation id.
    pub const CONCIERGE_ID: &str = "concierge_id";
}

/// Load the visitor's cart, or an empty one.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Save the visitor's cart.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// The visitor's concierge conversation id, if one was started.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn concierge_id(session: &Session) -> Result<Option<Uuid>> {
    Ok(session.get::<Uuid>(keys::CONCIERGE_ID).await?)
}

/// The visitor's concierge conversation id, assigning a new one if needed.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn ensure_concierge_id(session: &Session) -> Result<Uuid> {
    if let Some(id) = concierge_id(session).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(keys::CONCIERGE_ID, id).await?;
    Ok(id)
}
