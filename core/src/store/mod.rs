// core/src/store/mod.rs

//! The document-store contract the cart service persists through.

pub mod memory;

use crate::models::Cart;
use async_trait::async_trait;

pub use memory::InMemoryCartStore;

/// External key-value document store holding one cart document per user.
///
/// There are no transactions and no concurrency token: `save` overwrites the
/// whole document, so two writers for the same user are last-write-wins.
#[async_trait]
pub trait CartStore: Send + Sync {
  /// The stored cart, or `None` when the user has no cart document yet.
  async fn fetch(&self, user_id: &str) -> anyhow::Result<Option<Cart>>;

  /// Replaces the user's cart document wholesale.
  async fn save(&self, user_id: &str, cart: &Cart) -> anyhow::Result<()>;
}

/// Document path for a user's cart.
pub fn cart_document_path(user_id: &str) -> String {
  format!("carts/{}", user_id)
}
