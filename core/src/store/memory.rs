// core/src/store/memory.rs

use super::{cart_document_path, CartStore};
use crate::models::Cart;
use anyhow::Context;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Process-local document store.
///
/// Carts are kept as serialized JSON documents rather than as `Cart` values,
/// so the stored shape is the same one an external store would hold.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
  documents: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryCartStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Raw stored document, mostly useful to assert on the persisted shape.
  pub fn document(&self, user_id: &str) -> Option<serde_json::Value> {
    self.documents.read().get(&cart_document_path(user_id)).cloned()
  }

  /// Writes a raw document, bypassing `Cart` encoding.
  pub fn put_document(&self, user_id: &str, document: serde_json::Value) {
    self.documents.write().insert(cart_document_path(user_id), document);
  }

  pub fn len(&self) -> usize {
    self.documents.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.documents.read().is_empty()
  }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
  #[instrument(name = "InMemoryCartStore::fetch", skip(self))]
  async fn fetch(&self, user_id: &str) -> anyhow::Result<Option<Cart>> {
    let path = cart_document_path(user_id);
    let document = self.documents.read().get(&path).cloned();
    match document {
      Some(value) => {
        let cart = serde_json::from_value(value).with_context(|| format!("malformed cart document at {}", path))?;
        Ok(Some(cart))
      }
      None => {
        debug!(%path, "No cart document stored.");
        Ok(None)
      }
    }
  }

  #[instrument(name = "InMemoryCartStore::save", skip(self, cart), fields(lines = cart.len(), total = cart.total()))]
  async fn save(&self, user_id: &str, cart: &Cart) -> anyhow::Result<()> {
    let value = serde_json::to_value(cart).context("failed to encode cart document")?;
    self.documents.write().insert(cart_document_path(user_id), value);
    Ok(())
  }
}
