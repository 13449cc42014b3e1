// core/src/models/cart.rs

use crate::error::{CartError, CartResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One product's line within a cart. Name, price and image are copied from the
/// catalog at the time of the first add and are not linked back to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub product_id: String,
  pub name: String,
  /// Unit price in the smallest currency unit.
  pub price: i64,
  pub quantity: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
}

impl CartItem {
  pub fn new(product_id: impl Into<String>, name: impl Into<String>, price: i64, quantity: i64) -> Self {
    Self {
      product_id: product_id.into(),
      name: name.into(),
      price,
      quantity,
      image: None,
    }
  }

  pub fn with_image(mut self, image: impl Into<String>) -> Self {
    self.image = Some(image.into());
    self
  }

  /// `price * quantity`, or `None` when it does not fit in an `i64`.
  pub fn line_total(&self) -> Option<i64> {
    self.price.checked_mul(self.quantity)
  }
}

/// A user's cart: line items keyed by product id plus the derived subtotal.
///
/// `total` always equals the sum of `price * quantity` over `items`, and both
/// that sum and the unit count fit in an `i64`. Lines only change through
/// `put_line`/`remove_line`, which keep the total exact; a line that would
/// push either sum out of range is refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartDocument", into = "CartDocument")]
pub struct Cart {
  items: BTreeMap<String, CartItem>,
  total: i64,
}

/// Stored shape: `{ "items": { "<productId>": CartItem }, "total": n }`.
#[derive(Serialize, Deserialize)]
struct CartDocument {
  #[serde(default)]
  items: BTreeMap<String, CartItem>,
  #[serde(default)]
  total: i64,
}

impl TryFrom<CartDocument> for Cart {
  type Error = CartError;

  fn try_from(doc: CartDocument) -> Result<Self, Self::Error> {
    let mut cart = Cart::default();
    for (key, mut item) in doc.items {
      if item.quantity < 1 {
        continue;
      }
      if item.price < 0 {
        return Err(CartError::invalid_item(format!(
          "stored line {} has negative price {}",
          key, item.price
        )));
      }
      // the map key is the identity of the line
      item.product_id = key;
      cart.put_line(item)?;
    }
    Ok(cart)
  }
}

impl From<Cart> for CartDocument {
  fn from(cart: Cart) -> Self {
    CartDocument {
      items: cart.items,
      total: cart.total,
    }
  }
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Subtotal: sum of `price * quantity`, shipping excluded.
  pub fn total(&self) -> i64 {
    self.total
  }

  pub fn get(&self, product_id: &str) -> Option<&CartItem> {
    self.items.get(product_id)
  }

  pub fn contains(&self, product_id: &str) -> bool {
    self.items.contains_key(product_id)
  }

  /// Line items ordered by product id.
  pub fn items(&self) -> impl Iterator<Item = &CartItem> {
    self.items.values()
  }

  /// Number of distinct products.
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Inserts or replaces the line for `item.product_id`.
  ///
  /// Fails with `InvalidItem`, leaving the cart untouched, when the new
  /// subtotal or unit count would overflow.
  pub(crate) fn put_line(&mut self, item: CartItem) -> CartResult<()> {
    let line_total = item
      .line_total()
      .ok_or_else(|| CartError::invalid_item(format!("line total for {} is out of range", item.product_id)))?;
    let others = self.items.values().filter(|existing| existing.product_id != item.product_id);
    let (others_total, others_units) = others
      .map(|existing| (existing.price * existing.quantity, existing.quantity))
      .fold((0i64, 0i64), |(total, units), (line, quantity)| (total + line, units + quantity));
    let total = others_total
      .checked_add(line_total)
      .ok_or_else(|| CartError::invalid_item("cart subtotal is out of range"))?;
    others_units
      .checked_add(item.quantity)
      .ok_or_else(|| CartError::invalid_item("cart unit count is out of range"))?;

    self.items.insert(item.product_id.clone(), item);
    self.total = total;
    Ok(())
  }

  pub(crate) fn remove_line(&mut self, product_id: &str) -> Option<CartItem> {
    let removed = self.items.remove(product_id)?;
    self.total -= removed.price * removed.quantity;
    Some(removed)
  }

  pub(crate) fn clear_lines(&mut self) {
    self.items.clear();
    self.total = 0;
  }
}
