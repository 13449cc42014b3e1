// core/src/engine.rs

//! Cart mutation and pricing rules.
//!
//! Everything here is pure: mutations take `&mut Cart`, pricing takes plain
//! amounts. Persistence and identity are the service's concern.

use crate::error::{CartError, CartResult};
use crate::models::{Cart, CartItem, CheckoutSummary, ShippingMethod};
use serde::{Deserialize, Serialize};

pub const FREE_SHIPPING_THRESHOLD: i64 = 1000;
pub const FLAT_SHIPPING_FEE: i64 = 60;
pub const EXPEDITE_SURCHARGE: i64 = 100;

/// Shipping constants. Fixed configuration, never derived from the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRules {
  /// Subtotals at or above this ship free.
  pub free_shipping_threshold: i64,
  pub flat_shipping_fee: i64,
  pub expedite_surcharge: i64,
}

impl Default for PricingRules {
  fn default() -> Self {
    Self {
      free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
      flat_shipping_fee: FLAT_SHIPPING_FEE,
      expedite_surcharge: EXPEDITE_SURCHARGE,
    }
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CartPricingEngine {
  rules: PricingRules,
}

impl CartPricingEngine {
  pub fn new(rules: PricingRules) -> Self {
    Self { rules }
  }

  pub fn rules(&self) -> PricingRules {
    self.rules
  }

  /// Adds `item`, merging into an existing line for the same product.
  ///
  /// On merge only the quantity changes; the stored name, price and image are
  /// kept (first-seen metadata wins). Returns `true`, every valid add changes
  /// the cart. An add that would overflow the subtotal or unit count is
  /// refused with `InvalidItem` and the cart is left as it was.
  pub fn add_item(cart: &mut Cart, item: CartItem) -> CartResult<bool> {
    if item.quantity < 1 {
      return Err(CartError::invalid_item(format!(
        "quantity must be at least 1, got {}",
        item.quantity
      )));
    }
    if item.price < 0 {
      return Err(CartError::invalid_item(format!(
        "price must not be negative, got {}",
        item.price
      )));
    }

    let line = match cart.get(&item.product_id) {
      Some(existing) => {
        let quantity = existing
          .quantity
          .checked_add(item.quantity)
          .ok_or_else(|| CartError::invalid_item(format!("quantity for {} is out of range", item.product_id)))?;
        CartItem {
          quantity,
          ..existing.clone()
        }
      }
      None => item,
    };
    cart.put_line(line)?;
    Ok(true)
  }

  /// Sets an absolute quantity. `quantity <= 0` removes the line. Absent
  /// products are left alone. Returns whether the cart changed.
  pub fn update_quantity(cart: &mut Cart, product_id: &str, quantity: i64) -> CartResult<bool> {
    if quantity <= 0 {
      return Ok(Self::remove_item(cart, product_id));
    }
    match cart.get(product_id) {
      Some(existing) if existing.quantity != quantity => {
        let line = CartItem {
          quantity,
          ..existing.clone()
        };
        cart.put_line(line)?;
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  pub fn remove_item(cart: &mut Cart, product_id: &str) -> bool {
    cart.remove_line(product_id).is_some()
  }

  pub fn clear(cart: &mut Cart) -> bool {
    let changed = !cart.is_empty();
    cart.clear_lines();
    changed
  }

  /// The cart page's minus button: never goes below 1, so it can not remove.
  pub fn decrement_quantity(current: i64) -> i64 {
    (current - 1).max(1)
  }

  pub fn increment_quantity(current: i64) -> i64 {
    current.saturating_add(1)
  }

  /// Total number of units across all lines. Fits in an `i64` because a cart
  /// refuses lines that would overflow it.
  pub fn item_count(cart: &Cart) -> i64 {
    cart.items().map(|item| item.quantity).sum()
  }

  pub fn shipping_fee(&self, subtotal: i64) -> i64 {
    if subtotal >= self.rules.free_shipping_threshold {
      0
    } else {
      self.rules.flat_shipping_fee
    }
  }

  pub fn expedite_surcharge(&self, shipping_method: ShippingMethod) -> i64 {
    if shipping_method.is_expedited() {
      self.rules.expedite_surcharge
    } else {
      0
    }
  }

  /// Amount charged. Saturates at `i64::MAX` for subtotals at the very top of
  /// the range.
  pub fn grand_total(subtotal: i64, shipping_fee: i64, expedite_surcharge: i64) -> i64 {
    subtotal.saturating_add(shipping_fee).saturating_add(expedite_surcharge)
  }

  pub fn summarize(&self, cart: &Cart, shipping_method: ShippingMethod) -> CheckoutSummary {
    let subtotal = cart.total();
    let shipping_fee = self.shipping_fee(subtotal);
    let expedite_surcharge = self.expedite_surcharge(shipping_method);
    CheckoutSummary {
      items: cart.items().cloned().collect(),
      item_count: Self::item_count(cart),
      subtotal,
      shipping_fee,
      expedite_surcharge,
      grand_total: Self::grand_total(subtotal, shipping_fee, expedite_surcharge),
    }
  }
}

/// Shipping fee under the default rules.
pub fn compute_shipping_fee(subtotal: i64) -> i64 {
  CartPricingEngine::default().shipping_fee(subtotal)
}

pub fn compute_grand_total(subtotal: i64, shipping_fee: i64, expedite_surcharge: i64) -> i64 {
  CartPricingEngine::grand_total(subtotal, shipping_fee, expedite_surcharge)
}
