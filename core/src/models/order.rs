// core/src/models/order.rs

use super::cart::CartItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
  /// 3-5 working days.
  #[default]
  Standard,
  /// 1-2 working days, carries the expedite surcharge.
  Express,
}

impl ShippingMethod {
  pub fn is_expedited(self) -> bool {
    matches!(self, ShippingMethod::Express)
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  #[default]
  CreditCard,
  Atm,
  ConvenienceStore,
}

/// Read-only pricing snapshot handed to checkout display and order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
  pub items: Vec<CartItem>,
  pub item_count: i64,
  pub subtotal: i64,
  pub shipping_fee: i64,
  pub expedite_surcharge: i64,
  pub grand_total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
  pub order_id: Uuid,
  pub order_number: String,
  pub summary: CheckoutSummary,
  pub payment_method: PaymentMethod,
  pub shipping_method: ShippingMethod,
  pub placed_at: DateTime<Utc>,
}

/// `ORD` followed by the last eight digits of the placement time in milliseconds.
pub fn order_number(placed_at: DateTime<Utc>) -> String {
  let millis = placed_at.timestamp_millis().unsigned_abs();
  format!("ORD{:08}", millis % 100_000_000)
}
