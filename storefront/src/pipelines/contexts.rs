// storefront/src/pipelines/contexts.rs

//! Underlying data structs used by storefront pipelines.
//! Handlers receive these wrapped in `bakery_core::ContextData`.

use crate::services::payment_mock::MockPaymentIntent;
use crate::state::AppState;
use bakery_core::validation::CheckoutForm;
use bakery_core::{CheckoutSummary, OrderReceipt};
use uuid::Uuid;

/// Underlying data for the checkout pipeline.
#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub user_id: String,
  pub form: CheckoutForm,
  pub order_id: Uuid,
  /// Priced snapshot of the cart, taken once and charged as is.
  pub summary: Option<CheckoutSummary>,
  pub payment_intent: Option<MockPaymentIntent>,
  pub payment_succeeded: bool,
  pub payment_failure: Option<String>,
  pub cart_cleared: bool,
  /// Set when the order was paid but its lines could not be taken out of the cart.
  pub cart_clear_failure: Option<String>,
  pub receipt: Option<OrderReceipt>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, user_id: impl Into<String>, form: CheckoutForm) -> Self {
    Self {
      app_state,
      user_id: user_id.into(),
      form,
      order_id: Uuid::new_v4(),
      summary: None,
      payment_intent: None,
      payment_succeeded: false,
      payment_failure: None,
      cart_cleared: false,
      cart_clear_failure: None,
      receipt: None,
    }
  }
}
