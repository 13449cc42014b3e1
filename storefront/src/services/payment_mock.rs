// storefront/src/services/payment_mock.rs
use crate::errors::{AppError, Result as AppResult};
use bakery_core::PaymentMethod;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MockPaymentStatus {
  RequiresConfirmation,
  Succeeded,
  Declined,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockPaymentIntent {
  pub id: String,
  pub order_id: Uuid,
  pub amount: i64,
  pub currency: String,
  pub method: PaymentMethod,
  pub status: MockPaymentStatus,
  pub account_id_used: String,
}

#[instrument(skip(account_id), fields(payment_account_id = %account_id))]
pub async fn create_mock_payment_intent(
  order_id: Uuid,
  amount: i64,
  currency: &str,
  method: PaymentMethod,
  account_id: &str,
) -> AppResult<MockPaymentIntent> {
  info!("Simulating creation of payment intent for account '{}'", account_id);
  if amount <= 0 {
    return Err(AppError::Payment("Amount must be greater than zero".to_string()));
  }
  tokio::time::sleep(std::time::Duration::from_millis(5)).await; // Simulate network latency

  Ok(MockPaymentIntent {
    id: format!("mock_pi_{}", Uuid::new_v4().simple()),
    order_id,
    amount,
    currency: currency.to_string(),
    method,
    status: MockPaymentStatus::RequiresConfirmation,
    account_id_used: account_id.to_string(),
  })
}

/// Confirms the intent. Amounts above `limit` are declined.
#[instrument(skip(intent), fields(payment_intent_id = %intent.id, amount = intent.amount))]
pub async fn confirm_mock_payment(intent: &mut MockPaymentIntent, limit: i64) -> AppResult<()> {
  info!("Simulating confirmation of payment intent ID: {}", intent.id);
  tokio::time::sleep(std::time::Duration::from_millis(5)).await; // Simulate processing

  if intent.amount > limit {
    intent.status = MockPaymentStatus::Declined;
    info!("Mock payment DECLINED for intent ID: {}", intent.id);
    Err(AppError::Payment(format!(
      "Payment of {} {} was declined by the provider.",
      intent.amount, intent.currency
    )))
  } else {
    intent.status = MockPaymentStatus::Succeeded;
    info!("Mock payment SUCCEEDED for intent ID: {}", intent.id);
    Ok(())
  }
}
