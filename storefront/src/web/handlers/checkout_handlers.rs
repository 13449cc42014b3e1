// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use bakery_core::validation::CheckoutForm;
use bakery_core::{CartError, ContextData, PipelineResult, ShippingMethod};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::web::extractors::MaybeUser;

#[derive(Deserialize, Debug, Default)]
pub struct CheckoutSummaryQuery {
  #[serde(default)]
  pub shipping: ShippingMethod,
}

#[instrument(name = "handler::checkout_summary", skip(app_state, user, query), fields(user_id = ?user.user_id(), shipping = ?query.shipping))]
pub async fn checkout_summary_handler(
  app_state: web::Data<AppState>,
  query: web::Query<CheckoutSummaryQuery>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let summary = app_state
    .cart_service
    .checkout_summary(user.user_id(), query.shipping)
    .await;
  Ok(HttpResponse::Ok().json(json!({ "summary": summary })))
}

#[instrument(name = "handler::place_order", skip(app_state, user, req_payload), fields(user_id = ?user.user_id()))]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutForm>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let user_id = user.user_id().ok_or(CartError::Unauthenticated)?;
  info!("Checkout attempt by user: {}", user_id);

  // 1. Prepare the initial context data for the checkout pipeline
  let checkout_ctx_data = ContextData::new(CheckoutCtxData::new(
    app_state.get_ref().clone(),
    user_id,
    req_payload.into_inner(),
  ));

  // 2. Run the checkout pipeline
  match app_state.checkout_pipeline.run(checkout_ctx_data.clone()).await {
    Ok(PipelineResult::Completed) => {
      let final_ctx_guard = checkout_ctx_data.read();
      let receipt = final_ctx_guard.receipt.clone().ok_or_else(|| {
        warn!("Checkout pipeline completed for user {} but no receipt was built.", user_id);
        AppError::Internal("Checkout completed, but order details are unavailable.".to_string())
      })?;
      info!(
        "Checkout completed for user: {}. Order: {} ({}), total {}",
        user_id, receipt.order_number, receipt.order_id, receipt.summary.grand_total
      );
      if let Some(reason) = &final_ctx_guard.cart_clear_failure {
        warn!("Order {} is paid but the cart still holds its lines: {}", receipt.order_id, reason);
      }
      Ok(HttpResponse::Created().json(json!({
          "message": "Order placed successfully.",
          "receipt": receipt,
          "cartCleared": final_ctx_guard.cart_cleared
      })))
    }
    Ok(PipelineResult::Stopped) => {
      let final_ctx_guard = checkout_ctx_data.read();
      warn!(
        "Checkout pipeline for user {} was stopped. Payment success: {}. Order ID: {}",
        user_id, final_ctx_guard.payment_succeeded, final_ctx_guard.order_id
      );
      let reason = final_ctx_guard
        .payment_failure
        .clone()
        .unwrap_or_else(|| "Payment processing failed or was cancelled.".to_string());
      Err(AppError::Payment(reason))
    }
    Err(app_err) => {
      warn!("Checkout pipeline failed for user {}: {}", user_id, app_err);
      Err(app_err)
    }
  }
}
