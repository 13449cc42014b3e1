// storefront/src/pipelines/checkout_pipeline.rs
use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::services::payment_mock::{confirm_mock_payment, create_mock_payment_intent};
use bakery_core::validation::Form;
use bakery_core::{order_number, ContextData, OrderReceipt, Pipeline, PipelineControl};
use chrono::Utc;
use tracing::{error, info, warn};

pub const CHECKOUT_CURRENCY: &str = "TWD";

/// Builds the checkout flow:
/// validate form, price the cart, charge it, take the paid lines out of the
/// cart, issue the receipt.
///
/// A declined payment stops the run before the cart is touched. Once the
/// payment went through the receipt is always issued, even when the cart
/// could not be updated.
pub fn build_checkout_pipeline() -> Pipeline<CheckoutCtxData, AppError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("validate_checkout_form", false, None),
    ("price_cart_checkout", false, None),
    ("process_mock_payment_checkout", false, None),
    ("clear_cart_checkout", false, None),
    ("build_receipt_checkout", false, None),
  ]);

  // Step 1: Recipient details
  p.on_root("validate_checkout_form", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let form = ctx_data.read().form.clone();
      form.validate()?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 2: Price the stored cart once; the same snapshot is charged and receipted.
  p.on_root("price_cart_checkout", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (cart_service, user_id, shipping_method) = {
        let guard = ctx_data.read();
        (
          guard.app_state.cart_service.clone(),
          guard.user_id.clone(),
          guard.form.shipping_method,
        )
      };

      let summary = cart_service.checkout_summary(Some(&user_id), shipping_method).await;
      if summary.items.is_empty() {
        warn!("Checkout Pipeline (User {}): cart is empty.", user_id);
        return Err(AppError::EmptyCart);
      }
      info!(
        "Checkout Pipeline (User {}): {} item(s), subtotal {}, shipping {}, surcharge {}, total {}.",
        user_id,
        summary.item_count,
        summary.subtotal,
        summary.shipping_fee,
        summary.expedite_surcharge,
        summary.grand_total
      );
      ctx_data.write().summary = Some(summary);
      Ok(PipelineControl::Continue)
    })
  });

  // Step 3: Charge through the mock provider
  p.on_root("process_mock_payment_checkout", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (order_id, amount, method, account_id, limit) = {
        let guard = ctx_data.read();
        let summary = guard
          .summary
          .as_ref()
          .ok_or_else(|| AppError::Internal("Checkout reached payment without a priced cart.".to_string()))?;
        (
          guard.order_id,
          summary.grand_total,
          guard.form.payment_method,
          guard.app_state.config.mock_payment_account_id.clone(),
          guard.app_state.config.mock_payment_limit,
        )
      };

      let mut intent = create_mock_payment_intent(order_id, amount, CHECKOUT_CURRENCY, method, &account_id).await?;
      let outcome = confirm_mock_payment(&mut intent, limit).await;

      let mut guard = ctx_data.write();
      guard.payment_intent = Some(intent);
      match outcome {
        Ok(()) => {
          guard.payment_succeeded = true;
          info!("Checkout Pipeline (Order {}): payment succeeded.", order_id);
          Ok::<_, AppError>(PipelineControl::Continue)
        }
        Err(e) => {
          warn!("Checkout Pipeline (Order {}): payment failed: {}", order_id, e);
          guard.payment_failure = Some(e.to_string());
          Ok(PipelineControl::Stop)
        }
      }
    })
  });

  // Step 4: The order is paid; remove exactly what was charged
  p.on_root("clear_cart_checkout", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (cart_service, user_id, order_id, purchased) = {
        let guard = ctx_data.read();
        let summary = guard
          .summary
          .as_ref()
          .ok_or_else(|| AppError::Internal("Checkout reached cart clearing without a priced cart.".to_string()))?;
        (
          guard.app_state.cart_service.clone(),
          guard.user_id.clone(),
          guard.order_id,
          summary.items.clone(),
        )
      };

      match cart_service.remove_purchased(Some(&user_id), purchased).await {
        Ok(cart) => {
          if !cart.is_empty() {
            info!(
              "Checkout Pipeline (Order {}): {} line(s) added during payment stay in the cart.",
              order_id,
              cart.len()
            );
          }
          ctx_data.write().cart_cleared = true;
        }
        Err(e) => {
          error!(
            order_id = %order_id,
            user_id = %user_id,
            error = %e,
            "Checkout Pipeline: order is paid but its lines could not be removed from the cart."
          );
          ctx_data.write().cart_clear_failure = Some(e.to_string());
        }
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: Receipt
  p.on_root("build_receipt_checkout", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let summary = guard
        .summary
        .clone()
        .ok_or_else(|| AppError::Internal("Receipt requested without a priced cart.".to_string()))?;
      let placed_at = Utc::now();
      let receipt = OrderReceipt {
        order_id: guard.order_id,
        order_number: order_number(placed_at),
        summary,
        payment_method: guard.form.payment_method,
        shipping_method: guard.form.shipping_method,
        placed_at,
      };
      info!(
        "Checkout Pipeline (Order {}): receipt {} issued.",
        receipt.order_id, receipt.order_number
      );
      guard.receipt = Some(receipt);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p
}
