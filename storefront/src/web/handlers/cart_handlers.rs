// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use bakery_core::{Cart, CartPricingEngine, ShippingMethod};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::MaybeUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequestPayload {
  pub product_id: String,
  #[serde(default = "default_quantity")]
  pub quantity: i64,
}

fn default_quantity() -> i64 {
  1
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityRequestPayload {
  pub quantity: i64,
}

fn cart_response(app_state: &AppState, cart: &Cart, message: &str) -> HttpResponse {
  let summary = app_state.cart_service.engine().summarize(cart, ShippingMethod::Standard);
  HttpResponse::Ok().json(json!({
      "message": message,
      "cart": cart,
      "itemCount": CartPricingEngine::item_count(cart),
      "summary": summary
  }))
}

// --- Handler Implementations ---

#[instrument(name = "handler::get_cart", skip(app_state, user), fields(user_id = ?user.user_id()))]
pub async fn get_cart_handler(app_state: web::Data<AppState>, user: MaybeUser) -> Result<HttpResponse, AppError> {
  let cart = app_state.cart_service.load(user.user_id()).await;
  Ok(cart_response(&app_state, &cart, "Cart fetched successfully."))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, user),
    fields(user_id = ?user.user_id(), product_id = %req_payload.product_id, quantity = req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let product = app_state.catalog.find(&payload.product_id).ok_or_else(|| {
    warn!("Add to cart for unknown product {}.", payload.product_id);
    AppError::NotFound(format!("Product with ID {} not found.", payload.product_id))
  })?;

  let cart = app_state
    .cart_service
    .add_item(user.user_id(), product.to_cart_item(payload.quantity))
    .await?;

  info!(
    "Add to cart successful. Product ID: {}, cart total: {}",
    payload.product_id,
    cart.total()
  );
  Ok(cart_response(&app_state, &cart, "Item added to cart successfully."))
}

#[instrument(
    name = "handler::update_cart_item",
    skip(app_state, path, req_payload, user),
    fields(user_id = ?user.user_id(), product_id = %path.as_ref(), quantity = req_payload.quantity)
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  req_payload: web::Json<UpdateQuantityRequestPayload>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let cart = app_state
    .cart_service
    .update_quantity(user.user_id(), &product_id, req_payload.quantity)
    .await?;
  Ok(cart_response(&app_state, &cart, "Cart item updated."))
}

#[instrument(name = "handler::decrement_cart_item", skip(app_state, path, user), fields(user_id = ?user.user_id(), product_id = %path.as_ref()))]
pub async fn decrement_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let cart = app_state.cart_service.decrement(user.user_id(), &product_id).await?;
  Ok(cart_response(&app_state, &cart, "Cart item updated."))
}

#[instrument(name = "handler::increment_cart_item", skip(app_state, path, user), fields(user_id = ?user.user_id(), product_id = %path.as_ref()))]
pub async fn increment_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let cart = app_state.cart_service.increment(user.user_id(), &product_id).await?;
  Ok(cart_response(&app_state, &cart, "Cart item updated."))
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, path, user), fields(user_id = ?user.user_id(), product_id = %path.as_ref()))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let cart = app_state.cart_service.remove_item(user.user_id(), &product_id).await?;
  Ok(cart_response(&app_state, &cart, "Cart item removed."))
}

#[instrument(name = "handler::clear_cart", skip(app_state, user), fields(user_id = ?user.user_id()))]
pub async fn clear_cart_handler(app_state: web::Data<AppState>, user: MaybeUser) -> Result<HttpResponse, AppError> {
  let cart = app_state.cart_service.clear(user.user_id()).await?;
  Ok(cart_response(&app_state, &cart, "Cart cleared."))
}
