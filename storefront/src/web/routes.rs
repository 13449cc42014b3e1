// storefront/src/web/routes.rs

use crate::web::handlers::{account_handlers, cart_handlers, checkout_handlers, product_handlers};
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Catalog
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      // Cart. Identity comes from the X-User-ID header.
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{product_id}", web::put().to(cart_handlers::update_cart_item_handler))
          .route("/items/{product_id}", web::delete().to(cart_handlers::remove_cart_item_handler))
          .route(
            "/items/{product_id}/decrement",
            web::post().to(cart_handlers::decrement_cart_item_handler),
          )
          .route(
            "/items/{product_id}/increment",
            web::post().to(cart_handlers::increment_cart_item_handler),
          ),
      )
      // Checkout
      .service(
        web::scope("/checkout")
          .route("", web::post().to(checkout_handlers::place_order_handler))
          .route("/summary", web::get().to(checkout_handlers::checkout_summary_handler)),
      )
      // Form checks
      .service(
        web::scope("/account")
          .route(
            "/register/validate",
            web::post().to(account_handlers::validate_registration_handler),
          )
          .route("/login/validate", web::post().to(account_handlers::validate_login_handler))
          .route("/profile/validate", web::post().to(account_handlers::validate_profile_handler)),
      )
      .route("/contact/validate", web::post().to(account_handlers::validate_contact_handler)),
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::state::AppState;
  use crate::web::extractors::USER_ID_HEADER;
  use actix_web::http::StatusCode;
  use actix_web::{test, App};
  use bakery_core::InMemoryCartStore;
  use serde_json::{json, Value};
  use std::sync::Arc;

  fn state_with(config: AppConfig) -> AppState {
    AppState::new(config, Arc::new(InMemoryCartStore::new()))
  }

  macro_rules! test_app {
    ($state:expr) => {
      test::init_service(
        App::new()
          .app_data(web::Data::new($state))
          .configure(configure_app_routes),
      )
      .await
    };
  }

  fn checkout_form() -> Value {
    json!({
      "name": "Mimi",
      "email": "mimi@bakery.tw",
      "phone": "0912345678",
      "address": "1 Whisker Lane",
      "shippingMethod": "standard",
      "paymentMethod": "credit_card"
    })
  }

  #[actix_web::test]
  async fn health_is_ok() {
    let app = test_app!(state_with(AppConfig::default()));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[actix_web::test]
  async fn products_filter_by_category_and_show_related() {
    let app = test_app!(state_with(AppConfig::default()));

    let req = test::TestRequest::get().uri("/api/v1/products?category=Gift%20Boxes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get().uri("/api/v1/products/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["product"]["price"], 200);
    assert_eq!(body["related"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::get().uri("/api/v1/products/99").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn add_to_cart_without_identity_asks_for_login() {
    let app = test_app!(state_with(AppConfig::default()));
    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .set_json(json!({ "productId": "1", "quantity": 1 }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["action"], "redirect_to_login");
  }

  #[actix_web::test]
  async fn cart_flow_prices_shipping() {
    let app = test_app!(state_with(AppConfig::default()));

    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(json!({ "productId": "1", "quantity": 2 }))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["cart"]["total"], 400);
    assert_eq!(body["summary"]["shippingFee"], 60);
    assert_eq!(body["summary"]["grandTotal"], 460);

    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(json!({ "productId": "5", "quantity": 1 }))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["cart"]["total"], 1080);
    assert_eq!(body["summary"]["shippingFee"], 0);
    assert_eq!(body["itemCount"], 3);

    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items/5/decrement")
      .insert_header((USER_ID_HEADER, "u1"))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["cart"]["items"]["5"]["quantity"], 1);

    let req = test::TestRequest::put()
      .uri("/api/v1/cart/items/5")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(json!({ "quantity": 0 }))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["cart"]["total"], 400);

    let req = test::TestRequest::get()
      .uri("/api/v1/checkout/summary?shipping=express")
      .insert_header((USER_ID_HEADER, "u1"))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["summary"]["grandTotal"], 560);
  }

  #[actix_web::test]
  async fn invalid_quantity_is_a_bad_request() {
    let app = test_app!(state_with(AppConfig::default()));
    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(json!({ "productId": "1", "quantity": 0 }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
  }

  #[actix_web::test]
  async fn quantity_that_overflows_the_subtotal_is_a_bad_request() {
    let state = state_with(AppConfig::default());
    let cart_service = state.cart_service.clone();
    let app = test_app!(state);
    let big = i64::MAX / 100;

    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(json!({ "productId": "1", "quantity": big }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(json!({ "productId": "1", "quantity": big }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let cart = cart_service.load(Some("u1")).await;
    assert_eq!(cart.get("1").unwrap().quantity, big);
  }

  #[actix_web::test]
  async fn checkout_charges_and_clears_the_cart() {
    let state = state_with(AppConfig::default());
    let cart_service = state.cart_service.clone();
    let app = test_app!(state);

    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(json!({ "productId": "6", "quantity": 1 }))
      .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/checkout")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(checkout_form())
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["receipt"]["summary"]["grandTotal"], 940);
    assert!(body["receipt"]["orderNumber"].as_str().unwrap().starts_with("ORD"));
    assert_eq!(body["cartCleared"], true);

    assert!(cart_service.load(Some("u1")).await.is_empty());
  }

  #[actix_web::test]
  async fn checkout_rejects_empty_cart_and_bad_form() {
    let app = test_app!(state_with(AppConfig::default()));

    let req = test::TestRequest::post()
      .uri("/api/v1/checkout")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(checkout_form())
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let mut form = checkout_form();
    form["phone"] = json!("12345");
    let req = test::TestRequest::post()
      .uri("/api/v1/checkout")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(form)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"]["phone"]["code"], "phone_invalid");
  }

  #[actix_web::test]
  async fn declined_payment_keeps_the_cart() {
    let config = AppConfig {
      mock_payment_limit: 100,
      ..AppConfig::default()
    };
    let state = state_with(config);
    let cart_service = state.cart_service.clone();
    let app = test_app!(state);

    let req = test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(json!({ "productId": "2", "quantity": 1 }))
      .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/checkout")
      .insert_header((USER_ID_HEADER, "u1"))
      .set_json(checkout_form())
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(cart_service.load(Some("u1")).await.total(), 200);
  }

  #[actix_web::test]
  async fn registration_form_reports_field_errors() {
    let app = test_app!(state_with(AppConfig::default()));
    let req = test::TestRequest::post()
      .uri("/api/v1/account/register/validate")
      .set_json(json!({
        "displayName": "Mimi",
        "email": "mimi@bakery",
        "password": "meow1234",
        "confirmPassword": "meow1234"
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"]["email"]["code"], "email_invalid");
    assert!(body["fields"].get("password").is_none());

    let req = test::TestRequest::post()
      .uri("/api/v1/contact/validate")
      .set_json(json!({ "name": "Mimi", "email": "mimi@bakery.tw", "message": "More tuxedo cookies please" }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
  }
}
