// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use bakery_core::Product;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub category: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state, query_params), fields(category = ?query_params.category))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let catalog = &app_state.catalog;
  let products: Vec<&Product> = match query_params.category.as_deref() {
    Some(category) => catalog.by_category(category).collect(),
    None => catalog.all().iter().collect(),
  };

  info!("Listing {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({
      "products": products,
      "categories": catalog.categories()
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  match app_state.catalog.find(&product_id) {
    Some(product) => Ok(HttpResponse::Ok().json(json!({
        "product": product,
        "related": app_state.catalog.related(&product_id)
    }))),
    None => {
      warn!("Product with ID {} not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}
