// storefront/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines::checkout_pipeline::build_checkout_pipeline;
use crate::pipelines::contexts::CheckoutCtxData;
use bakery_core::store::CartStore;
use bakery_core::{CartPricingEngine, CartService, Catalog, Pipeline};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub cart_service: Arc<CartService>,
  pub catalog: Arc<Catalog>,
  pub config: Arc<AppConfig>,
  pub checkout_pipeline: Arc<Pipeline<CheckoutCtxData, AppError>>,
}

impl AppState {
  pub fn new(config: AppConfig, store: Arc<dyn CartStore>) -> Self {
    let engine = CartPricingEngine::new(config.pricing);
    Self {
      cart_service: Arc::new(CartService::new(store, engine)),
      catalog: Arc::new(Catalog::bakery_default()),
      config: Arc::new(config),
      checkout_pipeline: Arc::new(build_checkout_pipeline()),
    }
  }
}
