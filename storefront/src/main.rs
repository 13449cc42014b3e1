// storefront/src/main.rs

mod config;
mod db;
mod errors;
mod pipelines;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::db::PgCartStore;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use bakery_core::store::CartStore;
use bakery_core::InMemoryCartStore;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting bakery storefront server...");

  let app_config = AppConfig::from_env().map_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;

  let cart_store: Arc<dyn CartStore> = match &app_config.database_url {
    Some(database_url) => {
      let pool = PgPool::connect(database_url).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to connect to the database.");
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
      })?;
      tracing::info!("Successfully connected to the database.");
      let store = PgCartStore::new(pool);
      store.ensure_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to prepare the cart table.");
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
      })?;
      Arc::new(store)
    }
    None => {
      tracing::warn!("DATABASE_URL not set, carts are kept in process memory.");
      Arc::new(InMemoryCartStore::new())
    }
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  let app_state = AppState::new(app_config, cart_store);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
