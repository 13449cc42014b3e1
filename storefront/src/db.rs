// storefront/src/db.rs

//! Postgres-backed cart document store.
//!
//! One row per user, the whole cart as a JSONB document. `save` overwrites the
//! row unconditionally; there is no version column, so two processes writing
//! the same user's cart race and the later write wins.

use anyhow::Context;
use async_trait::async_trait;
use bakery_core::store::CartStore;
use bakery_core::Cart;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, instrument};

const CREATE_CARTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS carts (
  user_id TEXT PRIMARY KEY,
  document JSONB NOT NULL,
  updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const UPSERT_CART: &str = "INSERT INTO carts (user_id, document, updated_at) VALUES ($1, $2, now())
  ON CONFLICT (user_id) DO UPDATE SET document = EXCLUDED.document, updated_at = EXCLUDED.updated_at";

#[derive(Clone)]
pub struct PgCartStore {
  pool: PgPool,
}

impl PgCartStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Creates the `carts` table when it does not exist yet.
  pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_CARTS_TABLE).execute(&self.pool).await?;
    info!("Cart table is ready.");
    Ok(())
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  #[instrument(name = "PgCartStore::fetch", skip(self))]
  async fn fetch(&self, user_id: &str) -> anyhow::Result<Option<Cart>> {
    let row: Option<(Json<Cart>,)> = sqlx::query_as("SELECT document FROM carts WHERE user_id = $1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await
      .with_context(|| format!("failed to read cart document for user {}", user_id))?;
    Ok(row.map(|(Json(cart),)| cart))
  }

  #[instrument(name = "PgCartStore::save", skip(self, cart), fields(lines = cart.len(), total = cart.total()))]
  async fn save(&self, user_id: &str, cart: &Cart) -> anyhow::Result<()> {
    sqlx::query(UPSERT_CART)
      .bind(user_id)
      .bind(Json(cart))
      .execute(&self.pool)
      .await
      .with_context(|| format!("failed to write cart document for user {}", user_id))?;
    Ok(())
  }
}
