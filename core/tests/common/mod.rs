// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use bakery_core::pipeline::Handler;
use bakery_core::store::CartStore;
use bakery_core::{Cart, CartItem, CartPricingEngine, CartService, ContextData, InMemoryCartStore, PipelineControl, PipelineError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;

// --- Pipeline test context ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Pipeline framework error: {0}")]
  Pipeline(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipelineError> for TestError {
  fn from(pe: PipelineError) -> Self {
    TestError::Pipeline(format!("{:?}", pe))
  }
}

pub fn create_recording_handler(step_name: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

// --- Cart fixtures ---
pub fn cookie(id: &str, price: i64, quantity: i64) -> CartItem {
  CartItem::new(id, format!("Cookie {}", id), price, quantity)
}

pub fn memory_service() -> (Arc<InMemoryCartStore>, CartService) {
  let store = Arc::new(InMemoryCartStore::new());
  let service = CartService::new(store.clone(), CartPricingEngine::default());
  (store, service)
}

/// A store that can be told to fail reads or writes, backed by an in-memory store.
#[derive(Debug, Default)]
pub struct FlakyStore {
  pub inner: InMemoryCartStore,
  pub fail_reads: AtomicBool,
  pub fail_writes: AtomicBool,
  pub writes: AtomicUsize,
}

impl FlakyStore {
  pub fn failing_reads() -> Self {
    let store = Self::default();
    store.fail_reads.store(true, Ordering::SeqCst);
    store
  }

  pub fn failing_writes() -> Self {
    let store = Self::default();
    store.fail_writes.store(true, Ordering::SeqCst);
    store
  }
}

#[async_trait]
impl CartStore for FlakyStore {
  async fn fetch(&self, user_id: &str) -> anyhow::Result<Option<Cart>> {
    if self.fail_reads.load(Ordering::SeqCst) {
      anyhow::bail!("document store unavailable");
    }
    self.inner.fetch(user_id).await
  }

  async fn save(&self, user_id: &str, cart: &Cart) -> anyhow::Result<()> {
    if self.fail_writes.load(Ordering::SeqCst) {
      anyhow::bail!("document store rejected write");
    }
    self.writes.fetch_add(1, Ordering::SeqCst);
    self.inner.save(user_id, cart).await
  }
}

// --- Helper for Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
