// core/src/service.rs

//! Request/response cart API for UI bindings.
//!
//! `CartService` owns no cart state. Every mutation is a read-modify-write
//! against the injected `CartStore`, executed as the cart mutation pipeline:
//!
//! 1. `authorize`: a user identity is required.
//! 2. `load_cart`: fetch the stored document (empty when none exists).
//! 3. `apply_mutation`: run the pricing engine on the in-memory cart.
//! 4. `persist_cart`: overwrite the stored document. Skipped for no-ops.
//!
//! Mutations for the same user are sequenced through a per-user async lock so
//! a burst of requests from one session applies in arrival order without lost
//! updates. Writers in other processes are still last-write-wins.

use crate::engine::CartPricingEngine;
use crate::error::{CartError, CartResult, PipelineError};
use crate::models::{Cart, CartItem, CheckoutSummary, ShippingMethod};
use crate::pipeline::{ContextData, Pipeline, PipelineControl};
use crate::store::CartStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One cart change, as requested by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartMutation {
  Add(CartItem),
  /// Absolute quantity; `<= 0` removes the line.
  SetQuantity { product_id: String, quantity: i64 },
  /// Minus button: clamped at 1.
  Decrement { product_id: String },
  /// Plus button.
  Increment { product_id: String },
  Remove { product_id: String },
  Clear,
  /// Takes paid lines out of the cart: each stored quantity drops by the
  /// purchased quantity. Units added after the order was priced stay.
  RemovePurchased(Vec<CartItem>),
}

impl CartMutation {
  fn kind(&self) -> &'static str {
    match self {
      CartMutation::Add(_) => "add",
      CartMutation::SetQuantity { .. } => "set_quantity",
      CartMutation::Decrement { .. } => "decrement",
      CartMutation::Increment { .. } => "increment",
      CartMutation::Remove { .. } => "remove",
      CartMutation::Clear => "clear",
      CartMutation::RemovePurchased(_) => "remove_purchased",
    }
  }

  /// Applies the mutation to `cart` and reports whether anything changed.
  pub fn apply(self, cart: &mut Cart) -> CartResult<bool> {
    let changed = match self {
      CartMutation::Add(item) => CartPricingEngine::add_item(cart, item)?,
      CartMutation::SetQuantity { product_id, quantity } => {
        CartPricingEngine::update_quantity(cart, &product_id, quantity)?
      }
      CartMutation::Decrement { product_id } => match cart.get(&product_id) {
        Some(item) => {
          let next = CartPricingEngine::decrement_quantity(item.quantity);
          CartPricingEngine::update_quantity(cart, &product_id, next)?
        }
        None => false,
      },
      CartMutation::Increment { product_id } => match cart.get(&product_id) {
        Some(item) => {
          let next = CartPricingEngine::increment_quantity(item.quantity);
          CartPricingEngine::update_quantity(cart, &product_id, next)?
        }
        None => false,
      },
      CartMutation::Remove { product_id } => CartPricingEngine::remove_item(cart, &product_id),
      CartMutation::Clear => CartPricingEngine::clear(cart),
      CartMutation::RemovePurchased(purchased) => {
        let mut changed = false;
        for line in purchased {
          let Some(stored) = cart.get(&line.product_id).map(|item| item.quantity) else {
            continue;
          };
          let remaining = stored.saturating_sub(line.quantity);
          changed |= CartPricingEngine::update_quantity(cart, &line.product_id, remaining)?;
        }
        changed
      }
    };
    Ok(changed)
  }
}

/// Context of one run of the cart mutation pipeline.
#[derive(Debug, Clone)]
pub struct CartMutationCtxData {
  pub user_id: Option<String>,
  pub mutation: Option<CartMutation>,
  pub cart: Option<Cart>,
  pub changed: bool,
}

impl CartMutationCtxData {
  pub fn new(user_id: Option<&str>, mutation: CartMutation) -> Self {
    Self {
      user_id: user_id.map(str::to_string),
      mutation: Some(mutation),
      cart: None,
      changed: false,
    }
  }
}

pub struct CartService {
  store: Arc<dyn CartStore>,
  engine: CartPricingEngine,
  pipeline: Pipeline<CartMutationCtxData, CartError>,
  user_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CartService {
  pub fn new(store: Arc<dyn CartStore>, engine: CartPricingEngine) -> Self {
    let pipeline = build_mutation_pipeline(store.clone());
    Self {
      store,
      engine,
      pipeline,
      user_locks: Mutex::new(HashMap::new()),
    }
  }

  pub fn engine(&self) -> &CartPricingEngine {
    &self.engine
  }

  /// The user's cart for display.
  ///
  /// Never fails: no identity, no stored document, or a failed read all yield
  /// an empty cart so display paths are not blocked.
  #[instrument(name = "CartService::load", skip(self))]
  pub async fn load(&self, user_id: Option<&str>) -> Cart {
    let Some(uid) = user_id else {
      debug!("No signed-in user, showing an empty cart.");
      return Cart::new();
    };
    match self.store.fetch(uid).await {
      Ok(Some(cart)) => cart,
      Ok(None) => Cart::new(),
      Err(e) => {
        warn!(error = %e, "Cart read failed, showing an empty cart.");
        Cart::new()
      }
    }
  }

  /// Overwrites the stored cart wholesale.
  #[instrument(name = "CartService::save", skip(self, cart))]
  pub async fn save(&self, user_id: Option<&str>, cart: &Cart) -> CartResult<()> {
    let uid = user_id.ok_or(CartError::Unauthenticated)?;
    self.store.save(uid, cart).await.map_err(CartError::persistence)
  }

  pub async fn add_item(&self, user_id: Option<&str>, item: CartItem) -> CartResult<Cart> {
    self.mutate(user_id, CartMutation::Add(item)).await
  }

  pub async fn update_quantity(&self, user_id: Option<&str>, product_id: &str, quantity: i64) -> CartResult<Cart> {
    self
      .mutate(
        user_id,
        CartMutation::SetQuantity {
          product_id: product_id.to_string(),
          quantity,
        },
      )
      .await
  }

  pub async fn decrement(&self, user_id: Option<&str>, product_id: &str) -> CartResult<Cart> {
    self
      .mutate(
        user_id,
        CartMutation::Decrement {
          product_id: product_id.to_string(),
        },
      )
      .await
  }

  pub async fn increment(&self, user_id: Option<&str>, product_id: &str) -> CartResult<Cart> {
    self
      .mutate(
        user_id,
        CartMutation::Increment {
          product_id: product_id.to_string(),
        },
      )
      .await
  }

  pub async fn remove_item(&self, user_id: Option<&str>, product_id: &str) -> CartResult<Cart> {
    self
      .mutate(
        user_id,
        CartMutation::Remove {
          product_id: product_id.to_string(),
        },
      )
      .await
  }

  pub async fn clear(&self, user_id: Option<&str>) -> CartResult<Cart> {
    self.mutate(user_id, CartMutation::Clear).await
  }

  /// Removes the lines of a paid order, leaving anything added since pricing.
  pub async fn remove_purchased(&self, user_id: Option<&str>, purchased: Vec<CartItem>) -> CartResult<Cart> {
    self.mutate(user_id, CartMutation::RemovePurchased(purchased)).await
  }

  /// Units in the cart, for the header badge.
  pub async fn item_count(&self, user_id: Option<&str>) -> i64 {
    CartPricingEngine::item_count(&self.load(user_id).await)
  }

  /// Read-only pricing snapshot for the checkout page.
  pub async fn checkout_summary(&self, user_id: Option<&str>, shipping_method: ShippingMethod) -> CheckoutSummary {
    let cart = self.load(user_id).await;
    self.engine.summarize(&cart, shipping_method)
  }

  /// Runs one mutation through the pipeline and returns the resulting cart.
  #[instrument(name = "CartService::mutate", skip(self, mutation), fields(kind = mutation.kind()))]
  pub async fn mutate(&self, user_id: Option<&str>, mutation: CartMutation) -> CartResult<Cart> {
    let user_lock = user_id.map(|uid| self.lock_for(uid));
    let turn = match &user_lock {
      Some(lock) => Some(lock.lock().await),
      None => None,
    };

    let ctx_data = ContextData::new(CartMutationCtxData::new(user_id, mutation));
    let outcome = self.pipeline.run(ctx_data.clone()).await;

    drop(turn);
    if let Some(uid) = user_id {
      drop(user_lock);
      self.release_lock(uid);
    }

    let result = outcome?;
    let (cart, changed) = ctx_data.with_mut(|data| (data.cart.take(), data.changed));
    let cart = cart.ok_or_else(|| PipelineError::Internal(format!("cart mutation ended ({:?}) without a cart", result)))?;
    info!(changed, total = cart.total(), lines = cart.len(), "Cart mutation finished.");
    Ok(cart)
  }

  fn lock_for(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
    self.user_locks.lock().entry(user_id.to_string()).or_default().clone()
  }

  /// Drops the user's lock entry once nobody else is waiting on it.
  fn release_lock(&self, user_id: &str) {
    let mut locks = self.user_locks.lock();
    if locks.get(user_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
      locks.remove(user_id);
    }
  }

  #[cfg(test)]
  fn tracked_locks(&self) -> usize {
    self.user_locks.lock().len()
  }
}

fn build_mutation_pipeline(store: Arc<dyn CartStore>) -> Pipeline<CartMutationCtxData, CartError> {
  let mut p = Pipeline::<CartMutationCtxData, CartError>::new(&[
    ("authorize", false, None),
    ("load_cart", false, None),
    ("apply_mutation", false, None),
    (
      "persist_cart",
      false,
      Some(Arc::new(|ctx: ContextData<CartMutationCtxData>| {
        let changed = ctx.read().changed;
        !changed
      })),
    ),
  ]);

  p.on_root("authorize", |ctx_data: ContextData<CartMutationCtxData>| {
    Box::pin(async move {
      if ctx_data.read().user_id.is_none() {
        warn!("Cart mutation attempted without a signed-in user.");
        return Err(CartError::Unauthenticated);
      }
      Ok(PipelineControl::Continue)
    })
  });

  let load_store = store.clone();
  p.on_root("load_cart", move |ctx_data: ContextData<CartMutationCtxData>| {
    let store = load_store.clone();
    Box::pin(async move {
      let user_id = ctx_data.read().user_id.clone().unwrap_or_default();
      // A failed read must not be mistaken for an empty cart here: persisting
      // on top of it would wipe the stored document.
      let stored = store.fetch(&user_id).await.map_err(CartError::persistence)?;
      debug!(found = stored.is_some(), "Cart loaded for mutation.");
      ctx_data.write().cart = Some(stored.unwrap_or_default());
      Ok::<_, CartError>(PipelineControl::Continue)
    })
  });

  p.on_root("apply_mutation", |ctx_data: ContextData<CartMutationCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let mutation = guard
        .mutation
        .take()
        .ok_or_else(|| PipelineError::Internal("mutation already applied".to_string()))?;
      let cart = guard
        .cart
        .as_mut()
        .ok_or_else(|| PipelineError::Internal("cart not loaded before apply".to_string()))?;
      let changed = mutation.apply(cart)?;
      guard.changed = changed;
      if !changed {
        debug!("Mutation left the cart unchanged, nothing to persist.");
      }
      Ok::<_, CartError>(PipelineControl::Continue)
    })
  });

  let save_store = store;
  p.on_root("persist_cart", move |ctx_data: ContextData<CartMutationCtxData>| {
    let store = save_store.clone();
    Box::pin(async move {
      let (user_id, cart) = {
        let guard = ctx_data.read();
        (guard.user_id.clone().unwrap_or_default(), guard.cart.clone().unwrap_or_default())
      };
      store.save(&user_id, &cart).await.map_err(CartError::persistence)?;
      Ok::<_, CartError>(PipelineControl::Continue)
    })
  });

  p
}
