// src/lib.rs

//! Bakery core: cart pricing, cart persistence and checkout building blocks.
//!
//! The crate provides:
//!  - Cart and catalog models whose stored JSON documents never carry a trusted total.
//!  - `CartPricingEngine`: quantity merge, total recomputation, shipping fee and
//!    checkout totals.
//!  - `CartStore`: the document-store contract, with an in-memory implementation.
//!  - `CartService`: identity-checked read-modify-write cart operations, run as
//!    a step pipeline and sequenced per user.
//!  - Typed form validation for account, checkout and contact forms.
//!  - A small async step pipeline, reused by the storefront checkout flow.

pub mod engine;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod service;
pub mod store;
pub mod validation;

// --- Re-exports for the Public API ---

pub use crate::engine::{compute_grand_total, compute_shipping_fee, CartPricingEngine, PricingRules};
pub use crate::error::{CartError, CartResult, PipelineError};
pub use crate::models::{
  order_number, Cart, CartItem, Catalog, CheckoutSummary, OrderReceipt, PaymentMethod, Product, ShippingMethod,
};
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::service::{CartMutation, CartService};
pub use crate::store::{CartStore, InMemoryCartStore};
pub use crate::validation::{FieldErrors, Form};

/// A prelude for convenient importing of commonly used items.
pub mod prelude {
  pub use crate::engine::{CartPricingEngine, PricingRules};
  pub use crate::error::{CartError, CartResult, PipelineError};
  pub use crate::models::{Cart, CartItem, Catalog, CheckoutSummary, OrderReceipt, PaymentMethod, ShippingMethod};
  pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
  pub use crate::service::CartService;
  pub use crate::store::CartStore;
  pub use crate::validation::{Form, FieldErrors};
}
