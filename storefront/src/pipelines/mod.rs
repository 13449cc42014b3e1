// storefront/src/pipelines/mod.rs

//! Storefront workflows built on the `bakery_core` step pipeline.
//!
//! Cart mutations run inside `CartService`'s own pipeline; the storefront adds
//! the checkout flow on top of it.

pub mod checkout_pipeline;
pub mod contexts;
