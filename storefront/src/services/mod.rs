// storefront/src/services/mod.rs

//! Outbound collaborators of the storefront. Payment is simulated.

pub mod payment_mock;
