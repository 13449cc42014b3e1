// core/src/models/mod.rs

//! Cart, catalog and checkout data structures.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{Cart, CartItem};
pub use order::{order_number, CheckoutSummary, OrderReceipt, PaymentMethod, ShippingMethod};
pub use product::{Catalog, Product};
