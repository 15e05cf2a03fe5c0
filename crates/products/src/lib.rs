//! Product catalog module.
//!
//! Immutable catalog values: a [`Product`] is born once, inside the
//! inventory, and never changes afterwards.

pub mod price;
pub mod product;

pub use price::Price;
pub use product::{NewProduct, Product};
