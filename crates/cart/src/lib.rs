//! Shopping cart module.
//!
//! A cart is a per-session stock container that can only gain quantity by
//! taking it from its inventory, and only lose it by handing it back (or by
//! checkout, which is the store's business).

pub mod cart;

pub use cart::ShoppingCart;
