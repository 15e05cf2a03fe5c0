//! `shopledger-core`: building blocks shared by the ledger crates.
//!
//! Identifiers, the error taxonomy, and the entity/value-object markers.
//! No locking, no IO.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{LedgerError, LedgerResult, ensure_units};
pub use id::{CartId, ProductId};
pub use value_object::ValueObject;
