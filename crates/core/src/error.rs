//! Ledger error model.

use thiserror::Error;

use crate::id::{CartId, ProductId};

/// Result type used across the ledger crates.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant is a recoverable, caller-facing failure. An operation that
/// returns one of these has left both the inventory and the cart untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A value failed validation (negative price, zero units, empty name, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The product has no entry in the container that was asked.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A decrease asked for more units than the container holds.
    #[error("insufficient quantity for {product_id}: requested {requested}, available {available}")]
    InsufficientQuantity {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The cart holds no entry for the product.
    #[error("product not in cart: {0}")]
    NotInCart(ProductId),

    /// No session is registered under this cart id.
    #[error("unknown session: {0}")]
    UnknownSession(CartId),

    /// Internal failure (e.g. a poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn insufficient(product_id: ProductId, requested: u32, available: u32) -> Self {
        Self::InsufficientQuantity {
            product_id,
            requested,
            available,
        }
    }

    /// Lock poisoning is reported, never propagated as a panic.
    pub fn poisoned(what: &str) -> Self {
        Self::Internal(format!("{what} lock poisoned"))
    }
}

/// Reject unit counts below one.
pub fn ensure_units(units: u32) -> LedgerResult<()> {
    if units < 1 {
        return Err(LedgerError::invalid("number of units must be 1 or more"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_units_are_rejected() {
        assert!(matches!(ensure_units(0), Err(LedgerError::InvalidArgument(_))));
        assert!(ensure_units(1).is_ok());
    }

    #[test]
    fn insufficient_quantity_message_names_both_amounts() {
        let id = ProductId::new();
        let msg = LedgerError::insufficient(id, 7, 3).to_string();
        assert!(msg.contains("requested 7"));
        assert!(msg.contains("available 3"));
        assert!(msg.contains(&id.to_string()));
    }
}
