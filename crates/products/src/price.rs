use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopledger_core::{LedgerError, LedgerResult, ValueObject};

/// Non-negative unit price.
///
/// Backed by `Decimal` so totals are exact (`5 * 15.99` is `79.95`, not a
/// float approximation of it).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    pub fn new(amount: Decimal) -> LedgerResult<Self> {
        if amount.is_zero() {
            return Ok(Self::ZERO);
        }
        if amount.is_sign_negative() {
            return Err(LedgerError::invalid(format!(
                "price cannot be less than 0 (got {amount})"
            )));
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Exact `units * price`.
    pub fn line_total(&self, units: u32) -> Decimal {
        self.0 * Decimal::from(units)
    }
}

impl ValueObject for Price {}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

// Deserialization goes through `new` so a negative price can't sneak in.
impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Price::new(amount).map_err(serde::de::Error::custom)
    }
}
