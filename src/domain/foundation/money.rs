//! Money value objects: currency codes and amounts in minor units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO-4217 currency code as sent by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// The only currency this provider settles in.
    pub const EUR: &'static str = "EUR";

    /// Wraps a raw currency code without validation.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Euro.
    pub fn eur() -> Self {
        Self(Self::EUR.to_string())
    }

    /// Returns the raw code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// True when the code is exactly `EUR` (case-sensitive, as the platform sends it).
    pub fn is_supported(&self) -> bool {
        self.0 == Self::EUR
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative amount in minor currency units (cents for EUR).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Zero minor units.
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from minor units.
    pub fn from_minor_units(units: u64) -> Self {
        Self(units)
    }

    /// Returns the amount in minor units.
    pub fn minor_units(&self) -> u64 {
        self.0
    }

    /// Adds two amounts, clamping at `u64::MAX`.
    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eur_is_supported() {
        assert!(Currency::eur().is_supported());
        assert!(Currency::new("EUR").is_supported());
    }

    #[test]
    fn other_currencies_are_not_supported() {
        assert!(!Currency::new("USD").is_supported());
        assert!(!Currency::new("eur").is_supported());
        assert!(!Currency::new("").is_supported());
    }

    #[test]
    fn amount_saturating_add_accumulates() {
        let total = Amount::from(30).saturating_add(Amount::from(20));
        assert_eq!(total, Amount::from(50));
    }

    #[test]
    fn amount_saturating_add_clamps_at_max() {
        let total = Amount::from(u64::MAX).saturating_add(Amount::from(1));
        assert_eq!(total.minor_units(), u64::MAX);
    }

    #[test]
    fn amount_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Amount::from(500)).unwrap();
        assert_eq!(json, "500");
    }
}
