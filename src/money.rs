//! Exact monetary amounts and rounding
//!
//! Amounts are `rust_decimal::Decimal`, never binary floats. Results are
//! rounded to the configured scale with the configured [`RoundingMode`];
//! half-up is the default to match legal/financial practice.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CorrectionError;

/// Default currency code
pub const DEFAULT_CURRENCY: &str = "BRL";

/// Monetary scale used for final and per-period results
pub const MONETARY_SCALE: u32 = 2;

/// Rounding rule applied when reducing a value to a fixed scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Midpoint rounds away from zero (0.005 -> 0.01)
    #[default]
    HalfUp,
    /// Midpoint rounds to the even neighbour (banker's rounding)
    HalfEven,
    /// Any remainder rounds toward positive infinity
    Up,
}

impl RoundingMode {
    fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Up => RoundingStrategy::ToPositiveInfinity,
        }
    }

    pub fn round(&self, value: Decimal, scale: u32) -> Decimal {
        value.round_dp_with_strategy(scale, self.strategy())
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "halfup" => Ok(RoundingMode::HalfUp),
            "halfeven" | "bankers" => Ok(RoundingMode::HalfEven),
            "up" | "ceiling" => Ok(RoundingMode::Up),
            other => Err(format!("unknown rounding mode: {}", other)),
        }
    }
}

/// An exact decimal amount in a currency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonetaryAmount {
    pub value: Decimal,
    pub currency: String,
}

impl MonetaryAmount {
    /// Amount in the default currency
    pub fn new(value: Decimal) -> Self {
        Self::with_currency(value, DEFAULT_CURRENCY)
    }

    pub fn with_currency(value: Decimal, currency: &str) -> Self {
        Self {
            value,
            currency: currency.to_string(),
        }
    }

    /// Parse a decimal string such as `"10000.00"`
    pub fn parse(s: &str) -> Result<Self, CorrectionError> {
        Decimal::from_str_exact(s.trim())
            .map(Self::new)
            .map_err(|_| CorrectionError::InvalidAmount(format!("not a decimal amount: {:?}", s)))
    }

    /// Convert from a float at the boundary; NaN and infinities are rejected
    pub fn from_f64(value: f64) -> Result<Self, CorrectionError> {
        if !value.is_finite() {
            return Err(CorrectionError::InvalidAmount(format!("non-finite amount: {}", value)));
        }
        Decimal::from_f64_retain(value)
            .map(Self::new)
            .ok_or_else(|| CorrectionError::InvalidAmount(format!("amount out of range: {}", value)))
    }

    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Same currency, value replaced
    pub fn map_value(&self, value: Decimal) -> Self {
        Self {
            value,
            currency: self.currency.clone(),
        }
    }

    pub fn round(&self, mode: RoundingMode, scale: u32) -> Self {
        self.map_value(mode.round(self.value, scale))
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_up_vs_half_even() {
        assert_eq!(RoundingMode::HalfUp.round(dec!(2.345), 2), dec!(2.35));
        assert_eq!(RoundingMode::HalfEven.round(dec!(2.345), 2), dec!(2.34));
        assert_eq!(RoundingMode::HalfUp.round(dec!(2.355), 2), dec!(2.36));
        assert_eq!(RoundingMode::HalfEven.round(dec!(2.355), 2), dec!(2.36));
    }

    #[test]
    fn test_round_up() {
        assert_eq!(RoundingMode::Up.round(dec!(10150.71105), 2), dec!(10150.72));
        assert_eq!(RoundingMode::Up.round(dec!(10150.71), 2), dec!(10150.71));
    }

    #[test]
    fn test_parse_rounding_mode() {
        assert_eq!("half-up".parse::<RoundingMode>().unwrap(), RoundingMode::HalfUp);
        assert_eq!("HALF_EVEN".parse::<RoundingMode>().unwrap(), RoundingMode::HalfEven);
        assert_eq!("up".parse::<RoundingMode>().unwrap(), RoundingMode::Up);
        assert!("down".parse::<RoundingMode>().is_err());
    }

    #[test]
    fn test_amount_parse_and_default_currency() {
        let amount = MonetaryAmount::parse("10000.00").unwrap();
        assert_eq!(amount.value, dec!(10000.00));
        assert_eq!(amount.currency, "BRL");
        assert_eq!(amount.to_string(), "BRL 10000.00");

        assert!(MonetaryAmount::parse("ten").is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(MonetaryAmount::from_f64(f64::NAN).is_err());
        assert!(MonetaryAmount::from_f64(f64::INFINITY).is_err());
        assert!(MonetaryAmount::from_f64(12.5).unwrap().is_positive());
    }
}
