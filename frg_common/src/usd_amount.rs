use std::{
    fmt::Display,
    ops::{Add, AddAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

pub const BASE_CURRENCY_CODE: &str = "USD";
pub const BASE_CURRENCY_CODE_LOWER: &str = "usd";

//--------------------------------------     UsdAmount       ---------------------------------------------------------

/// A purchase amount in the base currency. Always positive, never more than two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct UsdAmount(Decimal);

op!(binary UsdAmount, Add, add);
op!(inplace UsdAmount, AddAssign, add_assign);

#[derive(Debug, Clone, Error)]
pub enum UsdAmountError {
    #[error("Amount must be a positive number, got {0}")]
    NotPositive(Decimal),
    #[error("Amount must have at most two decimal places, got {0}")]
    TooPrecise(Decimal),
    #[error("'{0}' is not a valid amount")]
    Unparseable(String),
}

impl UsdAmount {
    /// Create an amount from a decimal value that is already at cent precision.
    pub fn new(value: Decimal) -> Result<Self, UsdAmountError> {
        if value.scale() > 2 {
            return Err(UsdAmountError::TooPrecise(value));
        }
        if value <= Decimal::ZERO {
            return Err(UsdAmountError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// Create an amount from an arbitrary-precision decimal, rounding half-up to cent precision first.
    pub fn rounded(value: Decimal) -> Result<Self, UsdAmountError> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded <= Decimal::ZERO {
            return Err(UsdAmountError::NotPositive(value));
        }
        Ok(Self(rounded))
    }

    pub fn from_dollars(dollars: i64) -> Result<Self, UsdAmountError> {
        Self::new(Decimal::from(dollars))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for UsdAmount {
    type Error = UsdAmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for UsdAmount {
    type Err = UsdAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| UsdAmountError::Unparseable(s.to_string()))?;
        Self::new(value)
    }
}

impl Display for UsdAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_amounts() {
        let amount = UsdAmount::new(Decimal::new(12_345, 2)).unwrap();
        assert_eq!(amount.value(), Decimal::new(12_345, 2));
        assert_eq!(format!("{amount}"), "$123.45");
        let amount = UsdAmount::from_dollars(5).unwrap();
        assert_eq!(format!("{amount}"), "$5.00");
    }

    #[test]
    fn rejects_non_positive_and_sub_cent_amounts() {
        assert!(matches!(UsdAmount::new(Decimal::ZERO), Err(UsdAmountError::NotPositive(_))));
        assert!(matches!(UsdAmount::new(Decimal::new(-100, 2)), Err(UsdAmountError::NotPositive(_))));
        assert!(matches!(UsdAmount::new(Decimal::new(12_345, 3)), Err(UsdAmountError::TooPrecise(_))));
    }

    #[test]
    fn rounding_is_half_up() {
        let amount = UsdAmount::rounded(Decimal::new(12_345, 3)).unwrap();
        assert_eq!(format!("{amount}"), "$12.35");
        let amount = UsdAmount::rounded(Decimal::new(12_344, 3)).unwrap();
        assert_eq!(format!("{amount}"), "$12.34");
        // An amount that only becomes zero after rounding is still rejected
        assert!(UsdAmount::rounded(Decimal::new(1, 3)).is_err());
    }

    #[test]
    fn parses_from_string() {
        let amount = "19.99".parse::<UsdAmount>().unwrap();
        assert_eq!(format!("{amount}"), "$19.99");
        assert!("nonsense".parse::<UsdAmount>().is_err());
        assert!("-1.00".parse::<UsdAmount>().is_err());
    }

    #[test]
    fn addition() {
        let mut total = UsdAmount::from_dollars(10).unwrap() + "0.50".parse::<UsdAmount>().unwrap();
        total += UsdAmount::from_dollars(1).unwrap();
        assert_eq!(format!("{total}"), "$11.50");
    }
}
