use std::fmt::Display;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A canonical exchange-rate record: how many units of the quoted currency one unit of the base currency buys,
/// effective from a given date.
///
/// Records are produced by the provider-side normalizer and are immutable once built. The `currency_code` is the
/// canonical ISO 4217 code where the provider's free-text label could be mapped, and the uppercased label otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub currency_code: String,
    /// The provider's combined country-currency description, e.g. "Euro Zone-Euro".
    pub description: String,
    pub rate: Decimal,
    pub effective_date: Option<NaiveDate>,
    pub country: String,
}

impl RateRecord {
    pub fn new(
        currency_code: String,
        description: String,
        rate: Decimal,
        effective_date: Option<NaiveDate>,
        country: String,
    ) -> Self {
        Self { currency_code, description, rate, effective_date, country }
    }

    /// True if the record carries an effective date inside the inclusive `[from, to]` window.
    pub fn effective_within(&self, from: NaiveDate, to: NaiveDate) -> bool {
        match self.effective_date {
            Some(date) => date >= from && date <= to,
            None => false,
        }
    }
}

impl Display for RateRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.effective_date {
            Some(date) => write!(f, "1 USD => {} {} as of {date}", self.rate, self.currency_code),
            None => write!(f, "1 USD => {} {} (undated)", self.rate, self.currency_code),
        }
    }
}
