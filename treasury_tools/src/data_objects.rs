use chrono::NaiveDate;
use frg_common::RateRecord;
use log::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency_map::currency_code_for_label;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The JSON envelope the rates-of-exchange endpoint wraps its records in.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub data: Vec<RawRateRecord>,
}

/// One record exactly as the provider sends it. All fields arrive as strings and any of them may be absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRateRecord {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_currency_desc: String,
    #[serde(default)]
    pub exchange_rate: String,
    #[serde(default)]
    pub record_date: String,
}

impl RawRateRecord {
    /// Convert a raw provider record into a canonical [`RateRecord`].
    ///
    /// Returns `None` when the record is unusable: no currency label, no rate, a rate that does not parse as a
    /// decimal, or a non-positive rate. A missing or malformed date is not fatal; the record is kept with
    /// `effective_date: None` and filtered out by date-window checks downstream.
    pub fn normalize(&self) -> Option<RateRecord> {
        if self.currency.trim().is_empty() || self.exchange_rate.trim().is_empty() {
            debug!("Skipping record with missing currency or exchange_rate");
            return None;
        }
        let rate = match self.exchange_rate.trim().parse::<Decimal>() {
            Ok(r) if r > Decimal::ZERO => r,
            Ok(r) => {
                debug!("Skipping record for {} with non-positive rate {r}", self.currency);
                return None;
            },
            Err(e) => {
                debug!("Skipping record for {} with unparseable rate '{}': {e}", self.currency, self.exchange_rate);
                return None;
            },
        };
        let effective_date = parse_record_date(&self.record_date);
        let code = currency_code_for_label(&self.currency)
            .map(String::from)
            .unwrap_or_else(|| self.currency.trim().to_uppercase());
        Some(RateRecord::new(
            code,
            self.country_currency_desc.clone(),
            rate,
            effective_date,
            self.country.clone(),
        ))
    }
}

impl RatesResponse {
    /// Normalize the whole batch, preserving provider order. Unusable records are dropped, never fatal.
    pub fn normalize(self) -> Vec<RateRecord> {
        let total = self.data.len();
        let records = self.data.iter().filter_map(RawRateRecord::normalize).collect::<Vec<RateRecord>>();
        info!("Parsed {} of {total} exchange-rate records from the provider response", records.len());
        records
    }
}

/// Dates parse strictly from `YYYY-MM-DD`; anything else is treated as absent. The length guard is needed
/// because chrono accepts unpadded month and day fields that the provider never legitimately sends.
fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.len() != 10 {
        debug!("Ignoring malformed record_date '{value}'");
        return None;
    }
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Ignoring malformed record_date '{value}': {e}");
            None
        },
    }
}
