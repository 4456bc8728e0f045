use std::fmt::Display;

use frg_common::RateRecord;
use serde::{Deserialize, Serialize};

/// Identifies which currency a caller wants a rate for.
///
/// Provider records are labelled with free-text currency names, and one name can appear under several countries
/// ("Rupee" is used by India, Pakistan and Nepal, among others). A selector therefore carries up to three
/// criteria; every criterion that is present must line up with the record for the record to match. At least one
/// criterion must be given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSelector {
    /// Country name as the provider spells it, e.g. "Euro Zone".
    pub country: Option<String>,
    /// Currency name or canonical code, e.g. "Euro" or "EUR".
    pub currency: Option<String>,
    /// The provider's combined country-currency description, e.g. "Euro Zone-Euro".
    pub description: Option<String>,
}

impl RateSelector {
    pub fn new(country: Option<String>, currency: Option<String>, description: Option<String>) -> Self {
        Self { country, currency, description }
    }

    pub fn for_currency(currency: &str) -> Self {
        Self { currency: Some(currency.to_string()), ..Default::default() }
    }

    pub fn for_country(country: &str) -> Self {
        Self { country: Some(country.to_string()), ..Default::default() }
    }

    fn field(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// True when no usable criterion is present (all fields missing or blank).
    pub fn is_empty(&self) -> bool {
        Self::field(&self.country).is_none()
            && Self::field(&self.currency).is_none()
            && Self::field(&self.description).is_none()
    }

    /// Whether `record` satisfies every criterion this selector carries.
    ///
    /// The currency criterion matches the canonical code exactly (case-insensitive) or as a substring of the
    /// record's description, so both "EUR" and "Euro" find euro records. Country matches by name equality,
    /// description by containment. An empty selector matches nothing.
    pub fn matches(&self, record: &RateRecord) -> bool {
        if self.is_empty() {
            return false;
        }
        if let Some(country) = Self::field(&self.country) {
            if !record.country.trim().eq_ignore_ascii_case(country) {
                return false;
            }
        }
        if let Some(currency) = Self::field(&self.currency) {
            let code_matches = record.currency_code.eq_ignore_ascii_case(currency);
            let label_matches = record.description.to_uppercase().contains(&currency.to_uppercase());
            if !code_matches && !label_matches {
                return false;
            }
        }
        if let Some(description) = Self::field(&self.description) {
            if !record.description.to_uppercase().contains(&description.to_uppercase()) {
                return false;
            }
        }
        true
    }

    /// Canonical uppercased form of the selector, used to build cache keys.
    pub fn cache_token(&self) -> String {
        let part = |v: &Option<String>| Self::field(v).map(str::to_uppercase).unwrap_or_default();
        format!("{}|{}|{}", part(&self.country), part(&self.currency), part(&self.description))
    }
}

impl Display for RateSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "country={}, currency={}, description={}",
            Self::field(&self.country).unwrap_or("*"),
            Self::field(&self.currency).unwrap_or("*"),
            Self::field(&self.description).unwrap_or("*"),
        )
    }
}
