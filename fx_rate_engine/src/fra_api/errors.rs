use chrono::NaiveDate;
use thiserror::Error;

use crate::traits::PurchaseStoreError;

#[derive(Debug, Clone, Error)]
pub enum RateResolveError {
    #[error("At least one of country, currency or description must be provided")]
    InvalidSelector,
    /// The governed upstream call failed and the fallback found nothing cached. Distinct from a successful
    /// query that simply has no rate in the window, which resolves to `Ok(None)`.
    #[error("The rate service is unavailable and no cached rate matches")]
    Unavailable,
}

#[derive(Debug, Clone, Error)]
pub enum ConversionError {
    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),
    #[error("Invalid conversion request: {0}")]
    Validation(String),
    #[error("No exchange rate is available between {from} and {to}")]
    RateUnavailable { from: NaiveDate, to: NaiveDate },
    #[error("The rate service is unavailable and no cached rate matches")]
    RateServiceUnavailable,
    #[error("Storage error: {0}")]
    StoreError(String),
}

impl From<PurchaseStoreError> for ConversionError {
    fn from(e: PurchaseStoreError) -> Self {
        ConversionError::StoreError(e.to_string())
    }
}
