use chrono::NaiveDate;
use frg_common::RateRecord;
use thiserror::Error;
use treasury_tools::{TreasuryApi, TreasuryApiError};

/// Failure of an upstream rate query. These are the errors the resilience governor retries; input validation
/// never reaches a source, so a `SourceError` always means the provider (or the path to it) misbehaved.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Upstream request failed: {0}")]
    Network(String),
    #[error("Upstream returned an unusable payload: {0}")]
    Malformed(String),
}

/// A provider of exchange-rate records.
#[allow(async_fn_in_trait)]
pub trait RateSource {
    /// Fetch records with an effective date on or after `from_date`, newest first, bounded by the provider's
    /// page cap. One call, one batch; there is no pagination or streaming.
    async fn fetch_since(&self, from_date: NaiveDate) -> Result<Vec<RateRecord>, SourceError>;

    /// Fetch the records published for exactly `date`.
    async fn fetch_on(&self, date: NaiveDate) -> Result<Vec<RateRecord>, SourceError>;
}

impl RateSource for TreasuryApi {
    async fn fetch_since(&self, from_date: NaiveDate) -> Result<Vec<RateRecord>, SourceError> {
        self.fetch_rates_since(from_date).await.map_err(SourceError::from)
    }

    async fn fetch_on(&self, date: NaiveDate) -> Result<Vec<RateRecord>, SourceError> {
        self.fetch_rates_for_date(date).await.map_err(SourceError::from)
    }
}

impl From<TreasuryApiError> for SourceError {
    fn from(e: TreasuryApiError) -> Self {
        match e {
            TreasuryApiError::JsonError(msg) => SourceError::Malformed(msg),
            other => SourceError::Network(other.to_string()),
        }
    }
}
