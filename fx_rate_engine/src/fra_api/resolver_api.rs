use std::{fmt::Debug, sync::Arc};

use chrono::{Months, NaiveDate, Utc};
use frg_common::RateRecord;
use log::*;

use crate::{
    cache::{CacheKey, RateCache},
    fra_api::{errors::RateResolveError, rate_objects::RateSelector},
    resilience::{Resilience, FAMILY_AVAILABLE_CURRENCIES, FAMILY_RATE_FOR_DATE, FAMILY_RECENT_IN_RANGE},
    traits::RateSource,
};

/// Rates must be no older than this many calendar months before the purchase date.
pub const LOOKBACK_MONTHS: u32 = 6;

/// Resolves the exchange rate in effect on or before a target date, within a bounded window.
///
/// Every upstream query runs through the [`Resilience`] governor; when the governed call fails the resolver
/// degrades to the [`RateCache`] instead of surfacing the outage, and only an empty cache turns into an error.
pub struct RateResolver<S> {
    source: S,
    cache: Arc<RateCache>,
    resilience: Arc<Resilience>,
}

impl<S> Debug for RateResolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RateResolver")
    }
}

impl<S> RateResolver<S>
where S: RateSource
{
    pub fn new(source: S, cache: Arc<RateCache>, resilience: Arc<Resilience>) -> Self {
        Self { source, cache, resilience }
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// The most recent rate matching `selector` with an effective date in the inclusive `[from, to]` window.
    ///
    /// `Ok(None)` means the provider answered but holds no matching rate in the window — a legitimate business
    /// outcome. [`RateResolveError::Unavailable`] means the governed call failed *and* the cache fallback came
    /// up empty.
    pub async fn resolve(
        &self,
        selector: &RateSelector,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<RateRecord>, RateResolveError> {
        if selector.is_empty() {
            return Err(RateResolveError::InvalidSelector);
        }
        let key = CacheKey::new(selector, to);
        if let Some(hit) = self.cache.get(&key) {
            debug!("💱️ Cache hit for [{selector}] as of {to}");
            return Ok(Some(hit));
        }
        let records = match self.resilience.execute(FAMILY_RECENT_IN_RANGE, || self.source.fetch_since(from)).await {
            Ok(records) => records,
            Err(e) => {
                warn!("💱️ Governed rate query failed ({e}). Falling back to cached rates");
                return match self.cache.best_match_in_range(selector, from, to) {
                    Some(record) => {
                        info!("💱️ Serving cached rate {record} for [{selector}]");
                        Ok(Some(record))
                    },
                    None => Err(RateResolveError::Unavailable),
                };
            },
        };
        match most_recent_match(&records, selector, from, to) {
            Some(record) => {
                info!("💱️ Selected rate {record} for [{selector}] in [{from}, {to}]");
                self.cache.put(key, record.clone());
                Ok(Some(record.clone()))
            },
            None => {
                warn!(
                    "💱️ Provider returned {} rates but none matching [{selector}] between {from} and {to}",
                    records.len()
                );
                Ok(None)
            },
        }
    }

    /// Resolve against the purchase-date lookback window, `[purchase_date - 6 months, purchase_date]`.
    pub async fn resolve_for_purchase(
        &self,
        selector: &RateSelector,
        purchase_date: NaiveDate,
    ) -> Result<Option<RateRecord>, RateResolveError> {
        let (from, to) = lookback_window(purchase_date);
        self.resolve(selector, from, to).await
    }

    /// The rate published for `code` on exactly `date`.
    pub async fn rate_for_currency(
        &self,
        code: &str,
        date: NaiveDate,
    ) -> Result<Option<RateRecord>, RateResolveError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(RateResolveError::InvalidSelector);
        }
        let key = CacheKey::for_code(code, date);
        if let Some(hit) = self.cache.get(&key) {
            debug!("💱️ Cache hit for {code} on {date}");
            return Ok(Some(hit));
        }
        match self.resilience.execute(FAMILY_RATE_FOR_DATE, || self.source.fetch_on(date)).await {
            Ok(records) => {
                let hit = records.into_iter().find(|r| r.currency_code.eq_ignore_ascii_case(code));
                match hit {
                    Some(record) => {
                        self.cache.put(key, record.clone());
                        Ok(Some(record))
                    },
                    None => {
                        warn!("💱️ No exchange rate found for {code} on {date}");
                        Ok(None)
                    },
                }
            },
            Err(e) => {
                warn!("💱️ Governed rate query failed for {code} on {date} ({e}). Falling back to cached rates");
                // the key lookup already missed above, so only a concurrent fill can save us here
                self.cache.get(&key).map(Some).ok_or(RateResolveError::Unavailable)
            },
        }
    }

    /// The sorted set of currency codes with a rate in the most recent lookback window. Degrades to the codes
    /// the cache has seen when the provider is unreachable; never an error.
    pub async fn available_currencies(&self) -> Vec<String> {
        let today = Utc::now().date_naive();
        let (from, _) = lookback_window(today);
        match self.resilience.execute(FAMILY_AVAILABLE_CURRENCIES, || self.source.fetch_since(from)).await {
            Ok(records) => {
                let mut codes = records.into_iter().map(|r| r.currency_code).collect::<Vec<String>>();
                codes.sort();
                codes.dedup();
                info!("💱️ Found {} available currencies", codes.len());
                codes
            },
            Err(e) => {
                warn!("💱️ Governed currency listing failed ({e}). Returning cached codes");
                self.cache.cached_codes()
            },
        }
    }
}

/// Inclusive lookback window ending at `to_date`.
pub fn lookback_window(to_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = to_date.checked_sub_months(Months::new(LOOKBACK_MONTHS)).unwrap_or(NaiveDate::MIN);
    (from, to_date)
}

/// The matching record with the maximum effective date in the window. Ties keep the first-encountered record;
/// the provider returns newest-first, so first-in-order is the assumed intent.
fn most_recent_match<'a>(
    records: &'a [RateRecord],
    selector: &RateSelector,
    from: NaiveDate,
    to: NaiveDate,
) -> Option<&'a RateRecord> {
    let mut best: Option<&RateRecord> = None;
    for record in records {
        if !selector.matches(record) || !record.effective_within(from, to) {
            continue;
        }
        let better = match best {
            None => true,
            Some(current) => record.effective_date > current.effective_date,
        };
        if better {
            best = Some(record);
        }
    }
    best
}
