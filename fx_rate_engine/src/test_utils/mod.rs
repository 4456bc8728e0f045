//! In-memory doubles for the engine's trait seams, used by the test suites and handy for embedders that want
//! to drive the engine without a real provider or store.
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::NaiveDate;
use dashmap::DashMap;
use frg_common::RateRecord;
use rust_decimal::Decimal;

use crate::{
    fra_api::purchase_objects::Purchase,
    traits::{PurchaseStore, PurchaseStoreError, RateSource, SourceError},
};

/// Purchase store backed by a concurrent map.
#[derive(Default)]
pub struct MemoryPurchaseStore {
    purchases: DashMap<String, Purchase>,
}

impl MemoryPurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.purchases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }
}

impl PurchaseStore for MemoryPurchaseStore {
    async fn save(&self, purchase: Purchase) -> Result<Purchase, PurchaseStoreError> {
        self.purchases.insert(purchase.id.clone(), purchase.clone());
        Ok(purchase)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Purchase>, PurchaseStoreError> {
        Ok(self.purchases.get(id).map(|entry| entry.value().clone()))
    }
}

/// Rate source serving a fixed record set, with a call counter and a failure switch.
///
/// `fetch_since` mimics the provider: it serves records whose effective date is on or after the cut-off,
/// newest first, and counts every call — including failing ones, which is what a network outage looks like
/// from the caller's side.
pub struct StaticRateSource {
    records: Vec<RateRecord>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl StaticRateSource {
    pub fn new(records: Vec<RateRecord>) -> Self {
        Self { records, calls: AtomicUsize::new(0), failing: AtomicBool::new(false) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn serve(&self) -> Result<(), SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(SourceError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RateSource for &StaticRateSource {
    async fn fetch_since(&self, from_date: NaiveDate) -> Result<Vec<RateRecord>, SourceError> {
        self.serve()?;
        let mut records = self
            .records
            .iter()
            .filter(|r| r.effective_date.map(|d| d >= from_date).unwrap_or(false))
            .cloned()
            .collect::<Vec<RateRecord>>();
        records.sort_by(|a, b| b.effective_date.cmp(&a.effective_date));
        Ok(records)
    }

    async fn fetch_on(&self, date: NaiveDate) -> Result<Vec<RateRecord>, SourceError> {
        self.serve()?;
        Ok(self.records.iter().filter(|r| r.effective_date == Some(date)).cloned().collect())
    }
}

/// Shorthand for building a dated rate record in tests.
pub fn rate_record(code: &str, description: &str, country: &str, rate: Decimal, date: &str) -> RateRecord {
    let effective_date = Some(date.parse::<NaiveDate>().expect("valid test date"));
    RateRecord::new(code.to_string(), description.to_string(), rate, effective_date, country.to_string())
}
