use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use dashmap::DashMap;
use frg_common::{helpers::env_flag, RateRecord};
use log::*;

use crate::fra_api::rate_objects::RateSelector;

/// Cache key: the selector's canonical uppercased token plus the target date of the lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    selector: String,
    date: NaiveDate,
}

impl CacheKey {
    pub fn new(selector: &RateSelector, date: NaiveDate) -> Self {
        Self { selector: selector.cache_token(), date }
    }

    /// Key for exact-date lookups by canonical currency code.
    pub fn for_code(code: &str, date: NaiveDate) -> Self {
        Self { selector: code.trim().to_uppercase(), date }
    }
}

/// Process-lifetime store of resolved rates, used both as a read-through fast path and as the degraded-mode
/// data source when the provider is unreachable. No TTL, no eviction; a later `put` for the same key replaces
/// the earlier record. The enabled flag gates every operation, so disabling the cache turns both the fast path
/// and the fallback off in one place.
pub struct RateCache {
    enabled: AtomicBool,
    entries: DashMap<CacheKey, RateRecord>,
}

impl RateCache {
    pub fn new(enabled: bool) -> Self {
        Self { enabled: AtomicBool::new(enabled), entries: DashMap::new() }
    }

    /// Honours `FRG_CACHE_ENABLED`; the cache is on unless that says otherwise.
    pub fn from_env_or_default() -> Self {
        Self::new(env_flag("FRG_CACHE_ENABLED", true))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn get(&self, key: &CacheKey) -> Option<RateRecord> {
        if !self.is_enabled() {
            return None;
        }
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn put(&self, key: CacheKey, record: RateRecord) {
        if !self.is_enabled() {
            return;
        }
        trace!("Caching {record} under {key:?}");
        self.entries.insert(key, record);
    }

    /// Best cached record for `selector` with an effective date inside `[from, to]` — the same selection the
    /// resolver applies to live data. This is the fallback path, so it scans values rather than keys: a record
    /// cached under one target date can still serve a different window.
    pub fn best_match_in_range(&self, selector: &RateSelector, from: NaiveDate, to: NaiveDate) -> Option<RateRecord> {
        if !self.is_enabled() {
            return None;
        }
        let mut best: Option<RateRecord> = None;
        for entry in self.entries.iter() {
            let record = entry.value();
            if !selector.matches(record) || !record.effective_within(from, to) {
                continue;
            }
            let better = match &best {
                None => true,
                Some(current) => record.effective_date > current.effective_date,
            };
            if better {
                best = Some(record.clone());
            }
        }
        best
    }

    /// Sorted, de-duplicated currency codes currently cached. Serves the available-currencies fallback.
    pub fn cached_codes(&self) -> Vec<String> {
        if !self.is_enabled() {
            return Vec::new();
        }
        let mut codes =
            self.entries.iter().map(|entry| entry.value().currency_code.clone()).collect::<Vec<String>>();
        codes.sort();
        codes.dedup();
        codes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
