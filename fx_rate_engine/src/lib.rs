//! FX Rate Engine
//!
//! The FX Rate Engine resolves the exchange rate that was in effect on or before a purchase date and converts
//! purchase amounts recorded in the base currency into a target currency at that rate. It is built to stay useful
//! while the upstream rate provider is flaky: every upstream call runs under a circuit breaker, a bounded retry
//! and a bulkhead, and degrades to an in-process rate cache when the provider cannot be reached.
//!
//! The library is divided into three main sections:
//! 1. The trait seams ([`mod@traits`]). The engine is provider-agnostic: anything implementing
//!    [`traits::RateSource`] can back the resolver (the fiscal-data client from `treasury_tools` does so out of
//!    the box), and purchase records are reached through the [`traits::PurchaseStore`] seam rather than a
//!    concrete repository.
//! 2. The public API ([`RateResolver`] and [`ConversionApi`]). The resolver picks the most recent rate inside a
//!    date window; the conversion API composes it with the purchase store and the six-month lookback rule.
//! 3. The shared infrastructure: the [`RateCache`] and the [`Resilience`] governor. Both are process-wide,
//!    internally synchronized, and injected explicitly into the components that need them.
mod cache;
mod fra_api;
mod resilience;

pub mod test_utils;
pub mod traits;

pub use cache::{CacheKey, RateCache};
pub use fra_api::{
    conversion_api::ConversionApi,
    errors::{ConversionError, RateResolveError},
    purchase_objects::{ConvertedPurchase, Purchase, MAX_DESCRIPTION_LENGTH},
    rate_objects::RateSelector,
    resolver_api::{RateResolver, LOOKBACK_MONTHS},
};
pub use resilience::{
    CircuitState,
    GovernorError,
    Resilience,
    ResilienceConfig,
    FAMILY_AVAILABLE_CURRENCIES,
    FAMILY_RATE_FOR_DATE,
    FAMILY_RECENT_IN_RANGE,
};
