use std::fmt::Debug;

use chrono::{NaiveDate, Utc};
use frg_common::UsdAmount;
use log::*;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    fra_api::{
        errors::{ConversionError, RateResolveError},
        purchase_objects::{ConvertedPurchase, Purchase, MAX_DESCRIPTION_LENGTH},
        rate_objects::RateSelector,
        resolver_api::{lookback_window, RateResolver},
    },
    traits::{PurchaseStore, RateSource},
};

/// Converts stored purchases into a target currency at the rate in effect on the purchase date.
///
/// A conversion request moves through validation (the purchase must exist, the selector must carry at least one
/// criterion), rate resolution over the six-month lookback window, and finally the arithmetic: the converted
/// amount is the product rounded half-up to cents, once, at the end.
pub struct ConversionApi<P, S> {
    store: P,
    resolver: RateResolver<S>,
}

impl<P, S> Debug for ConversionApi<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConversionApi")
    }
}

impl<P, S> ConversionApi<P, S>
where
    P: PurchaseStore,
    S: RateSource,
{
    pub fn new(store: P, resolver: RateResolver<S>) -> Self {
        Self { store, resolver }
    }

    pub fn resolver(&self) -> &RateResolver<S> {
        &self.resolver
    }

    /// Record a new purchase. The amount is rounded half-up to cents on entry and must remain positive; the
    /// description must be non-blank and at most [`MAX_DESCRIPTION_LENGTH`] characters; the purchase date may
    /// not lie in the future.
    pub async fn create_purchase(
        &self,
        description: &str,
        purchase_date: NaiveDate,
        amount: Decimal,
    ) -> Result<Purchase, ConversionError> {
        if description.trim().is_empty() {
            return Err(ConversionError::Validation("Description cannot be empty".to_string()));
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ConversionError::Validation(format!(
                "Description exceeds {MAX_DESCRIPTION_LENGTH} characters: {}",
                description.chars().count()
            )));
        }
        if purchase_date > Utc::now().date_naive() {
            return Err(ConversionError::Validation("Purchase date cannot be in the future".to_string()));
        }
        let amount = UsdAmount::rounded(amount).map_err(|e| ConversionError::Validation(e.to_string()))?;
        let purchase = Purchase::create(description, purchase_date, amount);
        let saved = self.store.save(purchase).await?;
        info!("💱️ Created purchase {} for {}", saved.id, saved.amount);
        Ok(saved)
    }

    pub async fn purchase(&self, id: &str) -> Result<Purchase, ConversionError> {
        if id.trim().is_empty() {
            return Err(ConversionError::Validation("Purchase id cannot be empty".to_string()));
        }
        self.store.find_by_id(id).await?.ok_or_else(|| {
            warn!("💱️ Purchase not found: {id}");
            ConversionError::PurchaseNotFound(id.to_string())
        })
    }

    /// Convert the identified purchase into the currency named by `selector`, at the most recent rate in effect
    /// within the six months up to the purchase date.
    pub async fn convert(
        &self,
        purchase_id: &str,
        selector: &RateSelector,
    ) -> Result<ConvertedPurchase, ConversionError> {
        if selector.is_empty() {
            return Err(ConversionError::Validation(
                "Must specify at least one of country, currency or description".to_string(),
            ));
        }
        let purchase = self.purchase(purchase_id).await?;
        let (from, to) = lookback_window(purchase.purchase_date);
        let record = match self.resolver.resolve(selector, from, to).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(
                    "💱️ Cannot convert purchase {purchase_id}: no rate for [{selector}] between {from} and {to}"
                );
                return Err(ConversionError::RateUnavailable { from, to });
            },
            Err(RateResolveError::InvalidSelector) => {
                return Err(ConversionError::Validation(RateResolveError::InvalidSelector.to_string()))
            },
            Err(RateResolveError::Unavailable) => return Err(ConversionError::RateServiceUnavailable),
        };
        let converted_amount =
            (purchase.amount.value() * record.rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        info!(
            "💱️ Converted purchase {purchase_id}: {} -> {converted_amount} {} at {}",
            purchase.amount, record.currency_code, record.rate
        );
        Ok(ConvertedPurchase {
            purchase_id: purchase.id,
            description: purchase.description,
            purchase_date: purchase.purchase_date,
            original_amount: purchase.amount,
            currency_code: record.currency_code,
            exchange_rate: record.rate,
            converted_amount,
            rate_effective_date: record.effective_date,
        })
    }

    /// The currencies a conversion can currently target. Delegates to the resolver; degrades to cached codes.
    pub async fn available_currencies(&self) -> Vec<String> {
        self.resolver.available_currencies().await
    }
}
