use chrono::{NaiveDate, Utc};
use frg_common::UsdAmount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_DESCRIPTION_LENGTH: usize = 50;

/// A purchase recorded in the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub description: String,
    pub purchase_date: NaiveDate,
    pub amount: UsdAmount,
    pub created_at: NaiveDate,
}

impl Purchase {
    /// Build a new purchase with a fresh v4 UUID, stamped with today's date.
    pub fn create(description: &str, purchase_date: NaiveDate, amount: UsdAmount) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            purchase_date,
            amount,
            created_at: Utc::now().date_naive(),
        }
    }

    pub fn is_description_valid(&self) -> bool {
        !self.description.trim().is_empty() && self.description.chars().count() <= MAX_DESCRIPTION_LENGTH
    }

    pub fn is_purchase_date_valid(&self) -> bool {
        self.purchase_date <= Utc::now().date_naive()
    }

    pub fn is_id_valid(&self) -> bool {
        !self.id.trim().is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.is_id_valid() && self.is_description_valid() && self.is_purchase_date_valid()
    }
}

/// The outcome of a successful conversion: the original purchase, the rate that was applied, and the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedPurchase {
    pub purchase_id: String,
    pub description: String,
    pub purchase_date: NaiveDate,
    pub original_amount: UsdAmount,
    pub currency_code: String,
    pub exchange_rate: Decimal,
    pub converted_amount: Decimal,
    pub rate_effective_date: Option<NaiveDate>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn amount() -> UsdAmount {
        UsdAmount::from_dollars(100).unwrap()
    }

    #[test]
    fn create_assigns_a_unique_id() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let a = Purchase::create("office chair", date, amount());
        let b = Purchase::create("office chair", date, amount());
        assert_ne!(a.id, b.id);
        assert!(a.is_valid());
    }

    #[test]
    fn description_bounds() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let blank = Purchase::create("   ", date, amount());
        assert!(!blank.is_description_valid());
        let exact = Purchase::create(&"x".repeat(MAX_DESCRIPTION_LENGTH), date, amount());
        assert!(exact.is_description_valid());
        let long = Purchase::create(&"x".repeat(MAX_DESCRIPTION_LENGTH + 1), date, amount());
        assert!(!long.is_description_valid());
    }

    #[test]
    fn future_purchase_dates_are_invalid() {
        let today = Utc::now().date_naive();
        let p = Purchase::create("lunch", today, amount());
        assert!(p.is_purchase_date_valid());
        let p = Purchase::create("lunch", today + chrono::Days::new(1), amount());
        assert!(!p.is_purchase_date_valid());
        assert!(!p.is_valid());
    }

    #[test]
    fn mini_fuzz() {
        use rand::{distributions::Alphanumeric, Rng};
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        for _ in 0..500 {
            let len = rand::thread_rng().gen_range(1..=MAX_DESCRIPTION_LENGTH);
            let description: String =
                rand::thread_rng().sample_iter(&Alphanumeric).take(len).map(char::from).collect();
            let p = Purchase::create(&description, date, amount());
            assert!(p.is_valid(), "generated purchase should be valid: {p:?}");
        }
    }
}
