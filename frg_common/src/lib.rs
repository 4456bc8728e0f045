mod rate_record;
mod usd_amount;

pub mod helpers;
pub mod op;

pub use rate_record::RateRecord;
pub use usd_amount::{UsdAmount, UsdAmountError, BASE_CURRENCY_CODE, BASE_CURRENCY_CODE_LOWER};
