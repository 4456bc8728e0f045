mod api;
mod config;
mod currency_map;
mod data_objects;
mod error;

pub use api::TreasuryApi;
pub use config::{TreasuryConfig, DEFAULT_TREASURY_API_URL};
pub use currency_map::currency_code_for_label;
pub use data_objects::{RatesResponse, RawRateRecord};
pub use error::TreasuryApiError;
