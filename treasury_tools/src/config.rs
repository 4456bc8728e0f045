use log::*;

pub const DEFAULT_TREASURY_API_URL: &str =
    "https://api.fiscaldata.treasury.gov/services/api/fiscal_service/v1/accounting/od/rates_of_exchange";

#[derive(Debug, Clone)]
pub struct TreasuryConfig {
    /// Base url of the fiscal-data rates-of-exchange endpoint, without a trailing query string.
    pub base_url: String,
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_TREASURY_API_URL.to_string() }
    }
}

impl TreasuryConfig {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn from_env_or_default() -> Self {
        match std::env::var("FRG_TREASURY_API_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(&url),
            _ => {
                debug!("FRG_TREASURY_API_URL not set, using the fiscal-data service default");
                Self::default()
            },
        }
    }
}
