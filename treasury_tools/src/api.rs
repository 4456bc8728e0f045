use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use frg_common::RateRecord;
use log::*;
use reqwest::Client;

use crate::{config::TreasuryConfig, data_objects::DATE_FORMAT, RatesResponse, TreasuryApiError};

/// Time to establish a TCP connection to the provider.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Time to wait for the full response once connected.
const READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Idle connections kept per provider host.
const MAX_IDLE_PER_HOST: usize = 20;
/// The provider caps page sizes at 500 records; requesting more is silently truncated.
const PAGE_LIMIT: u32 = 500;

/// Client for the fiscal-data rates-of-exchange endpoint.
///
/// Issues one GET per query and normalizes the response into canonical [`RateRecord`]s. The client is cheap to
/// clone; all clones share one connection pool.
#[derive(Clone)]
pub struct TreasuryApi {
    config: TreasuryConfig,
    client: Arc<Client>,
}

impl TreasuryApi {
    pub fn new(config: TreasuryConfig) -> Result<Self, TreasuryApiError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(READ_TIMEOUT)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .build()
            .map_err(|e| TreasuryApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Fetch records with an effective date on or after `from_date`, newest first.
    pub async fn fetch_rates_since(&self, from_date: NaiveDate) -> Result<Vec<RateRecord>, TreasuryApiError> {
        let filter = format!("record_date:gte:\"{}\"", from_date.format(DATE_FORMAT));
        debug!("Fetching exchange rates effective on or after {from_date}");
        let records = self.rates_query(&filter, Some("-record_date")).await?;
        info!("Fetched {} exchange rates effective on or after {from_date}", records.len());
        Ok(records)
    }

    /// Fetch the records published for exactly `date`.
    pub async fn fetch_rates_for_date(&self, date: NaiveDate) -> Result<Vec<RateRecord>, TreasuryApiError> {
        let filter = format!("record_date:eq:\"{}\"", date.format(DATE_FORMAT));
        debug!("Fetching exchange rates for {date}");
        let records = self.rates_query(&filter, None).await?;
        info!("Fetched {} exchange rates for {date}", records.len());
        Ok(records)
    }

    pub fn url(&self, filter: &str, sort: Option<&str>) -> String {
        let mut url = format!("{}?filter={}&limit={PAGE_LIMIT}", self.config.base_url, encode_filter(filter));
        if let Some(sort) = sort {
            url.push_str("&sort=");
            url.push_str(sort);
        }
        url
    }

    async fn rates_query(&self, filter: &str, sort: Option<&str>) -> Result<Vec<RateRecord>, TreasuryApiError> {
        let url = self.url(filter, sort);
        trace!("Sending rates query: {url}");
        let response =
            self.client.get(&url).send().await.map_err(|e| TreasuryApiError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Rates query successful. {}", response.status());
            let body =
                response.json::<RatesResponse>().await.map_err(|e| TreasuryApiError::JsonError(e.to_string()))?;
            Ok(body.normalize())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| TreasuryApiError::ResponseError(e.to_string()))?;
            Err(TreasuryApiError::QueryError { status, message })
        }
    }
}

/// Percent-encode the characters the provider's filter grammar uses. The rest of the filter is plain ASCII.
fn encode_filter(filter: &str) -> String {
    filter.replace(' ', "%20").replace('"', "%22").replace(':', "%3A")
}
