//! Where booking tables come from.

use crate::{CacheConfig, Facility, RawTable, parse_booking_table};
use async_trait::async_trait;
use canoebot_error::{CanoebotError, CanoebotResult, ConfigError, SrcError, SrcErrorKind};
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches the raw 8-day booking table of a facility starting at a date.
///
/// Implementations do I/O only; the cache validates the shape of whatever
/// comes back before keeping it.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetch the table covering `anchor ..= anchor + 7`.
    async fn fetch_table(&self, facility: &Facility, anchor: NaiveDate) -> Result<RawTable, SrcError>;
}

/// Date as SRC expects it in the query string, e.g. `03-JUL-23`.
///
/// # Example
///
/// ```
/// use canoebot_src::request_date;
///
/// let date = chrono::NaiveDate::from_ymd_opt(2023, 7, 3).unwrap();
/// assert_eq!(request_date(date), "03-JUL-23");
/// ```
pub fn request_date(date: NaiveDate) -> String {
    date.format("%d-%b-%y").to_string().to_uppercase()
}

/// The SRC booking website.
#[derive(Debug, Clone)]
pub struct SrcWebsite {
    client: reqwest::Client,
    url_template: String,
    timeout: Duration,
}

impl SrcWebsite {
    /// Create a client with the configured URL template and fetch timeout.
    #[instrument(skip(config), fields(timeout_secs = *config.fetch_timeout_secs()))]
    pub fn new(config: &CacheConfig) -> CanoebotResult<Self> {
        debug!("Creating SRC website client");
        let timeout = config.fetch_timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CanoebotError::from(ConfigError::new(
                    "http_client",
                    format!("Failed to build HTTP client: {}", e),
                ))
            })?;

        Ok(Self {
            client,
            url_template: config.url_template().clone(),
            timeout,
        })
    }

    /// Booking page URL for a facility and anchor date.
    pub fn table_url(&self, facility: &Facility, anchor: NaiveDate) -> String {
        self.url_template
            .replace("{code}", facility.code_name())
            .replace("{courts}", &facility.courts().to_string())
            .replace("{date}", &request_date(anchor))
    }
}

#[async_trait]
impl TableSource for SrcWebsite {
    #[instrument(skip(self, facility), fields(facility = %facility.code_name(), %anchor))]
    async fn fetch_table(&self, facility: &Facility, anchor: NaiveDate) -> Result<RawTable, SrcError> {
        let url = self.table_url(facility, anchor);
        debug!(%url, "Fetching booking table");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SrcError::new(SrcErrorKind::Timeout(self.timeout.as_secs()))
            } else {
                SrcError::new(SrcErrorKind::Fetch(format!("Request failed: {}", e)))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SrcError::new(SrcErrorKind::Status(status.as_u16())));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SrcError::new(SrcErrorKind::Timeout(self.timeout.as_secs()))
            } else {
                SrcError::new(SrcErrorKind::Fetch(format!("Failed to read body: {}", e)))
            }
        })?;

        let table = parse_booking_table(&body)?;
        debug!(rows = table.len(), "Parsed booking table");
        Ok(table)
    }
}
