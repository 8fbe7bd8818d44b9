//! SRC facility booking lookups.
//!
//! The university's Sports & Recreation Centre (SRC) publishes one HTML page
//! per facility and date, covering that date and the seven after it. This
//! crate fetches those pages, reduces them to hourly availability and keeps
//! them in a [`BookingCache`]: two resident 8-day windows ("ways") per
//! facility, replaced and refreshed under a single mutex that is never held
//! across a fetch.
//!
//! # Example
//!
//! ```no_run
//! use canoebot_src::{BookingCache, SrcConfig, SrcWebsite};
//!
//! # async fn run() -> canoebot_error::CanoebotResult<()> {
//! let config = SrcConfig::load()?;
//! let source = SrcWebsite::new(config.cache())?;
//! let cache = BookingCache::new(config.facilities()?, source, config.cache().clone());
//!
//! let today = chrono::Local::now().date_naive();
//! println!("{}", cache.get_result(today, 0).await?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod availability;
mod cache;
mod config;
mod facility;
mod parse;
mod source;

pub use availability::{
    DAYS_PER_TABLE, FIRST_DAY_COLUMN, HourlySlot, RawTable, SlotAvailability, format_day,
    render_slots,
};
pub use cache::{BookingCache, CacheLine, RefreshFailure, RefreshReport, Way};
pub use config::{CacheConfig, CacheConfigBuilder, SrcConfig};
pub use facility::{Facilities, Facility, FacilityId};
pub use parse::parse_booking_table;
pub use source::{SrcWebsite, TableSource, request_date};
