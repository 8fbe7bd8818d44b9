//! Canoebot - SRC facility availability for the canoe team
//!
//! Canoebot answers "what is free at the Sports & Recreation Centre?" from a
//! per-facility cache of weekly booking tables, so bursts of identical
//! questions cost one fetch.
//!
//! # Features
//!
//! - **Booking cache**: two 8-day windows per facility with long/short TTLs
//! - **Text commands**: `/src`, `/srcrefresh`, `/facilities`, `/status`
//! - **Scheduled refresh**: populated lines re-fetched on an interval
//! - **Observability**: `tracing` logs, OpenTelemetry with `observability`
//!
//! # Quick Start
//!
//! ```no_run
//! use canoebot::{BookingCache, CommandHandler, SrcConfig, SrcWebsite};
//!
//! # async fn run() -> canoebot::CanoebotResult<()> {
//! let config = SrcConfig::load()?;
//! let cache = BookingCache::new(
//!     config.facilities()?,
//!     SrcWebsite::new(config.cache())?,
//!     config.cache().clone(),
//! );
//!
//! let handler = CommandHandler::new(cache);
//! println!("{}", handler.handle("/src badminton tomorrow").await);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `canoebot_error` - Error types
//! - `canoebot_src` - Facility config, table fetch/parse and the booking cache
//!
//! This crate (`canoebot`) re-exports both and adds the command layer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod date;
mod observability;
mod scheduler;

pub use canoebot_error::*;
pub use canoebot_src::*;

pub use command::{BotCommand, CommandHandler, UNAVAILABLE_REPLY, command_error_reply};
pub use date::parse_date;
pub use observability::{ObservabilityConfig, init_observability, shutdown_observability};
pub use scheduler::{RefreshMessage, RefreshService, RefreshTrigger, RefreshWorker};
