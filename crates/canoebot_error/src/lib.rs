//! Error types for the canoebot workspace.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use canoebot_error::{CanoebotResult, SrcError, SrcErrorKind};
//!
//! fn fetch_table() -> CanoebotResult<String> {
//!     Err(SrcError::new(SrcErrorKind::Timeout(10)))?
//! }
//!
//! match fetch_table() {
//!     Ok(table) => println!("Got: {}", table),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod booking;
mod command;
mod config;
mod error;

pub use booking::{SrcError, SrcErrorKind};
pub use command::{CommandError, CommandErrorKind};
pub use config::ConfigError;
pub use error::{CanoebotError, CanoebotErrorKind, CanoebotResult};
