//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the canoebot binary.

mod commands;
mod query;
mod serve;

pub use commands::{Cli, Commands};
pub use query::{list_facilities, list_slots, query};
pub use serve::serve;
