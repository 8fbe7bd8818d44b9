//! Test utilities for canoebot_src tests.
//!
//! This module provides a scripted table source and table builders.

#![allow(dead_code)]

pub mod mock_source;

#[allow(unused_imports)]
pub use mock_source::{MockTableSource, test_facilities, weekly_table};
