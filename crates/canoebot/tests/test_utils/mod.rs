//! Test utilities for canoebot tests.

#![allow(dead_code)]

pub mod mock_source;

#[allow(unused_imports)]
pub use mock_source::{CountingSource, named_facilities};
