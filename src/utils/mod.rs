//! Utility functions and helpers
//!
//! Timestamps, CSV row formatting and durable file creation.

pub mod csv;
pub mod durable;
pub mod time;

pub use time::{current_timestamp, file_stamp};
