//! Utility functions for timestamp handling.

pub mod timestamps;

pub use timestamps::{format_iso, iso_timestamp, now_utc, stamped_id, Timestamp};
