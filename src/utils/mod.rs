//! Shared utilities: address prefix validation helpers.

pub mod ip_utils;

pub use ip_utils::{hextet_count, is_hextet_prefix};
