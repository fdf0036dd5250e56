//! Shared constants used across the application.

/// User agent sent with upstream API requests.
pub const USER_AGENT: &str = concat!("freefeed-bff/", env!("CARGO_PKG_VERSION"));
