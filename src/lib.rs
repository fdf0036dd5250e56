//! FreeFeed backend-for-frontend.
//!
//! Fetches pages from the FreeFeed API on behalf of a client and returns
//! them as a compact, normalized envelope: entities keyed by id, users
//! deduplicated, and only the users the page actually references.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod constants;
pub mod format;
pub mod web;
