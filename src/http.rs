//! HTTP client utilities
//!
//! Provides a reqwest::Client configured with a bounded timeout so a hung
//! content request cannot stall a filter pass indefinitely.

use reqwest::Client;
use std::time::Duration;

/// Build a reqwest Client with the given request timeout
pub fn client_with_timeout(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("notefilter/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
}
