//! Shared HTTP Client Module
//!
//! Provides a global, lazy-initialized HTTP client with connection pooling.
//! This eliminates the overhead of creating new clients per request and
//! enables connection reuse across analysis calls.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for Gemini API calls
///
/// Configuration tuned for large inline-document requests:
/// - 120s timeout (vision analysis of a dense statement is slow)
/// - modest idle pool; one analysis is in flight at a time
/// - TLS session resumption via connection reuse
pub static GEMINI_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create Gemini HTTP client")
});

/// Get the global Gemini HTTP client
///
/// The client is created on first access and reused for all subsequent calls.
#[inline]
pub fn gemini_client() -> &'static Client {
    &GEMINI_CLIENT
}
