//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests for seed pages
//! - Error classification
//! - Picking the body's character encoding from the response headers

use crate::config::FetchConfig;
use crate::GleanError;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_glean::config::FetchConfig;
/// use sumi_glean::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true);

    // Also bounds the body read, so it is only set when configured
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Sends a GET request for a page and returns the response with its body unread
///
/// Only a transport failure is an error. A response with any status code is returned
/// so its body can still be scanned; a non-2xx status is logged as a warning.
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout | `GleanError::Timeout` |
/// | Connection refused / DNS / TLS | `GleanError::Connect` |
/// | Anything else (e.g. malformed URL) | `GleanError::Http` |
///
/// No retries are attempted.
pub async fn fetch_page(client: &Client, url: &str) -> crate::Result<Response> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            GleanError::Timeout {
                url: url.to_string(),
            }
        } else if e.is_connect() {
            GleanError::Connect {
                url: url.to_string(),
            }
        } else {
            GleanError::Http {
                url: url.to_string(),
                source: e,
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{} returned HTTP {}, scanning body anyway", url, status.as_u16());
    }

    Ok(response)
}

/// Returns the encoding declared by the response's Content-Type, or UTF-8
pub fn body_encoding(response: &Response) -> &'static Encoding {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(charset_from_content_type)
        .unwrap_or(UTF_8)
}

/// Parses the `charset` parameter of a Content-Type value
pub fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches('"').as_bytes())
    })
}
