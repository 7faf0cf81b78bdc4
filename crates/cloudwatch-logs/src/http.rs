// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP client construction and request logging helpers.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Url};

use crate::error::ServiceError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options governing how the HTTP client is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Overrides the regional endpoint (scheme + host [+ port]).
    pub endpoint: Option<String>,
    /// Per-request timeout, covering connect, send and response.
    pub timeout: Duration,
    /// HTTPS proxy URL.
    pub https_proxy: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            https_proxy: None,
        }
    }
}

/// Creates the reqwest client builder shared by every service client.
#[must_use]
pub fn create_reqwest_client_builder() -> ClientBuilder {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
}

pub(crate) fn build_client(options: &ClientOptions) -> Result<Client, ServiceError> {
    let mut builder = create_reqwest_client_builder().timeout(options.timeout);
    if let Some(proxy) = &options.https_proxy {
        let proxy = reqwest::Proxy::https(proxy)
            .map_err(|e| ServiceError::InvalidConfig(format!("invalid https proxy: {e}")))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|e| ServiceError::InvalidConfig(format!("failed to build http client: {e}")))
}

/// Parses an endpoint and returns it with the `Host` value used for signing.
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<(Url, String), ServiceError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ServiceError::InvalidConfig(format!("invalid endpoint '{endpoint}': {e}")))?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ServiceError::InvalidConfig(format!(
            "unsupported endpoint scheme '{}'",
            url.scheme()
        )));
    }
    let Some(host) = url.host_str() else {
        return Err(ServiceError::InvalidConfig(format!(
            "endpoint '{endpoint}' has no host"
        )));
    };
    let host = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Ok((url, host))
}

/// Returns a redacted view of request headers suitable for debug logging.
pub(crate) fn redact_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    const SENSITIVE_HEADERS: [&str; 2] = ["authorization", "x-amz-security-token"];

    headers
        .iter()
        .map(|(name, value)| {
            let lower = name.as_str().to_ascii_lowercase();
            let display = if SENSITIVE_HEADERS.contains(&lower.as_str()) {
                "<redacted>".to_string()
            } else {
                value
                    .to_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| "<non-utf8>".to_string())
            };
            (lower, display)
        })
        .collect()
}
