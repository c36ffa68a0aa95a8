// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Client configuration

use url::Url;

/// Configuration for an [`crate::ExplorerClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the explorer API; the scheme must be `http` or `https`
    pub base_url: String,
    /// Request timeout for pull operations, in seconds
    pub timeout_seconds: u64,
    /// How long to wait for the push channel handshake, in seconds
    pub connect_timeout_seconds: u64,
    /// Upper bound on pagination requests for one transaction listing.
    ///
    /// Guards against a server whose declared total never converges with
    /// the items it actually serves.
    pub max_pages: usize,
    /// Optional proxy for the HTTP transport
    pub proxy: Option<Url>,
    /// Override for the push channel endpoint.
    ///
    /// When unset, the endpoint is derived from `base_url`: `ws` on port 80
    /// for `http`, `wss` on port 443 for `https`.
    pub push_url: Option<Url>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://insight.bitpay.com/api".to_string(),
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
            max_pages: 2000,
            proxy: None,
            push_url: None,
        }
    }
}
