// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The client facade
//!
//! [`ExplorerClient`] composes the pull API and the push session behind a
//! single object. Construction validates the base URL, builds the shared
//! HTTP transport, dials the push channel, and wires the two notification
//! streams. Pull operations are plain async calls bounded by the shared
//! request timeout; the client adds no parallelism of its own.

use std::sync::Arc;
use std::time::Duration;

use explorer_types::{Address, Block, Transaction, Txid, Utxo};
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, HistoryError};
use crate::http::HttpApi;
use crate::push::PushSession;

/// A connected explorer client
#[derive(Debug)]
pub struct ExplorerClient {
    api: Arc<HttpApi>,
    push: PushSession,
    blocks: Option<UnboundedReceiver<Block>>,
    transactions: Option<UnboundedReceiver<Transaction>>,
}

impl ExplorerClient {
    /// Connect to the explorer named by `config`.
    ///
    /// Validates the base URL scheme, builds the HTTP transport, dials the
    /// push channel, and subscribes to new-block events before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnsupportedScheme`] for schemes other than
    /// `http`/`https`, [`ClientError::ConnectTimeout`] if the push channel
    /// handshake does not complete within the configured window, and
    /// transport errors from either channel.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(Url::parse(&config.base_url)?)?;
        let push_url = match config.push_url {
            Some(url) => url,
            None => derive_push_url(&base_url)?,
        };

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_seconds));
        if let Some(proxy) = config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        let http = builder.build()?;

        let api = Arc::new(HttpApi::new(http, base_url, config.max_pages));
        let (push, notifications) = PushSession::connect(
            &push_url,
            Arc::clone(&api),
            Duration::from_secs(config.connect_timeout_seconds),
        )
        .await?;

        Ok(Self {
            api,
            push,
            blocks: Some(notifications.blocks),
            transactions: Some(notifications.transactions),
        })
    }

    /// Fetch a single transaction by id.
    pub async fn transaction(&self, txid: &Txid) -> Result<Transaction, ClientError> {
        self.api.transaction(txid).await
    }

    /// Fetch the full transaction history for a set of addresses.
    ///
    /// # Errors
    ///
    /// On a page failure the [`HistoryError`] carries the transactions
    /// fetched before the failure, in page order.
    pub async fn transactions(&self, addrs: &[Address]) -> Result<Vec<Transaction>, HistoryError> {
        self.api.transactions(addrs).await
    }

    /// Fetch the unspent outputs for a set of addresses.
    pub async fn utxos(&self, addrs: &[Address]) -> Result<Vec<Utxo>, ClientError> {
        self.api.utxos(addrs).await
    }

    /// Resolve the best block and its parent hash.
    pub async fn best_block(&self) -> Result<Block, ClientError> {
        self.api.best_block().await
    }

    /// Broadcast a raw transaction, returning its explorer-assigned id.
    pub async fn broadcast(&self, raw_tx: &[u8]) -> Result<Txid, ClientError> {
        self.api.broadcast(raw_tx).await
    }

    /// Subscribe to push notifications for transactions touching `address`.
    ///
    /// May be called any number of times; each call registers one more
    /// address. There is no unsubscribe.
    pub fn listen_address(&self, address: &Address) -> Result<(), ClientError> {
        self.push.subscribe(address)
    }

    /// Take the block notification stream.
    ///
    /// The stream exists for the lifetime of the client and can be taken
    /// once; subsequent calls return `None`. It yields `None` after
    /// [`close`](Self::close).
    pub fn block_notifications(&mut self) -> Option<UnboundedReceiver<Block>> {
        self.blocks.take()
    }

    /// Take the transaction notification stream.
    ///
    /// Same take-once lifetime as [`block_notifications`](Self::block_notifications).
    pub fn transaction_notifications(&mut self) -> Option<UnboundedReceiver<Transaction>> {
        self.transactions.take()
    }

    /// Tear down the push channel.
    ///
    /// Waits for the receive loop to finish so that no publish is in
    /// flight, then both notification streams end. In-flight pull requests
    /// are not aborted.
    pub async fn close(&mut self) {
        self.push.close().await;
    }
}

/// Check the scheme and make the path joinable (trailing slash).
fn normalize_base_url(mut url: Url) -> Result<Url, ClientError> {
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ClientError::UnsupportedScheme(other.to_string())),
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Derive the push endpoint from the API base URL: same host and path,
/// websocket scheme, explicit scheme-implied port.
fn derive_push_url(base_url: &Url) -> Result<Url, ClientError> {
    let (scheme, port) = if base_url.scheme() == "https" {
        ("wss", 443)
    } else {
        ("ws", 80)
    };
    let host = base_url
        .host_str()
        .ok_or(ClientError::Url(url::ParseError::EmptyHost))?;
    Ok(Url::parse(&format!(
        "{scheme}://{host}:{port}{}",
        base_url.path()
    ))?)
}
