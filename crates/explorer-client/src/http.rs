// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Request execution, response decoding, and the pull operations
//!
//! [`HttpApi`] owns the shared `reqwest` client and the joined base URL.
//! Every request goes through [`HttpApi::execute`], which applies the one
//! policy quirk this explorer needs: an HTTP 400 on the first attempt is
//! retried exactly once with the identical request, because the service is
//! known to return spurious Bad Request statuses under load. Any other
//! non-success status is terminal, and transport failures are never
//! retried.
//!
//! Bodies are interpreted by the typed decode step in [`HttpApi::fetch`],
//! never by the executor itself.

use explorer_types::{Address, Block, BlockSummaryList, Transaction, TransactionList, Txid, Utxo};
use reqwest::{Method, StatusCode, header};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, DecodeError, HistoryError};

/// Window size of the transaction listing pagination
const PAGE_SIZE: usize = 50;

/// The pull half of the client: request executor, decoder, and the
/// explorer's request/response operations.
#[derive(Debug)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: Url,
    max_pages: usize,
}

impl HttpApi {
    /// Wrap an already-built HTTP client and normalized base URL.
    ///
    /// `base_url` must end with a trailing slash so endpoint joining keeps
    /// the base path; [`crate::ExplorerClient::connect`] guarantees this.
    pub(crate) fn new(http: reqwest::Client, base_url: Url, max_pages: usize) -> Self {
        Self {
            http,
            base_url,
            max_pages,
        }
    }

    fn endpoint_url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self.base_url.join(endpoint)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Issue one request, retrying a single time on a spurious 400.
    ///
    /// Succeeds only on a 2xx final status; the body is left untouched for
    /// the decode step.
    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.endpoint_url(endpoint, query)?;
        let build = || {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .header(header::CONTENT_TYPE, "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }
            request
        };

        debug!(%method, %url, "dispatching explorer request");
        let mut response = build().send().await?;
        if response.status() == StatusCode::BAD_REQUEST {
            debug!(%url, "explorer answered 400, retrying once");
            response = build().send().await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::RequestFailed { status });
        }
        Ok(response)
    }

    /// Execute a request and decode the body into a typed record.
    ///
    /// The body is read to completion before parsing, on every path.
    async fn fetch<T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.execute(method, endpoint, body, query).await?;
        let bytes = response.bytes().await?;
        let decoded = serde_json::from_slice(&bytes).map_err(DecodeError::from)?;
        Ok(decoded)
    }

    /// Fetch a single transaction by id.
    pub async fn transaction(&self, txid: &Txid) -> Result<Transaction, ClientError> {
        self.fetch(Method::GET, &format!("tx/{txid}"), None, &[])
            .await
    }

    /// Fetch one pagination window of the address transaction listing.
    async fn transactions_page(
        &self,
        addrs: &[Address],
        from: usize,
        to: usize,
    ) -> Result<TransactionList, ClientError> {
        let body = json!({
            "addrs": join_addresses(addrs),
            "from": from,
            "to": to,
        });
        self.fetch(Method::POST, "addrs/txs", Some(&body), &[])
            .await
    }

    /// Fetch the full transaction history for a set of addresses.
    ///
    /// Pages through the listing in windows of 50 until the accumulated
    /// count reaches the server's declared total, or until `max_pages`
    /// windows have been requested. On any page failure the transactions
    /// fetched so far are returned inside the error.
    pub async fn transactions(&self, addrs: &[Address]) -> Result<Vec<Transaction>, HistoryError> {
        let mut collected: Vec<Transaction> = Vec::new();
        let mut from = 0;
        for _ in 0..self.max_pages {
            let list = match self.transactions_page(addrs, from, from + PAGE_SIZE).await {
                Ok(list) => list,
                Err(source) => {
                    return Err(HistoryError {
                        partial: collected,
                        source,
                    });
                }
            };
            collected.extend(list.items);
            if collected.len() >= list.total_items {
                return Ok(collected);
            }
            from += PAGE_SIZE;
        }
        warn!(
            max_pages = self.max_pages,
            fetched = collected.len(),
            "transaction listing exceeded the page guard"
        );
        Err(HistoryError {
            partial: collected,
            source: ClientError::TooManyPages {
                max_pages: self.max_pages,
            },
        })
    }

    /// Fetch the unspent outputs for a set of addresses.
    pub async fn utxos(&self, addrs: &[Address]) -> Result<Vec<Utxo>, ClientError> {
        let body = json!({ "addrs": join_addresses(addrs) });
        self.fetch(Method::POST, "addrs/utxo", Some(&body), &[])
            .await
    }

    /// Resolve the best block and its parent.
    ///
    /// The listing endpoint does not expose a parent hash for the head
    /// block, so the two most recent summaries are fetched and the second
    /// becomes the first one's parent.
    pub async fn best_block(&self) -> Result<Block, ClientError> {
        let list: BlockSummaryList = self
            .fetch(Method::GET, "blocks", None, &[("limit", "2")])
            .await?;
        let (Some(tip), Some(parent)) = (list.blocks.first(), list.blocks.get(1)) else {
            return Err(ClientError::InsufficientData {
                count: list.blocks.len(),
            });
        };
        Ok(Block {
            hash: tip.hash.clone(),
            parent: parent.hash.clone(),
            height: tip.height,
            time: tip.time,
        })
    }

    /// Broadcast a raw transaction, returning the id assigned by the
    /// explorer.
    pub async fn broadcast(&self, raw_tx: &[u8]) -> Result<Txid, ClientError> {
        #[derive(Deserialize)]
        struct BroadcastResponse {
            txid: Txid,
        }

        let body = json!({ "rawtx": hex::encode(raw_tx) });
        let response: BroadcastResponse =
            self.fetch(Method::POST, "tx/send", Some(&body), &[]).await?;
        Ok(response.txid)
    }
}

fn join_addresses(addrs: &[Address]) -> String {
    addrs
        .iter()
        .map(Address::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
