// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Push channel: websocket subscription and notification fan-out
//!
//! The explorer pushes two kinds of events over a persistent websocket:
//! a new-block trigger on `bitcoind/hashblock` (payload ignored) and
//! per-address transaction ids on `bitcoind/addresstxid`. Frames are JSON
//! arrays, `["subscribe", args]` outbound and `[topic, payload]` inbound.
//!
//! Inbound frames are untrusted: they are classified into [`PushEvent`]
//! before any field access, and anything malformed is logged and dropped.
//! A bad push message must never crash or block the fan-out.
//!
//! One task owns the socket. It serializes subscribe commands and inbound
//! dispatch, resolves triggers into full records over the pull API, and
//! publishes into two unbounded channels. Publishing never blocks, so a
//! slow consumer costs memory, not liveness of the receive loop. Closing
//! the session cancels the task and waits for it, which drops the channel
//! senders and ends both notification streams.

use std::sync::Arc;
use std::time::Duration;

use explorer_types::{Address, Block, Transaction, Txid};
use futures_util::{SinkExt, StreamExt};
use serde::de::Error as _;
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, DecodeError};
use crate::http::HttpApi;

const BLOCK_TOPIC: &str = "bitcoind/hashblock";
const ADDRESS_TOPIC: &str = "bitcoind/addresstxid";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An inbound push frame after classification
#[derive(Debug, PartialEq)]
enum PushEvent {
    /// Something landed on the new-block topic; the payload is only a
    /// trigger and carries no information of its own
    NewBlock,
    /// Address-transaction payload: values are candidate transaction ids
    AddressTx(serde_json::Map<String, serde_json::Value>),
    /// An event on a topic this client never subscribed to
    Other(String),
}

impl PushEvent {
    fn classify(frame: &str) -> Result<Self, DecodeError> {
        let (topic, payload): (String, serde_json::Value) =
            serde_json::from_str(frame).map_err(DecodeError::from)?;
        match topic.as_str() {
            BLOCK_TOPIC => Ok(PushEvent::NewBlock),
            ADDRESS_TOPIC => match payload {
                serde_json::Value::Object(map) => Ok(PushEvent::AddressTx(map)),
                other => Err(DecodeError::from(serde_json::Error::custom(format!(
                    "addresstxid payload is not an object: {other}"
                )))),
            },
            _ => Ok(PushEvent::Other(topic)),
        }
    }
}

fn subscribe_frame(args: serde_json::Value) -> Message {
    Message::Text(json!(["subscribe", args]).to_string().into())
}

/// Handles to the two notification streams, created once per session
#[derive(Debug)]
pub(crate) struct Notifications {
    pub blocks: mpsc::UnboundedReceiver<Block>,
    pub transactions: mpsc::UnboundedReceiver<Transaction>,
}

/// The connected push channel session
#[derive(Debug)]
pub(crate) struct PushSession {
    commands: mpsc::UnboundedSender<Address>,
    shutdown: CancellationToken,
    receive_loop: Option<JoinHandle<()>>,
}

impl PushSession {
    /// Dial the push endpoint, subscribe to the new-block topic, and spawn
    /// the receive loop.
    ///
    /// Fails with [`ClientError::ConnectTimeout`] if the handshake does not
    /// complete within `connect_timeout`; no task or channel is created in
    /// that case.
    pub(crate) async fn connect(
        push_url: &Url,
        api: Arc<HttpApi>,
        connect_timeout: Duration,
    ) -> Result<(Self, Notifications), ClientError> {
        let handshake = connect_async(push_url.as_str());
        let (mut socket, _response) = match timeout(connect_timeout, handshake).await {
            Ok(connected) => connected?,
            Err(_) => {
                return Err(ClientError::ConnectTimeout {
                    seconds: connect_timeout.as_secs(),
                });
            }
        };
        debug!(%push_url, "push channel connected");
        socket.send(subscribe_frame(json!([BLOCK_TOPIC]))).await?;

        let (block_tx, block_rx) = mpsc::unbounded_channel();
        let (txn_tx, txn_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let receive_loop = tokio::spawn(
            ReceiveLoop {
                socket,
                api,
                blocks: block_tx,
                transactions: txn_tx,
                commands: command_rx,
                shutdown: shutdown.clone(),
            }
            .run(),
        );

        Ok((
            Self {
                commands: command_tx,
                shutdown,
                receive_loop: Some(receive_loop),
            },
            Notifications {
                blocks: block_rx,
                transactions: txn_rx,
            },
        ))
    }

    /// Register interest in transactions touching one more address.
    pub(crate) fn subscribe(&self, address: &Address) -> Result<(), ClientError> {
        self.commands
            .send(address.clone())
            .map_err(|_| ClientError::PushChannelClosed)
    }

    /// Tear down the connection and wait for the receive loop to finish.
    ///
    /// After this returns no publish is in flight and both notification
    /// streams yield `None`.
    pub(crate) async fn close(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.receive_loop.take() {
            if let Err(error) = handle.await {
                warn!(%error, "push channel receive loop ended abnormally");
            }
        }
    }
}

struct ReceiveLoop {
    socket: WsStream,
    api: Arc<HttpApi>,
    blocks: mpsc::UnboundedSender<Block>,
    transactions: mpsc::UnboundedSender<Transaction>,
    commands: mpsc::UnboundedReceiver<Address>,
    shutdown: CancellationToken,
}

impl ReceiveLoop {
    async fn run(mut self) {
        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    let _ = self.socket.close(None).await;
                    break;
                }
                command = self.commands.recv() => {
                    // None means the session handle is gone; shut down.
                    let Some(address) = command else { break };
                    let frame = subscribe_frame(json!([ADDRESS_TOPIC, [address.as_str()]]));
                    if let Err(error) = self.socket.send(frame).await {
                        warn!(%error, %address, "failed to send address subscription");
                        break;
                    }
                }
                frame = self.socket.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => self.dispatch(text.as_str()).await,
                        Some(Ok(Message::Close(_))) | None => {
                            debug!("push channel closed by the explorer");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(error)) => {
                            warn!(%error, "push channel receive error");
                            break;
                        }
                    }
                }
            }
        }
        // Dropping self here drops both senders, which ends the
        // notification streams for the consumer.
    }

    async fn dispatch(&mut self, frame: &str) {
        let event = match PushEvent::classify(frame) {
            Ok(event) => event,
            Err(error) => {
                warn!(%error, "dropping malformed push frame");
                return;
            }
        };
        match event {
            PushEvent::NewBlock => match self.api.best_block().await {
                Ok(block) => {
                    if self.blocks.send(block).is_err() {
                        debug!("block notification receiver dropped");
                    }
                }
                // Not fatal: the next trigger refreshes the tip anyway.
                Err(error) => warn!(%error, "failed to fetch best block after push trigger"),
            },
            PushEvent::AddressTx(payload) => {
                for value in payload.values() {
                    let Some(candidate) = value.as_str() else {
                        warn!(?value, "dropping non-string addresstxid payload value");
                        continue;
                    };
                    // Payload values mix transaction ids with address
                    // strings; only hash-shaped values are fetchable.
                    let Ok(txid) = candidate.parse::<Txid>() else {
                        debug!(candidate, "ignoring non-hash addresstxid payload value");
                        continue;
                    };
                    match self.api.transaction(&txid).await {
                        Ok(transaction) => {
                            if self.transactions.send(transaction).is_err() {
                                debug!("transaction notification receiver dropped");
                            }
                        }
                        Err(error) => {
                            warn!(%error, %txid, "failed to fetch transaction after push trigger");
                        }
                    }
                }
            }
            PushEvent::Other(topic) => debug!(%topic, "ignoring event on unexpected topic"),
        }
    }
}
