// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Dual-channel client for Insight-style blockchain explorers
//!
//! This crate talks to a remote blockchain-indexing service over two
//! channels at once:
//!
//! - **Pull**: request/response HTTP operations for transactions, UTXOs,
//!   block summaries, and broadcast, with the explorer's schema quirks
//!   (ambiguous numeric fields, spurious 400s) normalized away.
//! - **Push**: a persistent websocket subscription delivering new-block and
//!   address-transaction events, resolved into full typed records and
//!   fanned out over two in-process notification streams.
//!
//! # Usage
//!
//! ```rust,no_run
//! use explorer_client::{ClientConfig, ExplorerClient};
//! use explorer_types::Address;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = ExplorerClient::connect(ClientConfig::default()).await?;
//!
//! let address = Address::new("mkE1XUNJc1Vkbz64Pb2sF9musqxg9g8vBK");
//! let utxos = client.utxos(std::slice::from_ref(&address)).await?;
//! println!("{} unspent outputs", utxos.len());
//!
//! client.listen_address(&address)?;
//! let mut blocks = client.block_notifications().expect("taken once");
//! while let Some(block) = blocks.recv().await {
//!     println!("new tip {} (parent {})", block.hash, block.parent);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Pull operations are independent, stateless async calls over a shared
//! HTTP transport; run them on your own tasks if you need parallelism.
//! The push channel runs one background task whose handlers publish into
//! unbounded channels, so a slow notification consumer grows memory rather
//! than blocking the socket. [`ExplorerClient::close`] stops that task and
//! ends both streams; it does not abort in-flight pull requests.

pub mod client;
pub mod config;
pub mod error;
mod http;
mod push;

pub use client::ExplorerClient;
pub use config::ClientConfig;
pub use error::{ClientError, DecodeError, HistoryError};

pub use explorer_types as types;
