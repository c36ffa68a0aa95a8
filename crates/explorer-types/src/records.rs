// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Decoded explorer records
//!
//! These are the typed shapes of the explorer's response bodies. They are
//! produced once by decoding and never mutated afterwards. Monetary fields
//! go through [`crate::amount::deserialize`], so `value`/`amount` are
//! always canonical floats regardless of how the server serialized them.
//!
//! Metadata fields (`confirmations`, `blockheight`, `time`, ...) are
//! pass-through: the client does not interpret them, it only hands them to
//! the wallet.

use serde::Deserialize;

use crate::amount;
use crate::ids::Txid;

/// A transaction as reported by the explorer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    /// Transaction identifier
    pub txid: Txid,
    /// Inputs, in wire order
    #[serde(rename = "vin", default)]
    pub inputs: Vec<Input>,
    /// Outputs, in wire order
    #[serde(rename = "vout", default)]
    pub outputs: Vec<Output>,
    /// Hash of the containing block, if confirmed
    #[serde(default)]
    pub blockhash: Option<String>,
    /// Height of the containing block, if confirmed (-1 while unconfirmed)
    #[serde(default)]
    pub blockheight: Option<i64>,
    /// Confirmation count at query time
    #[serde(default)]
    pub confirmations: Option<u64>,
    /// Transaction timestamp, seconds since epoch
    #[serde(default)]
    pub time: Option<i64>,
}

/// A transaction input
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Input {
    /// Funding transaction id; absent for coinbase inputs
    #[serde(default)]
    pub txid: Option<Txid>,
    /// Funding output index
    #[serde(default)]
    pub vout: Option<u32>,
    /// Address that owned the spent output, when the explorer resolved it
    #[serde(default)]
    pub addr: Option<String>,
    /// Spent amount in coin units, normalized from the ambiguous wire form
    #[serde(deserialize_with = "amount::deserialize")]
    pub value: f64,
}

/// A transaction output
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Output {
    /// Output amount in coin units, normalized from the ambiguous wire form
    #[serde(deserialize_with = "amount::deserialize")]
    pub value: f64,
    /// Output index
    pub n: u32,
    /// Locking script
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
    /// Id of the transaction that spent this output, if any
    #[serde(rename = "spentTxId", default)]
    pub spent_tx_id: Option<String>,
}

/// Locking script of an output
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptPubKey {
    /// Script bytes as hex
    pub hex: String,
    /// Addresses the explorer decoded from the script
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// One page of the address transaction listing; a paging unit only,
/// discarded after accumulation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionList {
    /// Total matching transactions across all pages
    #[serde(rename = "totalItems")]
    pub total_items: usize,
    /// Transactions in this page, in listing order
    #[serde(default)]
    pub items: Vec<Transaction>,
}

/// An unspent transaction output for a watched address
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Utxo {
    /// Owning address
    pub address: String,
    /// Funding transaction id
    pub txid: Txid,
    /// Funding output index
    pub vout: u32,
    /// Locking script as hex
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: String,
    /// Amount in coin units, normalized from the ambiguous wire form
    #[serde(deserialize_with = "amount::deserialize")]
    pub amount: f64,
    /// Block height of the funding transaction, if confirmed
    #[serde(default)]
    pub height: Option<i64>,
    /// Confirmation count at query time
    #[serde(default)]
    pub confirmations: Option<u64>,
}

/// One entry of the block listing endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockSummary {
    /// Block hash
    pub hash: String,
    /// Block height
    pub height: u64,
    /// Block timestamp, seconds since epoch
    #[serde(default)]
    pub time: Option<i64>,
}

/// Response of the block listing endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockSummaryList {
    /// Most-recent-first block summaries
    #[serde(default)]
    pub blocks: Vec<BlockSummary>,
}

/// The chain tip as delivered on the block notification stream.
///
/// The listing endpoint does not expose a parent hash for the head block,
/// so `parent` is synthesized by the client from the second-most-recent
/// summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Hash of the best block
    pub hash: String,
    /// Hash of its predecessor
    pub parent: String,
    /// Height of the best block
    pub height: u64,
    /// Timestamp of the best block, seconds since epoch
    pub time: Option<i64>,
}
