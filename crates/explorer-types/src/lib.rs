// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Domain types for Insight-style blockchain explorer responses
//!
//! This crate provides the value shapes shared between the explorer client
//! and its consumers, avoiding circular dependencies between the transport
//! layer and wallet code.
//!
//! # Core Types
//!
//! - **Identifiers**: [`Txid`] (validated 256-bit hash string) and
//!   [`Address`] (opaque stringable wallet address)
//! - **Records**: [`Transaction`], [`Utxo`], [`BlockSummary`], [`Block`] -
//!   immutable value shapes produced once by decoding
//! - **Amount Normalization**: [`amount`] - resolves the explorer's
//!   number-or-string monetary fields into canonical `f64` values at decode
//!   time
//!
//! The explorer's JSON encoder is not schema-stable for numeric fields:
//! depending on endpoint and server version, a monetary value may arrive as
//! a JSON number or as a decimal string. Every record in this crate routes
//! such fields through [`amount::deserialize`], so consumers only ever
//! observe one representation.

pub mod amount;
pub mod ids;
pub mod records;

pub use amount::{AmountError, WireAmount};
pub use ids::{Address, Txid, TxidError};
pub use records::{
    Block, BlockSummary, BlockSummaryList, Input, Output, ScriptPubKey, Transaction,
    TransactionList, Utxo,
};
