// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Identifier newtypes: transaction ids and wallet addresses
//!
//! [`Txid`] makes the 256-bit-hash shape unrepresentable to violate: once
//! constructed, it is guaranteed to be 64 lowercase hex characters. The
//! push channel relies on this to tell transaction ids apart from address
//! strings inside untrusted payloads.
//!
//! [`Address`] is deliberately unvalidated. Address syntax and network
//! rules belong to the wallet layer; this crate only needs the string form
//! to put on the wire.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a [`Txid`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TxidError {
    /// Input was not exactly 64 characters
    #[error("expected 64 hex characters, got {0}")]
    Length(usize),

    /// Input contained a non-hex character
    #[error("invalid hex character {0:?}")]
    InvalidCharacter(char),
}

/// A transaction identifier: the hex form of a 256-bit hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Txid(String);

impl Txid {
    /// View the identifier as its lowercase hex string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Txid {
    type Err = TxidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 {
            return Err(TxidError::Length(s.len()));
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(TxidError::InvalidCharacter(c));
        }
        Ok(Txid(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Txid {
    type Error = TxidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Txid> for String {
    fn from(txid: Txid) -> Self {
        txid.0
    }
}

impl fmt::Display for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Txid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An opaque wallet address in its string representation.
///
/// Validation happens upstream in the wallet; the client only joins
/// addresses into request bodies and subscribe commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Wrap an already-validated address string
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    /// View the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address(s.to_string())
    }
}
