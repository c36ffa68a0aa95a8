// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the explorer client
//!
//! Construction problems (`UnsupportedScheme`, `ConnectTimeout`) leave the
//! client unusable. Everything else is returned per call: `RequestFailed`
//! for terminal HTTP statuses, `Decode` for protocol mismatches, and
//! transport errors passed through transparently. Push-channel payload
//! problems are never surfaced here; they are logged and the event is
//! dropped.

use explorer_types::Transaction;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by explorer client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL scheme was neither `http` nor `https`
    #[error("unsupported url scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),

    /// The push channel handshake did not complete in time
    #[error("timed out after {seconds}s waiting for the push channel handshake")]
    ConnectTimeout {
        /// The configured handshake timeout
        seconds: u64,
    },

    /// The explorer answered with a terminal non-success status
    #[error("request failed: {status}")]
    RequestFailed {
        /// Final HTTP status, after the built-in single retry
        status: StatusCode,
    },

    /// The response body did not match the expected shape
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The block listing returned too few summaries to resolve a best block
    #[error("explorer returned {count} block summaries, need 2")]
    InsufficientData {
        /// Number of summaries actually returned
        count: usize,
    },

    /// The transaction listing did not converge within the page guard
    #[error("transaction listing did not converge within {max_pages} pages")]
    TooManyPages {
        /// The configured page bound
        max_pages: usize,
    },

    /// The push channel receive loop has shut down
    #[error("push channel is closed")]
    PushChannelClosed,

    /// Transport-level HTTP failure, passed through untouched
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Websocket transport failure, passed through untouched
    #[error(transparent)]
    Push(#[from] tokio_tungstenite::tungstenite::Error),

    /// A URL could not be parsed or joined
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// A response body failed to parse into its typed shape.
///
/// Amount normalization failures surface here too: the serde adapter in
/// `explorer_types::amount` turns a `TypeMismatch` into a decode error for
/// the enclosing record.
#[derive(Debug, Error)]
#[error("failed to decode explorer response: {source}")]
pub struct DecodeError {
    #[from]
    source: serde_json::Error,
}

/// A transaction listing failed part-way through pagination.
///
/// The pages fetched before the failure are preserved; whether partial
/// data is usable is the caller's decision.
#[derive(Debug, Error)]
#[error("transaction listing failed after {} fetched transactions: {source}", .partial.len())]
pub struct HistoryError {
    /// Transactions accumulated before the failure, in page order
    pub partial: Vec<Transaction>,
    /// The page failure itself
    #[source]
    pub source: ClientError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_display_unwrapped() {
        let inner = tokio_tungstenite::tungstenite::Error::ConnectionClosed;
        let expected = inner.to_string();
        assert_eq!(ClientError::from(inner).to_string(), expected);
    }
}
