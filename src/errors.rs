// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the remote listing client.
//!
//! Absent response fields (`hits`, `directories`, `files`) are never errors;
//! they decode as empty collections. Only the transport and the server can
//! fail a call.

use thiserror::Error;

/// Failure of a remote completion or listing call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (connect, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}
