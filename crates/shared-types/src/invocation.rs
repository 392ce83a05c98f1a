//! # Invocation and Response
//!
//! The request handed to a contract and the `{status, message, payload}`
//! triple it answers with.

use serde::{Deserialize, Serialize};

use crate::entities::{Credential, TxId};
use crate::errors::ContractError;

/// Response status codes.
pub mod status {
    /// Success.
    pub const OK: u16 = 200;
    /// Validation failure.
    pub const BAD_REQUEST: u16 = 400;
    /// Caller identity could not be resolved.
    pub const FORBIDDEN: u16 = 403;
    /// Missing key or unknown operation.
    pub const NOT_FOUND: u16 = 404;
    /// Commit conflict or repeated initialisation.
    pub const CONFLICT: u16 = 409;
    /// Store or serialization failure.
    pub const INTERNAL_ERROR: u16 = 500;
}

/// A single contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// Transaction id. Generated by the runtime when absent.
    #[serde(default)]
    pub tx_id: Option<TxId>,
    /// Operation name.
    pub function: String,
    /// Ordered string arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Signed creator of the proposal.
    #[serde(default)]
    pub creator: Credential,
}

impl Invocation {
    /// Build an invocation without a transaction id.
    pub fn new<I, S>(function: impl Into<String>, args: I, creator: Credential) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tx_id: None,
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
            creator,
        }
    }

    /// Set the transaction id.
    #[must_use]
    pub fn with_tx_id(mut self, tx_id: impl Into<TxId>) -> Self {
        self.tx_id = Some(tx_id.into());
        self
    }
}

/// Outcome of an invocation as returned to the peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP-like status code.
    pub status: u16,
    /// Human-readable message; empty on success.
    pub message: String,
    /// Result bytes (JSON for most operations).
    #[serde(with = "payload_text")]
    pub payload: Vec<u8>,
}

impl Response {
    /// 200 with the given payload.
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: status::OK,
            message: String::new(),
            payload: payload.into(),
        }
    }

    /// Error response carrying the error's status and message.
    pub fn from_error(err: &ContractError) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
            payload: Vec::new(),
        }
    }

    /// True for status 200.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == status::OK
    }

    /// Payload interpreted as UTF-8, lossy.
    #[must_use]
    pub fn payload_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

impl From<Result<Vec<u8>, ContractError>> for Response {
    fn from(result: Result<Vec<u8>, ContractError>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => Self::from_error(&err),
        }
    }
}

// Payloads are mostly JSON text; keep them readable on the wire.
mod payload_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&String::from_utf8_lossy(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        String::deserialize(d).map(String::into_bytes)
    }
}
