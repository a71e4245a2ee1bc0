// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Typed errors shared by the domain layer, the wire codecs and the transport seam.

use serde_json::Value;
use thiserror::Error;

/// Failures raised while building or mutating a draft.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    /// An edit dialog referenced an entry that is not part of the saved collection.
    #[error("no saved entry with id {id}")]
    EntryNotFound { id: String },
    /// An edit dialog was opened without naming the entry to edit.
    #[error("no entry selected for editing")]
    MissingTarget,
    /// The field is locked for this dialog (e.g. the public key of an existing relay).
    #[error("field '{field}' cannot be changed")]
    FieldDisabled { field: &'static str },
    /// The value cannot be represented by the field's type.
    #[error("'{value}' is not a valid value for field '{field}'")]
    InvalidValue { field: &'static str, value: String },
}

/// Errors reported by a [`crate::logic::transport::Transport`] implementation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TransportError {
    /// The server answered with a non-success status. `body` holds the decoded JSON, if any.
    #[error("request failed with status {status}")]
    Status { status: u16, body: Option<Value> },
    /// The request never produced a response.
    #[error("request could not be completed: {0}")]
    Network(String),
    /// The request body could not be built.
    #[error("request body could not be encoded: {0}")]
    Encode(String),
}

impl TransportError {
    /// Structured error payload returned by the server, when there is one.
    pub fn response_json(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            Self::Network(_) | Self::Encode(_) => None,
        }
    }
}

/// Errors raised while encoding or decoding collection payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown rule type '{0}'")]
    UnknownType(String),
    #[error("unknown redaction method '{0}'")]
    UnknownMethod(String),
    #[error("application references missing rule '{0}'")]
    MissingRule(String),
    #[error("response does not contain '{0}'")]
    MissingField(&'static str),
}
