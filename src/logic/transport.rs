// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Seam to the HTTP client owned by the embedding application.

use serde_json::Value;
use url::Url;

use crate::error::TransportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
        }
    }
}

/// A single JSON request.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

/// Executes requests and returns the decoded JSON response body.
///
/// Called from worker threads, so implementations must be shareable. Non-success responses
/// should be reported as [`TransportError::Status`] with the decoded error body attached.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Value, TransportError>;
}
