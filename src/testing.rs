// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared test fixtures.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;
use url::Url;

use crate::config::Endpoints;
use crate::error::TransportError;
use crate::logic::transport::{Request, Transport};

/// Transport that records requests and answers from a queue of canned replies.
///
/// The last reply is repeated once the queue would otherwise run dry.
pub struct RecordingTransport {
    requests: Mutex<Vec<Request>>,
    replies: Mutex<VecDeque<Result<Value, TransportError>>>,
}

impl RecordingTransport {
    pub fn replying(reply: Result<Value, TransportError>) -> Self {
        Self::with_replies(vec![reply])
    }

    pub fn with_replies(replies: Vec<Result<Value, TransportError>>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &Request) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies
                .front()
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Network("no reply queued".into())))
        }
    }
}

/// Project-scoped endpoints on a fake host.
pub fn endpoints() -> Endpoints {
    let base = Url::parse("https://sentry.example.com/api/0/").unwrap();
    let org = base.join("organizations/acme/").unwrap();
    Endpoints {
        rules: base.join("projects/acme/backend/").unwrap(),
        relays: org.clone(),
        suggestions: org.join("data-scrubbing-selector-suggestions/").unwrap(),
        project: Some("backend".into()),
    }
}
