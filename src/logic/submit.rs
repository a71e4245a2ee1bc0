// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Submit step: turn a full entry collection into one update request and classify failures.
//!
//! Collections are always replaced wholesale; there is no per-item endpoint.

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::Endpoints;
use crate::error::{CodecError, TransportError};
use crate::logic::errors::{self, SubmissionError};
use crate::logic::pii_config;
use crate::logic::transport::{Method, Request, Transport};
use crate::models::relay::assign_ids;
use crate::models::{FormEntry, Relay, Rule};

/// Wire behaviour of an entry kind.
pub trait Submittable: FormEntry {
    /// Human-readable collection name for logs.
    const COLLECTION: &'static str;

    /// Request replacing the remote collection with `entries`.
    fn collection_request(entries: &[Self], endpoints: &Endpoints) -> Result<Request, CodecError>;

    /// Read the saved collection back from the updated parent resource.
    fn decode_collection(response: &Value) -> Result<Vec<Self>, CodecError>;

    /// Map a rejection payload onto the error taxonomy.
    fn classify_error(response: Option<&Value>) -> SubmissionError;
}

impl Submittable for Rule {
    const COLLECTION: &'static str = "data scrubbing rules";

    fn collection_request(entries: &[Self], endpoints: &Endpoints) -> Result<Request, CodecError> {
        let relay_pii_config = pii_config::encode(entries)?;
        Ok(Request {
            method: Method::Put,
            url: endpoints.rules.clone(),
            body: Some(json!({ "relayPiiConfig": relay_pii_config })),
        })
    }

    fn decode_collection(response: &Value) -> Result<Vec<Self>, CodecError> {
        pii_config::decode_response(response)
    }

    fn classify_error(response: Option<&Value>) -> SubmissionError {
        errors::classify_rule_error(response)
    }
}

impl Submittable for Relay {
    const COLLECTION: &'static str = "trusted relays";

    fn collection_request(entries: &[Self], endpoints: &Endpoints) -> Result<Request, CodecError> {
        // `id` is skipped by the serializer.
        let trusted_relays = serde_json::to_value(entries)?;
        Ok(Request {
            method: Method::Put,
            url: endpoints.relays.clone(),
            body: Some(json!({ "trustedRelays": trusted_relays })),
        })
    }

    fn decode_collection(response: &Value) -> Result<Vec<Self>, CodecError> {
        let mut relays = match response.get("trustedRelays") {
            Some(Value::Null) => Vec::new(),
            Some(list) => serde_json::from_value::<Vec<Relay>>(list.clone())?,
            None => return Err(CodecError::MissingField("trustedRelays")),
        };
        assign_ids(&mut relays);
        Ok(relays)
    }

    fn classify_error(response: Option<&Value>) -> SubmissionError {
        errors::classify_relay_error(response)
    }
}

/// Send the whole collection and return the updated parent resource.
pub fn submit<E: Submittable>(
    transport: &dyn Transport,
    endpoints: &Endpoints,
    entries: &[E],
) -> Result<Value, TransportError> {
    let request = E::collection_request(entries, endpoints)
        .map_err(|err| TransportError::Encode(err.to_string()))?;

    debug!(
        collection = E::COLLECTION,
        entries = entries.len(),
        method = request.method.as_str(),
        url = %request.url,
        "Submitting collection"
    );

    match transport.send(&request) {
        Ok(response) => {
            info!(collection = E::COLLECTION, entries = entries.len(), "Collection saved");
            Ok(response)
        }
        Err(err) => {
            warn!(collection = E::COLLECTION, error = %err, "Collection update rejected");
            Err(err)
        }
    }
}
