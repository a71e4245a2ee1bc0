// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Source selector suggestions offered while typing a rule's `source`.

use serde::Deserialize;
use serde_json::Value;

use crate::config::Endpoints;
use crate::error::CodecError;
use crate::logic::transport::{Method, Request};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Value,
    Unary,
    Binary,
    String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SourceSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl SourceSuggestion {
    fn plain(value: &str, description: &str) -> Self {
        Self {
            kind: SuggestionKind::Value,
            value: value.to_string(),
            description: Some(description.to_string()),
            examples: Vec::new(),
        }
    }
}

/// Lookup state of the event id used to fetch event-specific suggestions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventIdStatus {
    Loading,
    Loaded,
    NotFound,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventId {
    pub value: String,
    /// `None` while no event id is set.
    pub status: Option<EventIdStatus>,
}

/// Generic suggestions used when no event is selected or nothing was found.
pub fn default_suggestions() -> Vec<SourceSuggestion> {
    [
        ("**", "everywhere"),
        ("password", "attributes named \"password\""),
        ("$error.value", "the exception value"),
        ("$message", "the log message"),
        ("extra.MyValue", "the key \"MyValue\" in \"Additional Data\""),
        ("extra.**", "everything in \"Additional Data\""),
        ("$http.headers.x-custom-token", "the X-Custom-Token HTTP header"),
        ("$user.ip_address", "the user IP address"),
        ("$frame.vars.foo", "the local variable \"foo\""),
        ("contexts.device.timezone", "the timezone in the device context"),
        ("tags.server_name", "the tag \"server_name\""),
        ("$attachments.**", "all attachments"),
        ("$attachments.'logfile.txt'", "all attachments named \"logfile.txt\""),
        ("$minidump", "the entire minidump of a native crash report"),
        ("$minidump.heap_memory", "the heap memory region in a native crash report"),
        ("code_file", "the pathname of a code module in a native crash report"),
        ("debug_file", "the pathname of a debug module in a native crash report"),
    ]
    .into_iter()
    .map(|(value, description)| SourceSuggestion::plain(value, description))
    .collect()
}

/// GET request for suggestions derived from one event.
pub fn suggestions_request(endpoints: &Endpoints, event_id: &str) -> Request {
    let mut url = endpoints.suggestions.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("eventId", event_id);
        if let Some(project) = endpoints.project.as_deref() {
            query.append_pair("projectId", project);
        }
    }
    Request {
        method: Method::Get,
        url,
        body: None,
    }
}

/// Read `{"suggestions": [...]}`.
pub fn decode_suggestions(body: &Value) -> Result<Vec<SourceSuggestion>, CodecError> {
    match body.get("suggestions") {
        Some(Value::Null) => Ok(Vec::new()),
        Some(list) => Ok(Vec::<SourceSuggestion>::deserialize(list)?),
        None => Err(CodecError::MissingField("suggestions")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    fn endpoints(project: Option<&str>) -> Endpoints {
        let org = Url::parse("https://sentry.example.com/api/0/organizations/acme/").unwrap();
        Endpoints {
            rules: org.clone(),
            relays: org.clone(),
            suggestions: org.join("data-scrubbing-selector-suggestions/").unwrap(),
            project: project.map(str::to_string),
        }
    }

    #[test]
    fn request_carries_event_and_project() {
        let request = suggestions_request(&endpoints(Some("backend")), "abc123");

        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.url.query(),
            Some("eventId=abc123&projectId=backend")
        );
        assert!(request.body.is_none());

        let org_only = suggestions_request(&endpoints(None), "abc123");
        assert_eq!(org_only.url.query(), Some("eventId=abc123"));
    }

    #[test]
    fn decodes_server_suggestions() {
        let body = json!({
            "suggestions": [
                {"type": "value", "value": "$frame.vars.password", "examples": ["hunter2"]},
                {"type": "binary", "value": "&&"}
            ]
        });

        let suggestions = decode_suggestions(&body).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].examples, vec!["hunter2".to_string()]);
        assert_eq!(suggestions[1].kind, SuggestionKind::Binary);
        assert!(decode_suggestions(&json!({})).is_err());
    }

    #[test]
    fn defaults_are_value_suggestions() {
        let defaults = default_suggestions();
        assert!(defaults.iter().all(|s| s.kind == SuggestionKind::Value));
        assert!(defaults.iter().any(|s| s.value == "$message"));
    }
}
