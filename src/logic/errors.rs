// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Maps raw server error payloads onto the fixed submission error taxonomy.
//!
//! The server answers a rejected collection update with `{"<collection key>": ["message", ...]}`.
//! Only the first message is inspected. Missing or unrecognised payloads always classify as
//! [`ErrorKind::Unknown`]; classification never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::logic::validation::FIELD_REQUIRED;

/// Error payload key for data scrubbing rules.
pub const RULES_ERROR_KEY: &str = "relayPiiConfig";
/// Error payload key for trusted relays.
pub const RELAYS_ERROR_KEY: &str = "trustedRelays";

static LINE_COLUMN_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"at line \d+ column \d+").expect("line/column pattern is a valid regex")
});

/// Classified failure kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSelector,
    RegexParse,
    InvalidKey,
    MissingKey,
    KeyAlreadyTaken,
    EmptyName,
    MissingName,
    BadStructure,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSelector => "invalid-selector",
            Self::RegexParse => "regex-parse",
            Self::InvalidKey => "invalid-key",
            Self::MissingKey => "missing-key",
            Self::KeyAlreadyTaken => "key-already-taken",
            Self::EmptyName => "empty-name",
            Self::MissingName => "missing-name",
            Self::BadStructure => "bad-structure",
            Self::Unknown => "unknown",
        }
    }

    /// Name of the form field the error is rendered on, or `None` for a global notification.
    pub fn target_field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidSelector => Some("source"),
            Self::RegexParse => Some("pattern"),
            Self::InvalidKey | Self::MissingKey => Some("publicKey"),
            Self::EmptyName | Self::MissingName => Some("name"),
            Self::KeyAlreadyTaken | Self::BadStructure | Self::Unknown => None,
        }
    }
}

/// A rejected submission, ready to be shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SubmissionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// First message listed under `key` in an error response body.
pub fn first_message<'a>(response: Option<&'a Value>, key: &str) -> Option<&'a str> {
    response?
        .get(key)?
        .as_array()?
        .first()?
        .as_str()
        .filter(|message| !message.trim().is_empty())
}

/// Classify a rejected data scrubbing rule update.
pub fn classify_rule_error(response: Option<&Value>) -> SubmissionError {
    let Some(message) = first_message(response, RULES_ERROR_KEY) else {
        return SubmissionError::new(
            ErrorKind::Unknown,
            "Unknown error occurred while saving data scrubbing rule",
        );
    };

    if message.starts_with("invalid selector: ")
        && let Some(line) = message.lines().find(|line| line.starts_with("1 | "))
    {
        let selector = line["1 | ".len()..].trim();
        return SubmissionError::new(
            ErrorKind::InvalidSelector,
            format!("Invalid source value: {selector}"),
        );
    }

    if message.starts_with("regex parse error:")
        && let Some(line) = message.lines().find(|line| line.starts_with("error:"))
    {
        let detail = LINE_COLUMN_SUFFIX.replace(&line["error:".len()..], "");
        return SubmissionError::new(
            ErrorKind::RegexParse,
            format!("Invalid regex: {}", detail.trim()),
        );
    }

    SubmissionError::new(
        ErrorKind::Unknown,
        "An unknown error occurred while saving data scrubbing rule",
    )
}

/// Classify a rejected trusted relay update.
pub fn classify_relay_error(response: Option<&Value>) -> SubmissionError {
    let unknown = || {
        SubmissionError::new(
            ErrorKind::Unknown,
            "An unknown error occurred while saving Relay public key.",
        )
    };

    let Some(message) = first_message(response, RELAYS_ERROR_KEY) else {
        return unknown();
    };

    match message {
        "Bad structure received for Trusted Relays" => {
            return SubmissionError::new(ErrorKind::BadStructure, "An invalid structure was sent.");
        }
        "Relay key already taken" => {
            return SubmissionError::new(ErrorKind::KeyAlreadyTaken, "Relay key already taken.");
        }
        _ => {}
    }

    // Remaining messages are a serialized `{field: [messages]}` object.
    let Ok(details) = serde_json::from_str::<Value>(message) else {
        return unknown();
    };

    if let Some(detail) = first_detail(&details, "publicKey") {
        let lower = detail.to_ascii_lowercase();
        return if lower.contains("required") || lower.contains("missing") {
            SubmissionError::new(ErrorKind::MissingKey, FIELD_REQUIRED)
        } else {
            SubmissionError::new(ErrorKind::InvalidKey, "Invalid Relay key")
        };
    }

    if let Some(detail) = first_detail(&details, "name") {
        let lower = detail.to_ascii_lowercase();
        let kind = if lower.contains("blank") || lower.contains("empty") {
            ErrorKind::EmptyName
        } else {
            ErrorKind::MissingName
        };
        return SubmissionError::new(kind, FIELD_REQUIRED);
    }

    unknown()
}

fn first_detail<'a>(details: &'a Value, field: &str) -> Option<&'a str> {
    match details.get(field)? {
        Value::String(message) => Some(message),
        Value::Array(messages) => messages.first()?.as_str(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules_payload(message: &str) -> Value {
        json!({ "relayPiiConfig": [message] })
    }

    fn relays_payload(message: &str) -> Value {
        json!({ "trustedRelays": [message] })
    }

    #[test]
    fn invalid_selector_targets_source() {
        let payload =
            rules_payload("invalid selector: unexpected token\n  |\n1 | $bad.path\n  | ^^^");
        let err = classify_rule_error(Some(&payload));

        assert_eq!(err.kind, ErrorKind::InvalidSelector);
        assert_eq!(err.kind.target_field(), Some("source"));
        assert!(err.message.contains("$bad.path"));
        assert_eq!(err.message, "Invalid source value: $bad.path");
    }

    #[test]
    fn regex_parse_strips_position_suffix() {
        let payload =
            rules_payload("regex parse error:\n    (\\d+\n    ^\nerror: unclosed group at line 2 column 5");
        let err = classify_rule_error(Some(&payload));

        assert_eq!(err.kind, ErrorKind::RegexParse);
        assert_eq!(err.kind.target_field(), Some("pattern"));
        assert_eq!(err.message, "Invalid regex: unclosed group");
        assert!(!err.message.contains("at line"));
    }

    #[test]
    fn missing_payload_is_unknown() {
        let absent = classify_rule_error(None);
        assert_eq!(absent.kind, ErrorKind::Unknown);
        assert_eq!(
            absent.message,
            "Unknown error occurred while saving data scrubbing rule"
        );

        let wrong_shape = classify_rule_error(Some(&json!({ "relayPiiConfig": "oops" })));
        assert_eq!(wrong_shape.kind, ErrorKind::Unknown);
        assert_eq!(wrong_shape.kind.target_field(), None);
    }

    #[test]
    fn unmatched_rule_message_is_unknown() {
        let err = classify_rule_error(Some(&rules_payload("invalid selector: nothing useful")));
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(
            err.message,
            "An unknown error occurred while saving data scrubbing rule"
        );
    }

    #[test]
    fn relay_fixed_messages() {
        let bad = classify_relay_error(Some(&relays_payload(
            "Bad structure received for Trusted Relays",
        )));
        assert_eq!(bad.kind, ErrorKind::BadStructure);
        assert_eq!(bad.kind.target_field(), None);

        let taken = classify_relay_error(Some(&relays_payload("Relay key already taken")));
        assert_eq!(taken.kind, ErrorKind::KeyAlreadyTaken);
        assert_eq!(taken.kind.target_field(), None);
        assert_eq!(taken.message, "Relay key already taken.");
    }

    #[test]
    fn relay_field_messages() {
        let invalid = classify_relay_error(Some(&relays_payload(
            r#"{"publicKey": ["Invalid public key"]}"#,
        )));
        assert_eq!(invalid.kind, ErrorKind::InvalidKey);
        assert_eq!(invalid.message, "Invalid Relay key");

        let missing = classify_relay_error(Some(&relays_payload(
            r#"{"publicKey": ["This field is required."]}"#,
        )));
        assert_eq!(missing.kind, ErrorKind::MissingKey);

        let empty = classify_relay_error(Some(&relays_payload(
            r#"{"name": ["This field may not be blank."]}"#,
        )));
        assert_eq!(empty.kind, ErrorKind::EmptyName);
        assert_eq!(empty.kind.target_field(), Some("name"));

        let missing_name =
            classify_relay_error(Some(&relays_payload(r#"{"name": ["This field is required."]}"#)));
        assert_eq!(missing_name.kind, ErrorKind::MissingName);
    }

    #[test]
    fn relay_garbage_is_unknown() {
        assert_eq!(classify_relay_error(None).kind, ErrorKind::Unknown);
        assert_eq!(
            classify_relay_error(Some(&relays_payload("teapot"))).kind,
            ErrorKind::Unknown
        );
        assert_eq!(
            classify_relay_error(Some(&relays_payload(r#"{"other": ["x"]}"#))).kind,
            ErrorKind::Unknown
        );
    }
}
