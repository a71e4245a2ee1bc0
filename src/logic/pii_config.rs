// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Conversion between the flat rule list edited in dialogs and the stored `relayPiiConfig`.
//!
//! Stored shape:
//!
//! ```json
//! {
//!   "rules": {"1": {"type": "pattern", "pattern": "\\d+", "redaction": {"method": "mask"}}},
//!   "applications": {"$message": ["@creditcard:mask", "1"]}
//! }
//! ```
//!
//! Built-in rules are referenced inline as `@<type>:<method>`. Pattern rules and any rule that
//! replaces with a placeholder need a custom rule entry keyed by the rule id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::models::{MethodType, Rule, RuleType};

#[derive(Debug, Default, Serialize, Deserialize)]
struct PiiConfig {
    #[serde(default)]
    rules: BTreeMap<String, CustomRule>,
    /// Source selector to ordered rule references.
    #[serde(default)]
    applications: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CustomRule {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default)]
    redaction: Redaction,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Redaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

fn needs_custom_rule(rule: &Rule) -> bool {
    rule.kind == RuleType::Pattern || rule.method == MethodType::Replace
}

/// Serialize rules into the `relayPiiConfig` JSON string.
pub fn encode(rules: &[Rule]) -> Result<String, CodecError> {
    let mut config = PiiConfig::default();

    for rule in rules {
        let reference = if needs_custom_rule(rule) {
            let key = rule.id.to_string();
            let text = (rule.method == MethodType::Replace && !rule.placeholder.is_empty())
                .then(|| rule.placeholder.clone());
            config.rules.insert(
                key.clone(),
                CustomRule {
                    kind: rule.kind.as_str().to_string(),
                    pattern: (rule.kind == RuleType::Pattern).then(|| rule.pattern.clone()),
                    redaction: Redaction {
                        method: Some(rule.method.as_str().to_string()),
                        text,
                    },
                },
            );
            key
        } else {
            format!("@{}:{}", rule.kind.as_str(), rule.method.as_str())
        };

        let refs = config
            .applications
            .entry(rule.source.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(refs) = refs {
            refs.push(Value::String(reference));
        }
    }

    Ok(serde_json::to_string(&config)?)
}

/// Parse a stored `relayPiiConfig`. `None` and blank strings mean "no rules".
///
/// Ids are assigned by position, so they are only stable until the next load.
pub fn decode(raw: Option<&str>) -> Result<Vec<Rule>, CodecError> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Ok(Vec::new());
    };
    let config: PiiConfig = serde_json::from_str(raw)?;

    let mut rules = Vec::new();
    for (source, refs) in &config.applications {
        let Value::Array(refs) = refs else {
            continue;
        };
        for reference in refs.iter().filter_map(Value::as_str) {
            let id = rules.len() as u32;
            let rule = match reference.strip_prefix('@') {
                Some(builtin) => decode_builtin(id, source, builtin)?,
                None => {
                    let custom = config
                        .rules
                        .get(reference)
                        .ok_or_else(|| CodecError::MissingRule(reference.to_string()))?;
                    decode_custom(id, source, custom)?
                }
            };
            rules.push(rule);
        }
    }

    Ok(rules)
}

/// Extract and decode `relayPiiConfig` from a project/organization response body.
pub fn decode_response(body: &Value) -> Result<Vec<Rule>, CodecError> {
    match body.get("relayPiiConfig") {
        Some(Value::String(raw)) => decode(Some(raw)),
        Some(Value::Null) => Ok(Vec::new()),
        _ => Err(CodecError::MissingField("relayPiiConfig")),
    }
}

fn parse_kind(raw: &str) -> Result<RuleType, CodecError> {
    RuleType::parse(raw).ok_or_else(|| CodecError::UnknownType(raw.to_string()))
}

fn parse_method(raw: Option<&str>) -> Result<MethodType, CodecError> {
    match raw {
        None => Ok(MethodType::Mask),
        Some(raw) => {
            MethodType::parse(raw).ok_or_else(|| CodecError::UnknownMethod(raw.to_string()))
        }
    }
}

fn decode_builtin(id: u32, source: &str, builtin: &str) -> Result<Rule, CodecError> {
    let (kind, method) = match builtin.split_once(':') {
        Some((kind, method)) => (kind, Some(method)),
        None => (builtin, None),
    };
    Ok(Rule {
        id,
        kind: parse_kind(kind)?,
        method: parse_method(method)?,
        source: source.to_string(),
        ..Rule::default()
    })
}

fn decode_custom(id: u32, source: &str, custom: &CustomRule) -> Result<Rule, CodecError> {
    Ok(Rule {
        id,
        kind: parse_kind(&custom.kind)?,
        method: parse_method(custom.redaction.method.as_deref())?,
        source: source.to_string(),
        placeholder: custom.redaction.text.clone().unwrap_or_default(),
        pattern: custom.pattern.clone().unwrap_or_default(),
    })
}
