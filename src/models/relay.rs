// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Trusted relay keys of an organization.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::FormError;
use crate::models::entry::{FieldName, FormEntry};

/// Editable fields of a [`Relay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelayField {
    Name,
    PublicKey,
    Description,
}

impl FieldName for RelayField {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PublicKey => "publicKey",
            Self::Description => "description",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Self::Name),
            "publicKey" => Some(Self::PublicKey),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// A relay allowed to forward events for the organization.
///
/// `id` only exists on the client (position-based) and is never serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relay {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<OffsetDateTime>,
}

/// Give every relay its position as client id.
pub fn assign_ids(relays: &mut [Relay]) {
    for (idx, relay) in relays.iter_mut().enumerate() {
        relay.id = idx.to_string();
    }
}

impl FormEntry for Relay {
    type Field = RelayField;
    type Id = String;

    fn default_entry() -> Self {
        Self::default()
    }

    fn id(&self) -> &String {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn next_id(existing: &[Self]) -> String {
        (existing.len()..)
            .map(|idx| idx.to_string())
            .find(|candidate| existing.iter().all(|relay| &relay.id != candidate))
            .unwrap_or_default()
    }

    fn value(&self, field: RelayField) -> &str {
        match field {
            RelayField::Name => &self.name,
            RelayField::PublicKey => &self.public_key,
            RelayField::Description => self.description.as_deref().unwrap_or(""),
        }
    }

    fn set_value(&mut self, field: RelayField, value: String) -> Result<(), FormError> {
        match field {
            RelayField::Name => self.name = value,
            RelayField::PublicKey => self.public_key = value,
            RelayField::Description => {
                self.description = (!value.is_empty()).then_some(value);
            }
        }
        Ok(())
    }

    fn required_fields(&self) -> Vec<RelayField> {
        vec![RelayField::Name, RelayField::PublicKey]
    }

    fn identity_field() -> Option<RelayField> {
        Some(RelayField::PublicKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_without_client_id() {
        let relay = Relay {
            id: "3".into(),
            name: "edge".into(),
            public_key: "key".into(),
            description: Some("eu-west".into()),
            created: None,
            last_modified: None,
        };

        let value = serde_json::to_value(&relay).unwrap();
        assert_eq!(
            value,
            json!({"name": "edge", "publicKey": "key", "description": "eu-west"})
        );
    }

    #[test]
    fn deserializes_server_timestamps() {
        let relay: Relay = serde_json::from_value(json!({
            "name": "edge",
            "publicKey": "key",
            "created": "2020-07-01T12:00:00Z",
            "lastModified": "2020-07-02T08:30:00Z"
        }))
        .unwrap();

        assert!(relay.id.is_empty());
        assert_eq!(relay.created.map(|c| c.day()), Some(1));
        assert_eq!(relay.last_modified.map(|m| m.hour()), Some(8));
        assert!(relay.description.is_none());
    }

    #[test]
    fn next_id_skips_ids_already_in_use() {
        let mut relays = vec![Relay::default(), Relay::default()];
        assign_ids(&mut relays);
        assert_eq!(Relay::next_id(&relays), "2");

        relays[0].id = "2".into();
        assert_eq!(Relay::next_id(&relays), "3");
    }
}
