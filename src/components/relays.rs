// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Trusted relay keys page.

use serde_json::Value;
use tracing::warn;

use crate::components::PageEvent;
use crate::components::collection::{self, CollectionCommand, CollectionModel, CollectionMsg, Labels};
use crate::logic::submit::Submittable;
use crate::models::Relay;

pub const RELAY_LABELS: Labels = Labels {
    add_title: "New Relay Key",
    edit_title: "Edit Relay Key",
    added: "Successfully added Relay public key",
    updated: "Successfully updated Relay public key",
    deleted: "Successfully deleted Relay public key",
    delete_failed: "An unknown error occurred while deleting Relay public key",
    load_failed: "Unable to load Relay public keys",
};

#[derive(Clone, Debug, PartialEq)]
pub struct RelaysModel {
    pub keys: CollectionModel<Relay>,
}

impl Default for RelaysModel {
    fn default() -> Self {
        Self {
            keys: CollectionModel::new(RELAY_LABELS),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RelaysMsg {
    /// Organization resource fetched by the host; its `trustedRelays` are adopted.
    OrganizationLoaded(Value),
    Keys(CollectionMsg<Relay>),
}

pub type RelaysCommand = CollectionCommand<Relay>;

pub fn update(
    model: &mut RelaysModel,
    msg: RelaysMsg,
    cmds: &mut Vec<RelaysCommand>,
) -> Option<PageEvent> {
    match msg {
        RelaysMsg::OrganizationLoaded(organization) => {
            match Relay::decode_collection(&organization) {
                Ok(relays) => {
                    collection::update(&mut model.keys, CollectionMsg::Loaded(relays), cmds)
                }
                Err(err) => {
                    warn!(error = %err, "Cannot read trusted relays");
                    Some(PageEvent::error(RELAY_LABELS.load_failed))
                }
            }
        }
        RelaysMsg::Keys(msg) => collection::update(&mut model.keys, msg, cmds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::dialog::DialogMsg;
    use crate::models::RelayField;
    use serde_json::json;

    #[test]
    fn organization_load_assigns_ids() {
        let mut model = RelaysModel::default();
        let mut cmds = Vec::new();
        let event = update(
            &mut model,
            RelaysMsg::OrganizationLoaded(json!({
                "slug": "acme",
                "trustedRelays": [
                    {"name": "a", "publicKey": "k1", "created": "2020-07-01T12:00:00Z"},
                    {"name": "b", "publicKey": "k2"}
                ]
            })),
            &mut cmds,
        );

        assert!(event.is_none());
        let ids: Vec<&str> = model.keys.saved().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["0", "1"]);
        assert!(model.keys.saved()[0].created.is_some());
    }

    #[test]
    fn broken_organization_payload_reports_error() {
        let mut model = RelaysModel::default();
        let mut cmds = Vec::new();
        let event = update(
            &mut model,
            RelaysMsg::OrganizationLoaded(json!({"trustedRelays": "nope"})),
            &mut cmds,
        );

        assert_eq!(event, Some(PageEvent::error("Unable to load Relay public keys")));
        assert!(model.keys.saved().is_empty());
    }

    #[test]
    fn taken_key_is_reported_globally_and_dialog_stays_open() {
        let mut model = RelaysModel::default();
        let mut cmds = Vec::new();
        update(&mut model, RelaysMsg::Keys(CollectionMsg::OpenAdd), &mut cmds);
        for (field, value) in [(RelayField::Name, "edge"), (RelayField::PublicKey, "dup")] {
            update(
                &mut model,
                RelaysMsg::Keys(CollectionMsg::Dialog(DialogMsg::FieldChanged {
                    field,
                    value: value.into(),
                })),
                &mut cmds,
            );
        }
        update(
            &mut model,
            RelaysMsg::Keys(CollectionMsg::Dialog(DialogMsg::SaveRequested)),
            &mut cmds,
        );
        let CollectionCommand::Submit { origin, .. } = cmds.pop().unwrap();

        let event = update(
            &mut model,
            RelaysMsg::Keys(CollectionMsg::SubmitCompleted {
                origin,
                result: Err(crate::error::TransportError::Status {
                    status: 400,
                    body: Some(json!({"trustedRelays": ["Relay key already taken"]})),
                }),
            }),
            &mut cmds,
        );

        assert_eq!(event, Some(PageEvent::error("Relay key already taken.")));
        let dialog = model.keys.dialog().unwrap();
        assert_eq!(dialog.error(RelayField::PublicKey), None);
        assert!(!dialog.is_submitting());
        assert!(dialog.is_form_valid());
    }
}
