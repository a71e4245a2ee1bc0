// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Advanced data scrubbing page: saved rules, read-only organization rules and the source
//! suggestions offered while editing a rule.

use serde_json::Value;
use tracing::{debug, warn};

use crate::components::PageEvent;
use crate::components::collection::{self, CollectionCommand, CollectionModel, CollectionMsg, Labels};
use crate::error::TransportError;
use crate::logic::pii_config;
use crate::logic::suggestions::{
    self, EventId, EventIdStatus, SourceSuggestion, default_suggestions,
};
use crate::models::Rule;

const PROJECT_RULES_LOAD_FAILED: &str = "Unable to load project rules";
const ORGANIZATION_RULES_LOAD_FAILED: &str = "Unable to load organization rules";

pub const RULE_LABELS: Labels = Labels {
    add_title: "Add an advanced data scrubbing rule",
    edit_title: "Edit an advanced data scrubbing rule",
    added: "Successfully added data scrubbing rule",
    updated: "Successfully updated data scrubbing rule",
    deleted: "Successfully deleted data scrubbing rule",
    delete_failed: "An unknown error occurred while deleting data scrubbing rule",
    load_failed: ORGANIZATION_RULES_LOAD_FAILED,
};

#[derive(Clone, Debug, PartialEq)]
pub struct DataScrubbingModel {
    pub rules: CollectionModel<Rule>,
    /// Rules inherited from the organization; only shown for project scope.
    org_rules: Vec<Rule>,
    project_scoped: bool,
    suggestions: Vec<SourceSuggestion>,
    event_id: EventId,
}

impl DataScrubbingModel {
    pub fn new(project_scoped: bool) -> Self {
        let labels = if project_scoped {
            Labels {
                load_failed: PROJECT_RULES_LOAD_FAILED,
                ..RULE_LABELS
            }
        } else {
            RULE_LABELS
        };
        Self {
            rules: CollectionModel::new(labels),
            org_rules: Vec::new(),
            project_scoped,
            suggestions: default_suggestions(),
            event_id: EventId::default(),
        }
    }

    pub fn is_project_scoped(&self) -> bool {
        self.project_scoped
    }

    pub fn org_rules(&self) -> &[Rule] {
        &self.org_rules
    }

    pub fn suggestions(&self) -> &[SourceSuggestion] {
        &self.suggestions
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }
}

impl Default for DataScrubbingModel {
    fn default() -> Self {
        Self::new(false)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DataScrubbingMsg {
    /// Stored `relayPiiConfig` of the scope being edited.
    ConfigLoaded(Option<String>),
    /// Stored `relayPiiConfig` of the organization, for project scope.
    OrgConfigLoaded(Option<String>),
    Rules(CollectionMsg<Rule>),
    EventIdChanged(String),
    SuggestionsLoaded {
        event_id: String,
        result: Result<Value, TransportError>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum DataScrubbingCommand {
    Rules(CollectionCommand<Rule>),
    FetchSuggestions { event_id: String },
}

pub fn update(
    model: &mut DataScrubbingModel,
    msg: DataScrubbingMsg,
    cmds: &mut Vec<DataScrubbingCommand>,
) -> Option<PageEvent> {
    match msg {
        DataScrubbingMsg::ConfigLoaded(raw) => match pii_config::decode(raw.as_deref()) {
            Ok(rules) => forward_rules(model, CollectionMsg::Loaded(rules), cmds),
            Err(err) => {
                warn!(error = %err, "Cannot decode stored rules");
                Some(PageEvent::error(model.rules.labels().load_failed))
            }
        },
        DataScrubbingMsg::OrgConfigLoaded(raw) => match pii_config::decode(raw.as_deref()) {
            Ok(rules) => {
                model.org_rules = rules;
                None
            }
            Err(err) => {
                warn!(error = %err, "Cannot decode organization rules");
                Some(PageEvent::error(ORGANIZATION_RULES_LOAD_FAILED))
            }
        },
        DataScrubbingMsg::Rules(msg) => forward_rules(model, msg, cmds),
        DataScrubbingMsg::EventIdChanged(value) => {
            let value = value.trim().to_string();
            if value.is_empty() {
                model.event_id = EventId::default();
                model.suggestions = default_suggestions();
            } else {
                model.event_id = EventId {
                    value: value.clone(),
                    status: Some(EventIdStatus::Loading),
                };
                cmds.push(DataScrubbingCommand::FetchSuggestions { event_id: value });
            }
            None
        }
        DataScrubbingMsg::SuggestionsLoaded { event_id, result } => {
            apply_suggestions(model, event_id, result);
            None
        }
    }
}

fn forward_rules(
    model: &mut DataScrubbingModel,
    msg: CollectionMsg<Rule>,
    cmds: &mut Vec<DataScrubbingCommand>,
) -> Option<PageEvent> {
    let mut rule_cmds = Vec::new();
    let event = collection::update(&mut model.rules, msg, &mut rule_cmds);
    cmds.extend(rule_cmds.into_iter().map(DataScrubbingCommand::Rules));
    event
}

fn apply_suggestions(
    model: &mut DataScrubbingModel,
    event_id: String,
    result: Result<Value, TransportError>,
) {
    if model.event_id.value != event_id {
        debug!(%event_id, current = %model.event_id.value, "Discarding stale suggestions");
        return;
    }

    let decoded = result
        .map_err(|err| err.to_string())
        .and_then(|body| suggestions::decode_suggestions(&body).map_err(|err| err.to_string()));

    match decoded {
        Ok(found) if !found.is_empty() => {
            model.suggestions = found;
            model.event_id.status = Some(EventIdStatus::Loaded);
        }
        Ok(_) => {
            model.suggestions = default_suggestions();
            model.event_id.status = Some(EventIdStatus::NotFound);
        }
        Err(err) => {
            warn!(%event_id, error = %err, "Cannot load source suggestions");
            model.suggestions = default_suggestions();
            model.event_id.status = Some(EventIdStatus::Error);
        }
    }
}
