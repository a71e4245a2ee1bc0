// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring page state, messages, and commands.

use std::sync::Arc;

use tracing::debug;

use crate::components::PageEvent;
use crate::components::collection::{CollectionCommand, CollectionMsg, SubmitOrigin};
use crate::components::data_scrubbing::{
    self, DataScrubbingCommand, DataScrubbingModel, DataScrubbingMsg,
};
use crate::components::relays::{self, RelaysModel, RelaysMsg};
use crate::config::Endpoints;
use crate::logic::submit::submit;
use crate::logic::suggestions::suggestions_request;
use crate::logic::transport::Transport;
use crate::models::{Relay, Rule};

/// Top-level application state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppModel {
    /// Advanced data scrubbing page.
    pub data_scrubbing: DataScrubbingModel,
    /// Trusted relay keys page.
    pub relays: RelaysModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn new(project_scoped: bool) -> Self {
        Self {
            data_scrubbing: DataScrubbingModel::new(project_scoped),
            ..Self::default()
        }
    }
}

/// Application messages routed through the update function.
#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    DataScrubbing(DataScrubbingMsg),
    Relays(RelaysMsg),
    DismissError,
}

/// Commands represent side-effects executed on worker threads.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SubmitRules {
        origin: SubmitOrigin,
        entries: Vec<Rule>,
    },
    SubmitRelays {
        origin: SubmitOrigin,
        entries: Vec<Relay>,
    },
    FetchSuggestions {
        event_id: String,
    },
}

/// What a worker needs to execute commands.
#[derive(Clone)]
pub struct CommandContext {
    pub transport: Arc<dyn Transport>,
    pub endpoints: Endpoints,
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::DismissError => model.error = None,
        Msg::DataScrubbing(m) => {
            let mut page_cmds = Vec::new();
            if let Some(event) = data_scrubbing::update(&mut model.data_scrubbing, m, &mut page_cmds)
            {
                surface_event(model, event);
            }
            for c in page_cmds {
                match c {
                    DataScrubbingCommand::Rules(CollectionCommand::Submit { origin, entries }) => {
                        cmds.push(Command::SubmitRules { origin, entries })
                    }
                    DataScrubbingCommand::FetchSuggestions { event_id } => {
                        cmds.push(Command::FetchSuggestions { event_id })
                    }
                }
            }
        }
        Msg::Relays(m) => {
            let mut page_cmds = Vec::new();
            if let Some(event) = relays::update(&mut model.relays, m, &mut page_cmds) {
                surface_event(model, event);
            }
            for c in page_cmds {
                match c {
                    CollectionCommand::Submit { origin, entries } => {
                        cmds.push(Command::SubmitRelays { origin, entries })
                    }
                }
            }
        }
    }
}

/// Execute a command synchronously and return the resulting message.
pub fn run_command(cmd: Command, ctx: &CommandContext) -> Msg {
    match cmd {
        Command::SubmitRules { origin, entries } => {
            let result = submit(ctx.transport.as_ref(), &ctx.endpoints, &entries);
            Msg::DataScrubbing(DataScrubbingMsg::Rules(CollectionMsg::SubmitCompleted {
                origin,
                result,
            }))
        }
        Command::SubmitRelays { origin, entries } => {
            let result = submit(ctx.transport.as_ref(), &ctx.endpoints, &entries);
            Msg::Relays(RelaysMsg::Keys(CollectionMsg::SubmitCompleted {
                origin,
                result,
            }))
        }
        Command::FetchSuggestions { event_id } => {
            let request = suggestions_request(&ctx.endpoints, &event_id);
            debug!(%event_id, url = %request.url, "Fetching source suggestions");
            let result = ctx.transport.send(&request);
            Msg::DataScrubbing(DataScrubbingMsg::SuggestionsLoaded { event_id, result })
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, event: PageEvent) {
    if event.is_error {
        model.error = Some(event.message.clone());
    }
    model.status = Some(event.message);
}
