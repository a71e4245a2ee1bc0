// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Host for the settings kernel: owns the root model and a pool of command workers.
//!
//! The embedding UI feeds user input through [`SettingsApp::dispatch`] and calls
//! [`SettingsApp::pump`] once per frame to apply results produced by the workers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::SettingsConfig;
use crate::logic::transport::Transport;
use crate::mvu::{self, AppModel, Command, CommandContext, Msg};

/// Settings application state plus the channels to its workers.
pub struct SettingsApp {
    model: AppModel,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl SettingsApp {
    /// Resolve endpoints and spawn `config.workers` worker threads.
    ///
    /// Workers exit once the app is dropped and the command channel closes.
    pub fn new(config: &SettingsConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let endpoints = config.endpoints()?;
        let ctx = CommandContext {
            transport,
            endpoints,
        };

        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        for idx in 0..config.workers {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let ctx = ctx.clone();
            std::thread::Builder::new()
                .name(format!("ruleform-worker-{idx}"))
                .spawn(move || {
                    for cmd in cmd_rx.iter() {
                        let msg = mvu::run_command(cmd, &ctx);
                        let _ = msg_tx.send(msg);
                    }
                })
                .context("Failed to spawn worker thread")?;
        }
        info!(
            workers = config.workers,
            organization = %config.organization,
            project = config.project.as_deref().unwrap_or("-"),
            "Settings kernel started"
        );

        Ok(Self {
            model: AppModel::new(config.project.is_some()),
            cmd_tx,
            msg_rx,
        })
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    /// Apply a message and hand the resulting commands to the workers.
    pub fn dispatch(&mut self, msg: Msg) {
        let mut cmds = Vec::new();
        mvu::update(&mut self.model, msg, &mut cmds);
        for cmd in cmds {
            if self.cmd_tx.send(cmd).is_ok() {
                self.model.pending_commands += 1;
            } else {
                debug!("Command channel closed; dropping command");
            }
        }
    }

    /// Apply every result the workers have produced so far. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.apply_result(msg);
            applied += 1;
        }
        applied
    }

    /// Block until no command is pending or `timeout` elapses. Returns `true` when idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.model.pending_commands > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => self.apply_result(msg),
                Err(_) => return false,
            }
        }
        true
    }

    fn apply_result(&mut self, msg: Msg) {
        self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
        self.dispatch(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::collection::CollectionMsg;
    use crate::components::data_scrubbing::DataScrubbingMsg;
    use crate::components::dialog::DialogMsg;
    use crate::testing::RecordingTransport;
    use serde_json::json;

    fn config() -> SettingsConfig {
        SettingsConfig::from_toml_str(
            r#"
            api_base = "https://sentry.example.com/api/0/"
            organization = "acme"
            project = "backend"
            workers = 3
            "#,
        )
        .unwrap()
    }

    fn rules(msg: CollectionMsg<crate::models::Rule>) -> Msg {
        Msg::DataScrubbing(DataScrubbingMsg::Rules(msg))
    }

    #[test]
    fn double_save_sends_a_single_request() {
        let transport = Arc::new(RecordingTransport::replying(Ok(json!({
            "relayPiiConfig": "{\"applications\": {\"$message\": [\"@ip:hash\"]}}"
        }))));
        let mut app = SettingsApp::new(&config(), transport.clone()).unwrap();

        app.dispatch(Msg::DataScrubbing(DataScrubbingMsg::ConfigLoaded(Some(
            r#"{"applications": {"$message": ["@ip:mask"]}}"#.into(),
        ))));
        app.dispatch(rules(CollectionMsg::OpenEdit(0)));
        app.dispatch(rules(CollectionMsg::Dialog(DialogMsg::FieldChanged {
            field: crate::models::RuleField::Method,
            value: "hash".into(),
        })));
        app.dispatch(rules(CollectionMsg::Dialog(DialogMsg::SaveRequested)));
        app.dispatch(rules(CollectionMsg::Dialog(DialogMsg::SaveRequested)));
        assert_eq!(app.model().pending_commands, 1);

        assert!(app.wait_idle(Duration::from_secs(5)));
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(
            app.model().status.as_deref(),
            Some("Successfully updated data scrubbing rule")
        );
        assert_eq!(app.pump(), 0);
    }

    #[test]
    fn rejects_invalid_endpoints_config() {
        let mut bad = config();
        bad.api_base = url::Url::parse("mailto:ops@example.com").unwrap();
        let transport = Arc::new(RecordingTransport::replying(Ok(json!({}))));

        assert!(SettingsApp::new(&bad, transport).is_err());
    }
}
