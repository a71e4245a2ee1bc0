// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime configuration loaded from TOML.
//!
//! ```toml
//! api_base = "https://sentry.example.com/api/0/"
//! organization = "acme"
//! project = "backend"   # optional; rules are stored on the organization when absent
//! workers = 2
//! log_filter = "info"
//! ```

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use url::Url;

const DEFAULT_WORKERS: usize = 2;

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Settings for one organization (and optionally one project) of the remote API.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Base URL every endpoint is resolved against.
    pub api_base: Url,
    /// Organization slug.
    pub organization: String,
    /// Project slug; selects the project rules endpoint when present.
    #[serde(default)]
    pub project: Option<String>,
    /// Number of worker threads executing commands.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Fallback `tracing` filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Fully resolved endpoint URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Receives the whole rule collection as `relayPiiConfig`.
    pub rules: Url,
    /// Receives the whole trusted relay collection.
    pub relays: Url,
    /// Selector suggestions for a given event id.
    pub suggestions: Url,
    /// Project slug forwarded to the suggestions query.
    pub project: Option<String>,
}

impl SettingsConfig {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {:?}", path))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid configuration file: {:?}", path))
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("Failed to parse configuration TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() {
            bail!("'organization' must not be empty");
        }
        if self
            .project
            .as_deref()
            .is_some_and(|project| project.trim().is_empty())
        {
            bail!("'project' must not be empty when set");
        }
        if self.workers == 0 {
            bail!("'workers' must be at least 1");
        }
        if self.api_base.cannot_be_a_base() {
            bail!("'api_base' must be a hierarchical URL");
        }
        Ok(())
    }

    /// Resolve all endpoints against `api_base`. Slugs are percent-encoded as single segments.
    pub fn endpoints(&self) -> Result<Endpoints> {
        let org = self.organization.trim();
        let project = self.project.as_deref().map(str::trim);
        let relays = self.endpoint(&["organizations", org])?;
        let rules = match project {
            Some(project) => self.endpoint(&["projects", org, project])?,
            None => relays.clone(),
        };
        let suggestions =
            self.endpoint(&["organizations", org, "data-scrubbing-selector-suggestions"])?;

        Ok(Endpoints {
            rules,
            relays,
            suggestions,
            project: project.map(str::to_string),
        })
    }

    /// `api_base` with `segments` appended and a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("'api_base' must be a hierarchical URL"))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }
}
