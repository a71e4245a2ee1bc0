// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Headless settings kernel for advanced data scrubbing rules and trusted relay keys.
//!
//! Pages and their add/edit dialogs are plain MVU components (`model`, `Msg`, `Command`,
//! `update`). Side effects run on worker threads owned by [`app::SettingsApp`] against a
//! caller-supplied [`logic::transport::Transport`].

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod mvu;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use app::SettingsApp;
pub use config::SettingsConfig;
