// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic: validation, error classification, wire codecs and the submit step.
//!
//! Nothing in here touches dialog state; components call these functions from their update
//! functions and workers call them from `run_command`.

pub mod errors;
pub mod pii_config;
pub mod submit;
pub mod suggestions;
pub mod transport;
pub mod validation;
