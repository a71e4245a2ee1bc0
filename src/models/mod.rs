// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types shared by the dialogs, the validation engine and the wire codecs.

pub mod draft;
pub mod entry;
pub mod relay;
pub mod rule;

pub use draft::Draft;
pub use entry::{FieldName, FormEntry};
pub use relay::{Relay, RelayField};
pub use rule::{MethodType, Rule, RuleField, RuleType};
