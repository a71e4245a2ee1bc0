// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Contract every editable collection entry (rule, relay key) fulfils.

use std::fmt::{Debug, Display};

use crate::error::FormError;

/// Field identifiers with a stable wire/display name.
pub trait FieldName: Copy + Ord + Debug + Send + 'static {
    /// Name used in payloads and error targets (`"source"`, `"publicKey"`, ...).
    fn as_str(&self) -> &'static str;

    /// Reverse lookup of [`FieldName::as_str`].
    fn parse(raw: &str) -> Option<Self>;
}

/// An entry of a collection that is edited through a dialog and saved wholesale.
pub trait FormEntry: Clone + Debug + PartialEq + Send + 'static {
    type Field: FieldName;
    type Id: Clone + Debug + PartialEq + Display + Send + 'static;

    /// Baseline entry used by the add dialog: fixed discriminants, empty free text.
    fn default_entry() -> Self;

    fn id(&self) -> &Self::Id;

    fn set_id(&mut self, id: Self::Id);

    /// Identifier that is not used by any of `existing`.
    fn next_id(existing: &[Self]) -> Self::Id;

    /// Current text form of a field. Enum-valued fields return their wire name.
    fn value(&self, field: Self::Field) -> &str;

    /// Replace a single field, parsing the text for enum-valued fields.
    fn set_value(&mut self, field: Self::Field, value: String) -> Result<(), FormError>;

    /// Ordered set of fields that must be non-blank for this entry's current discriminant.
    fn required_fields(&self) -> Vec<Self::Field>;

    /// Field that identifies an existing entry and stays locked while editing it.
    fn identity_field() -> Option<Self::Field> {
        None
    }
}
